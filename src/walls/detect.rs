use crate::grid::{Grid, Tile};
use crate::node::Node;

/// Mark wall tiles and return how many there are
///
/// Every non-floor tile with an orthogonal floor neighbour becomes a wall and
/// takes the region of the first such neighbour. Failing that, a diagonal
/// floor neighbour in a region that grows a room (artificial or hybrid) also
/// makes it a wall, which closes room corners. Walls from a previous run are cleared first.
pub fn detect_walls(grid: &mut Grid, nodes: &[Node]) -> usize {
    for id in 0..grid.tiles().len() {
        grid.tile_mut(id).is_wall = false;
    }

    let is_room = |tile: &Tile| {
        tile.region
            .and_then(|r| nodes.get(r))
            .is_some_and(|n| n.kind.grows_room())
    };

    let mut walls = 0;
    for id in 0..grid.tiles().len() {
        let tile = grid.tile(id);
        if tile.is_floor {
            continue;
        }

        let orthogonal = tile
            .orthogonal_neighbours()
            .iter()
            .map(|&n| grid.tile(n))
            .find(|n| n.is_floor);
        let source = orthogonal.or_else(|| {
            tile.diagonal_neighbours()
                .iter()
                .map(|&n| grid.tile(n))
                .find(|&n| n.is_floor && is_room(n))
        });

        if let Some(region) = source.map(|n| n.region) {
            let tile = grid.tile_mut(id);
            tile.is_wall = true;
            tile.region = region;
            walls += 1;
        }
    }
    walls
}
