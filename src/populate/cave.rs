//! Cellular-automaton caves

use std::collections::VecDeque;

use tracing::trace;

use crate::grid::{Grid, TileId};
use crate::node::{Node, NodeId};
use crate::rng::SeededRng;

/// A floor tile with at least this many floor neighbours stays floor
const SURVIVE_AT: usize = 4;
/// A solid tile with more than this many floor neighbours becomes floor
const BIRTH_ABOVE: usize = 4;

/// Grow a cave inside `node`'s territory
///
/// Only interior tiles (all eight neighbours inside the territory) that are not
/// rasterized paths may change. They are seeded with `fill_probability`, then
/// smoothed for `iterations` synchronous steps, and finally anything not
/// 8-connected to the node's tile is cleared again. Returns the region's floor
/// count afterwards.
pub fn grow_cave(
    grid: &mut Grid,
    node: &Node,
    iterations: usize,
    fill_probability: f64,
    rng: &mut SeededRng,
) -> usize {
    let flippable: Vec<TileId> = (0..grid.tiles().len())
        .filter(|&id| is_interior(grid, id, node.id) && !grid.tile(id).is_path)
        .collect();

    for &id in &flippable {
        grid.tile_mut(id).is_floor = rng.next() < fill_probability;
    }

    for _ in 0..iterations {
        let next: Vec<bool> = flippable
            .iter()
            .map(|&id| {
                let tile = grid.tile(id);
                let floors = tile
                    .neighbours()
                    .iter()
                    .filter(|&&n| grid.tile(n).is_floor)
                    .count();
                if tile.is_floor {
                    floors >= SURVIVE_AT
                } else {
                    floors > BIRTH_ABOVE
                }
            })
            .collect();

        for (&id, floor) in flippable.iter().zip(next) {
            grid.tile_mut(id).is_floor = floor;
        }
    }

    let (x, y) = node.tile();
    let cleared = prune_disconnected(grid, node.id, x, y);
    let kept = region_floor(grid, node.id);
    trace!(node = node.id, candidates = flippable.len(), cleared, kept, "cave grown");
    kept
}

/// Clear non-path floor in `region` that is not 8-connected to `(x, y)`
///
/// If `(x, y)` is outside the grid, outside the region or solid, every non-path
/// floor tile of the region is cleared. Returns the number of tiles cleared.
pub fn prune_disconnected(grid: &mut Grid, region: NodeId, x: i32, y: i32) -> usize {
    let mut reached = vec![false; grid.tiles().len()];
    match grid.index(x, y) {
        Some(start) if is_region_floor(grid, start, region) => {
            let mut queue = VecDeque::from([start]);
            reached[start] = true;
            while let Some(id) = queue.pop_front() {
                for &n in grid.tile(id).neighbours() {
                    if !reached[n] && is_region_floor(grid, n, region) {
                        reached[n] = true;
                        queue.push_back(n);
                    }
                }
            }
        }
        _ => trace!(region, x, y, "cave origin not in its region"),
    }

    let mut cleared = 0;
    for (id, keep) in reached.into_iter().enumerate() {
        let tile = grid.tile_mut(id);
        if !keep && tile.is_floor && !tile.is_path && tile.region == Some(region) {
            tile.is_floor = false;
            cleared += 1;
        }
    }
    cleared
}

fn is_region_floor(grid: &Grid, id: TileId, region: NodeId) -> bool {
    let tile = grid.tile(id);
    tile.is_floor && tile.region == Some(region)
}

fn is_interior(grid: &Grid, id: TileId, region: NodeId) -> bool {
    let tile = grid.tile(id);
    tile.region == Some(region)
        && tile.neighbours().len() == 8
        && tile
            .neighbours()
            .iter()
            .all(|&n| grid.tile(n).region == Some(region))
}

fn region_floor(grid: &Grid, region: NodeId) -> usize {
    grid.tiles()
        .iter()
        .filter(|t| t.is_floor && t.region == Some(region))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RegionKind;
    use glam::DVec2;

    fn single_region(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        for id in 0..grid.tiles().len() {
            grid.tile_mut(id).region = Some(0);
        }
        grid
    }

    fn fill_rect(grid: &mut Grid, x0: i32, y0: i32, x1: i32, y1: i32) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                grid.get_mut(x, y).unwrap().is_floor = true;
            }
        }
    }

    #[test]
    fn test_prune_keeps_only_connected_blob() {
        let mut grid = single_region(20, 12);
        fill_rect(&mut grid, 3, 4, 5, 6);
        fill_rect(&mut grid, 13, 4, 15, 6);

        let cleared = prune_disconnected(&mut grid, 0, 4, 5);

        assert_eq!(cleared, 9);
        assert_eq!(grid.floor_count(), 9);
        assert!(grid.is_floor(3, 4) && grid.is_floor(5, 6));
        assert!(!grid.is_floor(14, 5));
    }

    #[test]
    fn test_prune_follows_diagonals() {
        let mut grid = single_region(10, 10);
        for i in 1..8 {
            grid.get_mut(i, i).unwrap().is_floor = true;
        }
        assert_eq!(prune_disconnected(&mut grid, 0, 1, 1), 0);
        assert_eq!(grid.floor_count(), 7);
    }

    #[test]
    fn test_prune_spares_paths_and_other_regions() {
        let mut grid = single_region(12, 6);
        grid.mark_path(9, 2);
        fill_rect(&mut grid, 1, 1, 2, 2);
        let other = grid.get_mut(6, 4).unwrap();
        other.is_floor = true;
        other.region = Some(1);

        // Origin is solid, so every non-path floor of region 0 goes
        let cleared = prune_disconnected(&mut grid, 0, 4, 4);
        assert_eq!(cleared, 4);
        assert!(grid.is_floor(9, 2));
        assert!(grid.is_floor(6, 4));
    }

    #[test]
    fn test_cave_clears_cut_off_pocket() {
        // Two 9x9 halves of one territory joined by a strip too thin to hold
        // interior tiles, inside a second territory
        let mut grid = Grid::new(24, 11);
        for id in 0..grid.tiles().len() {
            let (x, y) = grid.tile(id).coord();
            let in_half = (1..=9).contains(&y) && ((1..=9).contains(&x) || (13..=21).contains(&x));
            let in_strip = y == 5 && (10..=12).contains(&x);
            grid.tile_mut(id).region = Some(if in_half || in_strip { 0 } else { 1 });
        }
        let node = Node::new(0, DVec2::new(5.0, 5.0), RegionKind::Natural, 5.0);

        // Full fill settles into two 7x7 blocks minus their corners
        let kept = grow_cave(&mut grid, &node, 5, 1.0, &mut SeededRng::from_u64(8));

        assert_eq!(kept, 45);
        assert_eq!(grid.floor_count(), 45);
        assert!(grid.is_floor(5, 5) && grid.is_floor(3, 2));
        assert!(!grid.is_floor(2, 2));
        assert!((13..=21).all(|x| (1..=9).all(|y| !grid.is_floor(x, y))));
    }

    #[test]
    fn test_cave_connected_to_node() {
        let mut grid = single_region(40, 30);
        let node = Node::new(0, DVec2::new(20.0, 15.0), RegionKind::Natural, 5.0);
        grid.mark_path(20, 15);

        let kept = grow_cave(&mut grid, &node, 8, 0.55, &mut SeededRng::from_u64(21));
        assert_eq!(kept, grid.floor_count());

        // Border tiles are never interior, so they stay solid
        assert!((0..40).all(|x| !grid.is_floor(x, 0) && !grid.is_floor(x, 29)));

        // Rerunning the prune from the node removes nothing
        assert_eq!(prune_disconnected(&mut grid, 0, 20, 15), 0);
    }

    #[test]
    fn test_cave_never_touches_paths() {
        let mut grid = single_region(30, 20);
        for x in 2..28 {
            grid.mark_path(x, 10);
        }
        let node = Node::new(0, DVec2::new(15.0, 10.0), RegionKind::Natural, 5.0);
        grow_cave(&mut grid, &node, 8, 0.0, &mut SeededRng::from_u64(2));
        // Nothing seeded: the corridor alone survives
        assert_eq!(grid.floor_count(), 26);
        assert!((2..28).all(|x| grid.is_floor(x, 10)));
    }

    #[test]
    fn test_cave_is_deterministic() {
        let node = Node::new(0, DVec2::new(12.0, 12.0), RegionKind::Natural, 5.0);
        let run = || {
            let mut grid = single_region(25, 25);
            grid.mark_path(12, 12);
            grow_cave(&mut grid, &node, 6, 0.5, &mut SeededRng::from_u64(99));
            grid
        };
        assert_eq!(run(), run());
    }
}
