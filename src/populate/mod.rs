//! Region population
//!
//! Every tile is assigned to the territory of its nearest node, then each node
//! fills its own territory according to its [`RegionKind`](crate::node::RegionKind): caves from a
//! cellular automaton, rooms from rectangle growth, hybrids get both.

mod cave;
mod room;

pub use cave::{grow_cave, prune_disconnected};
pub use room::{grow_room, RoomBounds};

use glam::DVec2;

use crate::config::DungeonConfig;
use crate::grid::Grid;
use crate::node::{Node, NodeId};
use crate::rng::SeededRng;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Assign every tile to its nearest node
pub fn assign_territories(grid: &mut Grid, nodes: &[Node]) {
    if nodes.is_empty() {
        return;
    }

    #[cfg(feature = "spatial-index")]
    let index = {
        let positions: Vec<DVec2> = nodes.iter().map(|n| n.position).collect();
        SpatialIndex::new(&positions)
    };

    for id in 0..grid.tiles().len() {
        let tile = grid.tile(id);
        let centre = DVec2::new(tile.x as f64, tile.y as f64);

        #[cfg(feature = "spatial-index")]
        let nearest = index.find_nearest(centre);
        #[cfg(not(feature = "spatial-index"))]
        let nearest = nearest_node(nodes, centre);

        grid.tile_mut(id).region = Some(nearest);
    }
}

/// Linear nearest-node scan; ties go to the lower id
#[cfg_attr(feature = "spatial-index", allow(dead_code))]
fn nearest_node(nodes: &[Node], p: DVec2) -> NodeId {
    nodes
        .iter()
        .map(|n| (n.position.distance_squared(p), n.id))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| id)
        .unwrap_or(0)
}

/// Run the whole population stage
///
/// Resets floor to the rasterized pathways, reassigns territories and grows
/// every node's region in id order. Returns the number of floor tiles.
pub fn populate_regions(
    grid: &mut Grid,
    nodes: &[Node],
    config: &DungeonConfig,
    rng: &mut SeededRng,
) -> usize {
    for id in 0..grid.tiles().len() {
        let tile = grid.tile_mut(id);
        tile.is_floor = tile.is_path;
        tile.is_wall = false;
        tile.visited = false;
    }
    assign_territories(grid, nodes);

    // Hybrids carve their room after the cave has settled
    for node in nodes {
        if node.kind.grows_cave() {
            grow_cave(grid, node, config.cave_iterations, config.cave_fill_probability, rng);
        }
        if node.kind.grows_room() {
            grow_room(grid, node, rng);
        }
    }

    grid.floor_count()
}
