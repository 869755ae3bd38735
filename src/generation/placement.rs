//! Spaced node placement
//!
//! Places nodes with a two-candidate best-of sampler, a cheap blue-noise
//! approximation: every iteration draws two random points and keeps the one
//! farther from its nearest already-placed node.
//!
//! Distances are measured with both axes normalized to the grid size, so the
//! choice between candidates does not skew when the aspect ratio changes.

use glam::DVec2;

use crate::config::DungeonConfig;
use crate::node::{Node, RegionKind};
use crate::rng::SeededRng;

/// Minimum distance, in tiles, between a node and the grid edge
pub const PLACEMENT_MARGIN: f64 = 2.0;

/// Place `config.node_count` nodes inside the inset grid bounds
///
/// Every node consumes the same amount of randomness (two candidates, a kind
/// roll and an influence roll), so node `i` only depends on nodes `0..i`.
///
/// # Example
///
/// ```rust
/// use rust_graph_dungeon::*;
/// use rust_graph_dungeon::generation::place_nodes;
///
/// let config = DungeonConfigBuilder::new().seed(7).build().unwrap();
/// let nodes = place_nodes(&config, &mut SeededRng::from_u64(7));
/// assert_eq!(nodes.len(), config.node_count);
/// ```
pub fn place_nodes(config: &DungeonConfig, rng: &mut SeededRng) -> Vec<Node> {
    let width = config.width as f64;
    let height = config.height as f64;
    // Upper bound keeps the rounded tile PLACEMENT_MARGIN away from the far edge
    let max_x = width - 1.0 - PLACEMENT_MARGIN - 0.5;
    let max_y = height - 1.0 - PLACEMENT_MARGIN - 0.5;

    let mut nodes: Vec<Node> = Vec::with_capacity(config.node_count);

    for id in 0..config.node_count {
        let first = DVec2::new(
            rng.next_in_range(PLACEMENT_MARGIN, max_x),
            rng.next_in_range(PLACEMENT_MARGIN, max_y),
        );
        let second = DVec2::new(
            rng.next_in_range(PLACEMENT_MARGIN, max_x),
            rng.next_in_range(PLACEMENT_MARGIN, max_y),
        );

        let position = if nodes.is_empty() {
            first
        } else {
            let d_first = nearest_normalized_sq(first, &nodes, width, height);
            let d_second = nearest_normalized_sq(second, &nodes, width, height);
            if d_second > d_first {
                second
            } else {
                first
            }
        };

        let kind = roll_kind(rng, config.artificial_ratio, config.hybrid_ratio);
        let influence = rng.next_in_range(config.room_extent_min, config.room_extent_max);

        nodes.push(Node::new(id, position, kind, influence));
    }

    nodes
}

/// Squared distance from `p` to its nearest node, axes scaled to `[0, 1]`
fn nearest_normalized_sq(p: DVec2, nodes: &[Node], width: f64, height: f64) -> f64 {
    nodes
        .iter()
        .map(|n| {
            let dx = (p.x - n.position.x) / width;
            let dy = (p.y - n.position.y) / height;
            dx * dx + dy * dy
        })
        .fold(f64::INFINITY, f64::min)
}

fn roll_kind(rng: &mut SeededRng, artificial_ratio: f64, hybrid_ratio: f64) -> RegionKind {
    let roll = rng.next();
    if roll < artificial_ratio {
        RegionKind::Artificial
    } else if roll < artificial_ratio + hybrid_ratio {
        RegionKind::Hybrid
    } else {
        RegionKind::Natural
    }
}
