//! Proximity-graph filters
//!
//! Both filters keep a subset of their input edges; the output is sorted so it
//! does not depend on the order edges were given in.

use crate::geometry::midpoint;
use crate::node::{Line, Node};

/// Keep edges whose diameter circle holds no other node strictly inside
pub fn gabriel_graph(edges: &[Line], nodes: &[Node]) -> Vec<Line> {
    keep_sorted(edges, |line| {
        let a = nodes[line.from].position;
        let b = nodes[line.to].position;
        let center = midpoint(a, b);
        let radius_sq = a.distance_squared(center);

        !nodes.iter().any(|other| {
            !line.touches(other.id) && other.position.distance_squared(center) < radius_sq
        })
    })
}

/// Keep edges for which no third node is closer to both endpoints than they
/// are to each other
pub fn relative_neighbourhood_graph(edges: &[Line], nodes: &[Node]) -> Vec<Line> {
    keep_sorted(edges, |line| {
        let a = &nodes[line.from];
        let b = &nodes[line.to];
        let length_sq = a.distance_sq(b);

        !nodes.iter().any(|other| {
            !line.touches(other.id)
                && other.distance_sq(a) < length_sq
                && other.distance_sq(b) < length_sq
        })
    })
}

fn keep_sorted(edges: &[Line], mut keep: impl FnMut(&Line) -> bool) -> Vec<Line> {
    let mut kept: Vec<Line> = edges.iter().copied().filter(|line| keep(line)).collect();
    kept.sort_unstable();
    kept.dedup();
    kept
}
