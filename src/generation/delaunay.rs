//! Delaunay triangulation (Bowyer-Watson)
//!
//! Points are inserted one at a time into a triangulation seeded with a
//! super-triangle far outside the grid. Every triangle whose circumcircle
//! contains the new point is removed, and the resulting polygonal hole is
//! re-triangulated by connecting its boundary edges to the point.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;

use crate::geometry::circumcircle;
use crate::node::{Line, Node};

/// Distance of the super-triangle vertices from the origin
///
/// Far beyond any tile coordinate so no real triangle's circumcircle is
/// affected by the sentinels.
const SUPER_EXTENT: f64 = 999_999.0;

struct Triangle {
    vertices: [usize; 3],
    circumcenter: DVec2,
    radius_sq: f64,
}

impl Triangle {
    fn new(vertices: [usize; 3], points: &[DVec2]) -> Self {
        let (circumcenter, radius_sq) = circumcircle(
            points[vertices[0]],
            points[vertices[1]],
            points[vertices[2]],
        );
        Self {
            vertices,
            circumcenter,
            radius_sq,
        }
    }

    #[inline]
    fn circumcircle_contains(&self, p: DVec2) -> bool {
        p.distance_squared(self.circumcenter) <= self.radius_sq
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Triangulate the node positions
///
/// Returns the sorted, deduplicated edge set of every triangle that does not
/// touch the super-triangle. Fewer than three nodes give an empty set; the
/// graph builder handles that case.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use rust_graph_dungeon::{Line, Node, RegionKind};
/// use rust_graph_dungeon::generation::triangulate;
///
/// let nodes: Vec<Node> = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]
///     .iter()
///     .enumerate()
///     .map(|(i, &(x, y))| Node::new(i, DVec2::new(x, y), RegionKind::Natural, 3.0))
///     .collect();
///
/// let edges = triangulate(&nodes);
/// assert_eq!(edges, vec![Line::new(0, 1), Line::new(0, 2), Line::new(1, 2)]);
/// ```
pub fn triangulate(nodes: &[Node]) -> Vec<Line> {
    let n = nodes.len();
    if n < 3 {
        return Vec::new();
    }

    let mut points: Vec<DVec2> = nodes.iter().map(|node| node.position).collect();
    points.push(DVec2::new(-SUPER_EXTENT, -SUPER_EXTENT));
    points.push(DVec2::new(3.0 * SUPER_EXTENT, -SUPER_EXTENT));
    points.push(DVec2::new(-SUPER_EXTENT, 3.0 * SUPER_EXTENT));

    let mut triangles = vec![Triangle::new([n, n + 1, n + 2], &points)];

    for index in 0..n {
        let p = points[index];
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|t| t.circumcircle_contains(p));

        triangles = good;
        for (a, b) in boundary_edges(&bad) {
            triangles.push(Triangle::new([a, b, index], &points));
        }
    }

    let edges: BTreeSet<Line> = triangles
        .iter()
        .filter(|t| t.vertices.iter().all(|&v| v < n))
        .flat_map(|t| t.edges())
        .map(|(a, b)| Line::new(a, b))
        .collect();

    edges.into_iter().collect()
}

/// Edges belonging to exactly one bad triangle, in encounter order
fn boundary_edges(bad: &[Triangle]) -> Vec<(usize, usize)> {
    let mut counts: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for triangle in bad {
        for (a, b) in triangle.edges() {
            *counts.entry(edge_key(a, b)).or_insert(0) += 1;
        }
    }

    bad.iter()
        .flat_map(|t| t.edges())
        .filter(|&(a, b)| counts[&edge_key(a, b)] == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RegionKind;

    fn nodes(points: &[(f64, f64)]) -> Vec<Node> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Node::new(i, DVec2::new(x, y), RegionKind::Natural, 3.0))
            .collect()
    }

    #[test]
    fn test_too_few_nodes() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&nodes(&[(1.0, 1.0), (5.0, 5.0)])).is_empty());
    }

    #[test]
    fn test_square_with_center() {
        // Four corners around a center point: 4 spokes + 4 hull edges
        let nodes = nodes(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (5.0, 5.0),
        ]);
        let edges = triangulate(&nodes);
        assert_eq!(edges.len(), 8);
        for corner in 0..4 {
            assert!(edges.contains(&Line::new(corner, 4)));
        }
        assert!(edges.contains(&Line::new(0, 1)));
        assert!(edges.contains(&Line::new(1, 2)));
        assert!(edges.contains(&Line::new(2, 3)));
        assert!(edges.contains(&Line::new(0, 3)));
    }

    #[test]
    fn test_picks_delaunay_diagonal() {
        // Flat quad: the short diagonal (1,3) is Delaunay, the long one (0,2) is not
        let nodes = nodes(&[(0.0, 5.0), (10.0, 4.0), (20.0, 5.0), (10.0, 6.0)]);
        let edges = triangulate(&nodes);
        assert!(edges.contains(&Line::new(1, 3)));
        assert!(!edges.contains(&Line::new(0, 2)));
        assert_eq!(edges.len(), 5);
    }

    fn strictly_inside_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
        let d1 = (b - a).perp_dot(p - a);
        let d2 = (c - b).perp_dot(p - b);
        let d3 = (a - c).perp_dot(p - c);
        (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
    }

    #[test]
    fn test_faces_have_empty_circumcircles() {
        let nodes = nodes(&[
            (3.0, 4.0),
            (17.0, 2.5),
            (9.5, 11.0),
            (25.0, 14.0),
            (4.0, 22.0),
            (15.0, 27.0),
            (27.0, 26.0),
            (12.0, 18.0),
        ]);
        let set: BTreeSet<Line> = triangulate(&nodes).into_iter().collect();
        let mut faces = 0;

        for a in 0..nodes.len() {
            for b in (a + 1)..nodes.len() {
                for c in (b + 1)..nodes.len() {
                    let connected = set.contains(&Line::new(a, b))
                        && set.contains(&Line::new(b, c))
                        && set.contains(&Line::new(a, c));
                    let (pa, pb, pc) = (nodes[a].position, nodes[b].position, nodes[c].position);
                    // A 3-cycle with nothing inside it is a face of the triangulation
                    let empty = !nodes
                        .iter()
                        .any(|n| strictly_inside_triangle(n.position, pa, pb, pc));
                    if !(connected && empty) {
                        continue;
                    }
                    faces += 1;

                    let (center, r_sq) = circumcircle(pa, pb, pc);
                    for n in &nodes {
                        if n.id == a || n.id == b || n.id == c {
                            continue;
                        }
                        assert!(
                            n.position.distance_squared(center) >= r_sq - 1e-6,
                            "node {} inside circumcircle of face ({}, {}, {})",
                            n.id,
                            a,
                            b,
                            c
                        );
                    }
                }
            }
        }

        // Euler: a triangulation of n points with h on the hull has 2n - 2 - h faces
        assert!(faces >= nodes.len() - 2);
    }

    #[test]
    fn test_insertion_order_does_not_change_edges() {
        let forward = nodes(&[(2.0, 3.0), (14.0, 5.0), (8.0, 12.0), (20.0, 18.0), (5.0, 19.0)]);
        let edges = triangulate(&forward);

        // Same points, reversed ids
        let reversed: Vec<Node> = forward
            .iter()
            .rev()
            .enumerate()
            .map(|(i, n)| Node::new(i, n.position, n.kind, n.influence))
            .collect();
        let last = forward.len() - 1;
        let mut remapped: Vec<Line> = triangulate(&reversed)
            .into_iter()
            .map(|l| Line::new(last - l.from, last - l.to))
            .collect();
        remapped.sort_unstable();

        assert_eq!(edges, remapped);
    }
}
