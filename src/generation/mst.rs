//! Minimum spanning tree over a candidate edge set
//!
//! Prim's algorithm over a pre-sorted edge list: the tree grows from one node
//! by repeatedly taking the shortest edge that leaves the visited set.

use std::collections::BTreeSet;

use crate::node::{Line, Node, NodeId};

/// Minimum spanning tree of `edges`
///
/// Edges are sorted by squared length, ties broken by line order, so the
/// result does not depend on input order. The tree grows from the smallest
/// node id that appears in `edges` and stops once every node is visited or no
/// edge leaves the visited set (a disconnected candidate set yields the tree
/// of the first component only).
pub fn minimum_spanning_tree(edges: &[Line], nodes: &[Node]) -> Vec<Line> {
    let mut remaining: Vec<(f64, Line)> = edges
        .iter()
        .map(|&line| (line.length_sq(nodes), line))
        .collect();
    remaining.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    remaining.dedup_by(|a, b| a.1 == b.1);

    let Some(root) = remaining.iter().map(|(_, line)| line.from).min() else {
        return Vec::new();
    };

    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    visited.insert(root);
    let mut tree = Vec::with_capacity(nodes.len().saturating_sub(1));

    while visited.len() < nodes.len() {
        let next = remaining.iter().position(|(_, line)| {
            visited.contains(&line.from) != visited.contains(&line.to)
        });
        let Some(index) = next else {
            break;
        };

        let (_, line) = remaining.remove(index);
        let far = if visited.contains(&line.from) {
            line.to
        } else {
            line.from
        };
        visited.insert(far);
        tree.push(line);

        // Edges between two visited nodes can never join the tree
        remaining.retain(|(_, l)| !(visited.contains(&l.from) && visited.contains(&l.to)));
    }

    tree.sort_unstable();
    tree
}
