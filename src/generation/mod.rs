//! Node placement and graph construction
//!
//! Places nodes with spaced sampling, triangulates them (Bowyer-Watson) and
//! reduces the triangulation through the Gabriel graph, the relative
//! neighbourhood graph and the minimum spanning tree. The connectivity filter
//! then picks the final set of pathways.

mod placement;
mod delaunay;
mod filters;
mod mst;
mod connectivity;

pub use placement::place_nodes;
pub use delaunay::triangulate;
pub use filters::{gabriel_graph, relative_neighbourhood_graph};
pub use mst::minimum_spanning_tree;
pub use connectivity::filter_connectivity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{Line, Node};

/// Pipeline stages, in execution order
///
/// Re-running a stage only touches that stage's output, so the dungeon can be
/// regenerated from any stage onward without disturbing the ones before it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Place the nodes
    PlaceNodes,
    /// Triangulate and reduce to Gabriel / RN / MST
    BuildGraph,
    /// Choose the final pathways from the graph stages
    FilterConnectivity,
    /// Rasterize pathways onto the grid
    Rasterize,
    /// Assign territories and grow caves and rooms
    Populate,
    /// Mark wall tiles
    DetectWalls,
    /// Trace wall tiles into curves
    TraceWalls,
}

impl Stage {
    /// Number of stages
    pub const COUNT: usize = 7;

    /// All stages in execution order
    pub const ALL: [Stage; Stage::COUNT] = [
        Stage::PlaceNodes,
        Stage::BuildGraph,
        Stage::FilterConnectivity,
        Stage::Rasterize,
        Stage::Populate,
        Stage::DetectWalls,
        Stage::TraceWalls,
    ];

    /// Position in [`Stage::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stage after this one, if any
    pub fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.index() + 1).copied()
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Stage::PlaceNodes => "place nodes",
            Stage::BuildGraph => "build graph",
            Stage::FilterConnectivity => "filter connectivity",
            Stage::Rasterize => "rasterize",
            Stage::Populate => "populate",
            Stage::DetectWalls => "detect walls",
            Stage::TraceWalls => "trace walls",
        }
    }
}

/// Edge sets produced by the graph builder
///
/// Each set is sorted and is a subset of the one before it:
/// `delaunay ⊇ gabriel ⊇ relative_neighbourhood ⊇ spanning_tree`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStages {
    /// Delaunay triangulation edges
    pub delaunay: Vec<Line>,
    /// Gabriel graph edges
    pub gabriel: Vec<Line>,
    /// Relative neighbourhood graph edges
    pub relative_neighbourhood: Vec<Line>,
    /// Minimum spanning tree edges
    pub spanning_tree: Vec<Line>,
}

/// Build all graph stages for a node set
///
/// When the triangulation is empty but there are at least two nodes (two
/// nodes, or every node on one line) the nodes are chained in `(x, y)` order
/// instead, which for two nodes is the single direct edge.
pub fn build_graph(nodes: &[Node]) -> GraphStages {
    let mut delaunay = triangulate(nodes);
    if delaunay.is_empty() && nodes.len() >= 2 {
        delaunay = chain_fallback(nodes);
        tracing::debug!(nodes = nodes.len(), "degenerate triangulation, chaining nodes");
    }

    let gabriel = gabriel_graph(&delaunay, nodes);
    let relative_neighbourhood = relative_neighbourhood_graph(&gabriel, nodes);
    let spanning_tree = minimum_spanning_tree(&relative_neighbourhood, nodes);

    GraphStages {
        delaunay,
        gabriel,
        relative_neighbourhood,
        spanning_tree,
    }
}

/// Connect nodes in `(x, y)` order
fn chain_fallback(nodes: &[Node]) -> Vec<Line> {
    let mut order: Vec<&Node> = nodes.iter().collect();
    order.sort_by(|a, b| {
        a.position
            .x
            .total_cmp(&b.position.x)
            .then(a.position.y.total_cmp(&b.position.y))
            .then(a.id.cmp(&b.id))
    });

    let mut lines: Vec<Line> = order
        .windows(2)
        .map(|pair| Line::new(pair[0].id, pair[1].id))
        .collect();
    lines.sort_unstable();
    lines
}
