//! Dungeon nodes and the pathways between them
//!
//! A node is the seed of a region: a point on the map plus the kind of space
//! that will be grown around it. Lines connect nodes by id.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a node in [`Dungeon::nodes`](crate::Dungeon::nodes)
pub type NodeId = usize;

/// How a node's region is populated
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionKind {
    /// Rectangular room
    Artificial,
    /// Cellular-automaton cave
    #[default]
    Natural,
    /// Cave with a room carved into it
    Hybrid,
}

impl RegionKind {
    /// Whether this kind grows a cave
    pub fn grows_cave(self) -> bool {
        matches!(self, RegionKind::Natural | RegionKind::Hybrid)
    }

    /// Whether this kind grows a rectangular room
    pub fn grows_room(self) -> bool {
        matches!(self, RegionKind::Artificial | RegionKind::Hybrid)
    }
}

/// A room or cave seed
///
/// Node ids are stable and deterministic: the same configuration always
/// yields the same nodes in the same order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Position in the node list (0 to node_count-1)
    pub id: NodeId,

    /// Position in tile space (tiles are centred on integer coordinates)
    pub position: DVec2,

    /// Which fill strategy the region uses
    pub kind: RegionKind,

    /// Maximum half-extent, in tiles, a room may grow to from this node
    pub influence: f64,
}

impl Node {
    /// Create a new node
    pub fn new(id: NodeId, position: DVec2, kind: RegionKind, influence: f64) -> Self {
        Self {
            id,
            position,
            kind,
            influence,
        }
    }

    /// Tile this node sits on
    #[inline]
    pub fn tile(&self) -> (i32, i32) {
        crate::geometry::tile_coord(self.position)
    }

    /// Squared Euclidean distance to another node
    #[inline]
    pub fn distance_sq(&self, other: &Node) -> f64 {
        self.position.distance_squared(other.position)
    }
}

/// An undirected pathway between two distinct nodes
///
/// Stored normalized (`from < to`) so two lines over the same pair compare
/// equal regardless of construction order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line {
    /// Lower node id
    pub from: NodeId,
    /// Higher node id
    pub to: NodeId,
}

impl Line {
    /// Create a line between two nodes
    ///
    /// # Panics
    ///
    /// Panics if `a == b`; a pathway from a node to itself is a programming error.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        assert_ne!(a, b, "line endpoints must be distinct nodes");
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    /// Whether the line touches `node`
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// Squared length given the node list
    #[inline]
    pub fn length_sq(&self, nodes: &[Node]) -> f64 {
        nodes[self.from].distance_sq(&nodes[self.to])
    }
}
