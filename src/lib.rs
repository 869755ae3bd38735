//! Graph-based 2D dungeon generation
//!
//! A standalone library for generating deterministic dungeon layouts: nodes
//! joined by pathways, rasterized onto a tile grid, grown into caves and rooms,
//! with wall outlines traced into ordered curves for any renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_graph_dungeon::*;
//!
//! // Generate a dungeon
//! let config = DungeonConfigBuilder::new()
//!     .seed(42)
//!     .node_count(10).unwrap()
//!     .size(64, 48).unwrap()
//!     .connectivity(40.0).unwrap()
//!     .build().unwrap();
//!
//! let mut dungeon = Dungeon::generate(config).unwrap();
//! println!("{}", dungeon.grid().to_ascii());
//!
//! // Add loops without moving any node
//! dungeon.set_connectivity(90.0).unwrap();
//! dungeon.generate_remaining();
//! for curve in dungeon.walls() {
//!     let points: Vec<(i32, i32)> = curve.points(dungeon.grid()).collect();
//!     assert!(!points.is_empty());
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree lookups when assigning tiles to nodes
//! - `serde`: Serialization support for configuration and generated output

// Modules
pub mod error;
pub mod config;
pub mod rng;
pub mod geometry;
pub mod node;
pub mod generation;
pub mod grid;
pub mod raster;
pub mod populate;
pub mod walls;
pub mod dungeon;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{DungeonError, Result};
pub use config::{DungeonConfig, DungeonConfigBuilder};
pub use rng::{Seed, SeededRng};
pub use node::{Line, Node, NodeId, RegionKind};
pub use generation::{GraphStages, Stage};
pub use grid::{Grid, Tile, TileId};
pub use walls::Curve;
pub use dungeon::Dungeon;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
