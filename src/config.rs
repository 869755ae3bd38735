//! Dungeon configuration and builder
//!
//! This module provides configuration types for deterministic dungeon generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::rng::Seed;

/// Smallest accepted grid side, in tiles
///
/// Rooms keep 3 tiles from the border, so anything smaller leaves no space.
pub const MIN_DIMENSION: usize = 8;

/// Below this side length node placement and room growth tend to starve
pub const RECOMMENDED_DIMENSION: usize = 20;

/// Configuration for deterministic dungeon generation
///
/// The same configuration always produces the identical dungeon.
///
/// # Example
///
/// ```rust
/// use rust_graph_dungeon::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .node_count(8)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DungeonConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DungeonConfig {
    /// Random seed; every stage derives its own stream from it
    pub seed: Seed,

    /// Number of nodes (rooms and caves) to place
    pub node_count: usize,

    /// Grid width in tiles
    pub width: usize,

    /// Grid height in tiles
    pub height: usize,

    /// How many extra pathways to keep beyond the spanning tree, 0 to 100
    ///
    /// - 0: spanning tree only
    /// - 50: the whole relative neighbourhood graph
    /// - 100: the whole Gabriel graph
    pub connectivity: f64,

    /// Probability that a node becomes a rectangular room
    pub artificial_ratio: f64,

    /// Probability that a node becomes a cave with a room carved into it
    ///
    /// Whatever remains after `artificial_ratio + hybrid_ratio` becomes a cave.
    pub hybrid_ratio: f64,

    /// Lower bound of a node's room half-extent, in tiles
    pub room_extent_min: f64,

    /// Upper bound of a node's room half-extent, in tiles
    pub room_extent_max: f64,

    /// Cellular automaton iterations per cave
    pub cave_iterations: usize,

    /// Chance an interior cave tile starts as floor
    pub cave_fill_probability: f64,
}

impl DungeonConfig {
    /// Check every field and the relations between them
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        check_node_count(self.node_count)?;
        check_dimension("width", self.width)?;
        check_dimension("height", self.height)?;
        check_connectivity(self.connectivity)?;
        check_probability("artificial ratio", self.artificial_ratio)?;
        check_probability("hybrid ratio", self.hybrid_ratio)?;
        check_probability("cave fill probability", self.cave_fill_probability)?;

        if self.artificial_ratio + self.hybrid_ratio > 1.0 {
            return Err(DungeonError::InvalidConfig(format!(
                "artificial ratio + hybrid ratio must be <= 1 (got {})",
                self.artificial_ratio + self.hybrid_ratio
            )));
        }
        if !(self.room_extent_min >= 0.0 && self.room_extent_min <= self.room_extent_max) {
            return Err(DungeonError::InvalidConfig(format!(
                "room extent range must satisfy 0 <= min <= max (got {}..{})",
                self.room_extent_min, self.room_extent_max
            )));
        }
        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        DungeonConfigBuilder::new().build().unwrap()
    }
}

fn check_node_count(count: usize) -> Result<()> {
    if count < 2 {
        return Err(DungeonError::InvalidConfig(format!(
            "node count must be >= 2 (got {})",
            count
        )));
    }
    Ok(())
}

fn check_dimension(name: &str, value: usize) -> Result<()> {
    if value < MIN_DIMENSION {
        return Err(DungeonError::InvalidConfig(format!(
            "{} must be >= {} (got {})",
            name, MIN_DIMENSION, value
        )));
    }
    if value < RECOMMENDED_DIMENSION {
        tracing::warn!(
            dimension = name,
            value,
            recommended = RECOMMENDED_DIMENSION,
            "small grid; node placement and room growth may starve"
        );
    }
    Ok(())
}

fn check_connectivity(connectivity: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&connectivity) {
        return Err(DungeonError::InvalidConfig(format!(
            "connectivity must be within 0..=100 (got {})",
            connectivity
        )));
    }
    Ok(())
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DungeonError::InvalidConfig(format!(
            "{} must be within 0..=1 (got {})",
            name, value
        )));
    }
    Ok(())
}

/// Builder for creating DungeonConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_graph_dungeon::*;
///
/// // Use defaults
/// let config = DungeonConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = DungeonConfigBuilder::new()
///     .seed("crypt of the fallen")
///     .size(80, 60)
///     .unwrap()
///     .node_count(14)
///     .unwrap()
///     .connectivity(60.0)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.width, 80);
/// ```
#[derive(Debug, Clone)]
pub struct DungeonConfigBuilder {
    seed: Option<Seed>,
    node_count: usize,
    width: usize,
    height: usize,
    connectivity: f64,
    artificial_ratio: f64,
    hybrid_ratio: f64,
    room_extent_min: f64,
    room_extent_max: f64,
    cave_iterations: usize,
    cave_fill_probability: f64,
}

impl DungeonConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - node_count: 12
    /// - size: 64 x 48
    /// - connectivity: 25
    /// - artificial_ratio: 0.5, hybrid_ratio: 0.1
    /// - room extent: 3..8 tiles
    /// - cave: 8 iterations, 0.5 fill probability
    pub fn new() -> Self {
        Self {
            seed: None,
            node_count: 12,
            width: 64,
            height: 48,
            connectivity: 25.0,
            artificial_ratio: 0.5,
            hybrid_ratio: 0.1,
            room_extent_min: 3.0,
            room_extent_max: 8.0,
            cave_iterations: 8,
            cave_fill_probability: 0.5,
        }
    }

    /// Set the random seed (number or text)
    pub fn seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Set the number of nodes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count < 2
    pub fn node_count(mut self, count: usize) -> Result<Self> {
        check_node_count(count)?;
        self.node_count = count;
        Ok(self)
    }

    /// Set the grid size in tiles
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either side is below [`MIN_DIMENSION`]
    pub fn size(mut self, width: usize, height: usize) -> Result<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Set the connectivity percentage
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if outside 0..=100 (or NaN)
    pub fn connectivity(mut self, connectivity: f64) -> Result<Self> {
        check_connectivity(connectivity)?;
        self.connectivity = connectivity;
        Ok(self)
    }

    /// Set the room and hybrid probabilities; the remainder becomes caves
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either is outside 0..=1 or their sum exceeds 1
    pub fn region_mix(mut self, artificial_ratio: f64, hybrid_ratio: f64) -> Result<Self> {
        check_probability("artificial ratio", artificial_ratio)?;
        check_probability("hybrid ratio", hybrid_ratio)?;
        if artificial_ratio + hybrid_ratio > 1.0 {
            return Err(DungeonError::InvalidConfig(format!(
                "artificial ratio + hybrid ratio must be <= 1 (got {})",
                artificial_ratio + hybrid_ratio
            )));
        }
        self.artificial_ratio = artificial_ratio;
        self.hybrid_ratio = hybrid_ratio;
        Ok(self)
    }

    /// Set the range rooms draw their half-extent from
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min is negative or greater than max
    pub fn room_extent(mut self, min: f64, max: f64) -> Result<Self> {
        if !(min >= 0.0 && min <= max) {
            return Err(DungeonError::InvalidConfig(format!(
                "room extent range must satisfy 0 <= min <= max (got {}..{})",
                min, max
            )));
        }
        self.room_extent_min = min;
        self.room_extent_max = max;
        Ok(self)
    }

    /// Set the number of cellular automaton iterations for caves
    pub fn cave_iterations(mut self, iterations: usize) -> Self {
        self.cave_iterations = iterations;
        self
    }

    /// Set the initial floor probability for cave tiles
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if outside 0..=1
    pub fn cave_fill_probability(mut self, probability: f64) -> Result<Self> {
        check_probability("cave fill probability", probability)?;
        self.cave_fill_probability = probability;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<DungeonConfig> {
        let seed = self.seed.unwrap_or_else(|| Seed::Number(rand::random()));

        let config = DungeonConfig {
            seed,
            node_count: self.node_count,
            width: self.width,
            height: self.height,
            connectivity: self.connectivity,
            artificial_ratio: self.artificial_ratio,
            hybrid_ratio: self.hybrid_ratio,
            room_extent_min: self.room_extent_min,
            room_extent_max: self.room_extent_max,
            cave_iterations: self.cave_iterations,
            cave_fill_probability: self.cave_fill_probability,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for DungeonConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
