//! Walls: detection on the tile grid and tracing into ordered curves

mod detect;
mod trace;

pub use detect::detect_walls;
pub use trace::trace_walls;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, TileId};

/// An ordered run of adjacent wall tiles
///
/// Consecutive key points are 8-adjacent. A loop repeats its first tile at the
/// end; an open curve never repeats a tile.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    /// Wall tiles in walking order
    pub key_points: Vec<TileId>,

    /// Whether the last key point closes back onto the first
    pub is_loop: bool,
}

impl Curve {
    /// Number of key points
    #[inline]
    pub fn len(&self) -> usize {
        self.key_points.len()
    }

    /// Whether the curve has no key points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.key_points.is_empty()
    }

    /// Key points as tile coordinates
    ///
    /// # Example
    ///
    /// ```
    /// use rust_graph_dungeon::*;
    ///
    /// let grid = Grid::new(4, 4);
    /// let curve = Curve {
    ///     key_points: vec![grid.index(1, 1).unwrap(), grid.index(2, 1).unwrap()],
    ///     is_loop: false,
    /// };
    /// assert_eq!(curve.points(&grid).collect::<Vec<_>>(), vec![(1, 1), (2, 1)]);
    /// ```
    pub fn points<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = (i32, i32)> + 'a {
        self.key_points.iter().map(move |&id| grid.tile(id).coord())
    }
}
