//! Tile grid
//!
//! A fixed `width × height` array of tiles in row-major order. Adjacency is
//! computed once at construction and never changes afterward.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Flat index of a tile in [`Grid::tiles`]
pub type TileId = usize;

/// Neighbour offsets in enumeration order: N, E, S, W, then NE, SE, SW, NW
///
/// The order is load-bearing: wall detection and curve tracing break ties by
/// first match in this order. `y` grows downward.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// One grid cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Walkable
    pub is_floor: bool,
    /// Borders floor; may be set together with `is_floor`
    pub is_wall: bool,
    /// Marked by the pathway rasterizer
    pub is_path: bool,
    /// Consumed by the wall tracer
    pub visited: bool,
    /// Node whose territory (or, for walls, whose floor) this tile belongs to
    pub region: Option<NodeId>,
    neighbours: Vec<TileId>,
    orthogonal: usize,
}

impl Tile {
    /// All in-grid neighbours, orthogonal ones first
    #[inline]
    pub fn neighbours(&self) -> &[TileId] {
        &self.neighbours
    }

    /// In-grid N, E, S, W neighbours
    #[inline]
    pub fn orthogonal_neighbours(&self) -> &[TileId] {
        &self.neighbours[..self.orthogonal]
    }

    /// In-grid NE, SE, SW, NW neighbours
    #[inline]
    pub fn diagonal_neighbours(&self) -> &[TileId] {
        &self.neighbours[self.orthogonal..]
    }

    /// Coordinates as a pair
    #[inline]
    pub fn coord(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Rectangular tile grid
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid of blank tiles with adjacency filled in
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let in_bounds = |dx: i32, dy: i32| {
                    let (nx, ny) = (x + dx, y + dy);
                    nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height
                };

                let orthogonal = NEIGHBOUR_OFFSETS[..4]
                    .iter()
                    .filter(|&&(dx, dy)| in_bounds(dx, dy))
                    .count();
                let neighbours = NEIGHBOUR_OFFSETS
                    .iter()
                    .filter(|&&(dx, dy)| in_bounds(dx, dy))
                    .map(|&(dx, dy)| (y + dy) as usize * width + (x + dx) as usize)
                    .collect();

                tiles.push(Tile {
                    x,
                    y,
                    is_floor: false,
                    is_wall: false,
                    is_path: false,
                    visited: false,
                    region: None,
                    neighbours,
                    orthogonal,
                });
            }
        }

        Self {
            width,
            height,
            tiles,
        }
    }

    /// Width in tiles
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All tiles in row-major order
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Flat index of `(x, y)`, or `None` outside the grid
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<TileId> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Tile at `(x, y)`
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|id| &self.tiles[id])
    }

    /// Mutable tile at `(x, y)`
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(move |id| &mut self.tiles[id])
    }

    /// Tile by flat index
    #[inline]
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id]
    }

    /// Mutable tile by flat index
    #[inline]
    pub fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id]
    }

    /// Whether `(x, y)` is floor; outside the grid counts as solid
    #[inline]
    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|t| t.is_floor)
    }

    /// Mark `(x, y)` as rasterized floor; ignored outside the grid
    pub fn mark_path(&mut self, x: i32, y: i32) -> bool {
        match self.get_mut(x, y) {
            Some(tile) => {
                tile.is_floor = true;
                tile.is_path = true;
                true
            }
            None => false,
        }
    }

    /// Clear every per-generation flag and region, keeping adjacency
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.is_floor = false;
            tile.is_wall = false;
            tile.is_path = false;
            tile.visited = false;
            tile.region = None;
        }
    }

    /// Number of floor tiles
    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_floor).count()
    }

    /// Number of wall tiles
    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_wall).count()
    }

    /// Text dump: `#` wall, `.` floor, space otherwise; one line per row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width) {
            for tile in row {
                out.push(if tile.is_wall {
                    '#'
                } else if tile.is_floor {
                    '.'
                } else {
                    ' '
                });
            }
            out.push('\n');
        }
        out
    }
}
