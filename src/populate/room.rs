//! Rectangular rooms grown from a node's tile

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::grid::Grid;
use crate::node::{Node, NodeId};
use crate::rng::SeededRng;

/// Rooms keep this many tiles between themselves and the grid border
const BORDER_MARGIN: i32 = 3;
/// Chance that a grown room gets trimmed
const SHRINK_CHANCE: f64 = 0.75;

/// Inclusive tile bounds of a room
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomBounds {
    /// Leftmost column
    pub left: i32,
    /// Topmost row
    pub top: i32,
    /// Rightmost column
    pub right: i32,
    /// Bottom row
    pub bottom: i32,
}

impl RoomBounds {
    fn at(x: i32, y: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    /// Width in tiles
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Height in tiles
    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    /// Whether tile `(x, y)` lies inside the bounds
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

/// Grow a room inside `node`'s territory and floor it
///
/// The rectangle starts on the node's tile and expands one side at a time,
/// cycling in one of two fixed orders, as long as the new row or column lies
/// entirely in the territory, keeps clear of the border and stays within the
/// node's influence. Most rooms are then trimmed by a random amount on each
/// side. Returns `None` (and floors nothing) when the node's tile is outside
/// its own territory or too close to the border.
pub fn grow_room(grid: &mut Grid, node: &Node, rng: &mut SeededRng) -> Option<RoomBounds> {
    let (cx, cy) = node.tile();
    let top_left_first = rng.next() < 0.5;
    let shrink = rng.next() < SHRINK_CHANCE;

    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let fits = cx >= BORDER_MARGIN
        && cy >= BORDER_MARGIN
        && cx < width - BORDER_MARGIN
        && cy < height - BORDER_MARGIN
        && grid.get(cx, cy).is_some_and(|t| t.region == Some(node.id));
    if !fits {
        trace!(node = node.id, x = cx, y = cy, "room seed unusable, left unfilled");
        return None;
    }

    let reach = node.influence.max(0.0).floor() as i32;
    let order = if top_left_first {
        [Side::Top, Side::Left, Side::Bottom, Side::Right]
    } else {
        [Side::Bottom, Side::Right, Side::Top, Side::Left]
    };

    let mut bounds = RoomBounds::at(cx, cy);
    loop {
        let mut grew = false;
        for side in order {
            if let Some(next) = expanded(grid, &bounds, side, node.id, reach, (cx, cy)) {
                bounds = next;
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    if shrink {
        bounds.top += trim(rng, cy - bounds.top);
        bounds.left += trim(rng, cx - bounds.left);
        bounds.bottom -= trim(rng, bounds.bottom - cy);
        bounds.right -= trim(rng, bounds.right - cx);
    }

    for y in bounds.top..=bounds.bottom {
        for x in bounds.left..=bounds.right {
            if let Some(tile) = grid.get_mut(x, y) {
                if tile.region == Some(node.id) {
                    tile.is_floor = true;
                }
            }
        }
    }

    trace!(
        node = node.id,
        width = bounds.width(),
        height = bounds.height(),
        "room grown"
    );
    Some(bounds)
}

/// Bounds grown by one on `side`, if the new strip is acceptable
fn expanded(
    grid: &Grid,
    bounds: &RoomBounds,
    side: Side,
    region: NodeId,
    reach: i32,
    (cx, cy): (i32, i32),
) -> Option<RoomBounds> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut next = *bounds;

    let (in_border, in_reach) = match side {
        Side::Top => {
            next.top -= 1;
            (next.top >= BORDER_MARGIN, cy - next.top <= reach)
        }
        Side::Left => {
            next.left -= 1;
            (next.left >= BORDER_MARGIN, cx - next.left <= reach)
        }
        Side::Bottom => {
            next.bottom += 1;
            (next.bottom < height - BORDER_MARGIN, next.bottom - cy <= reach)
        }
        Side::Right => {
            next.right += 1;
            (next.right < width - BORDER_MARGIN, next.right - cx <= reach)
        }
    };
    if !in_border || !in_reach {
        return None;
    }

    let owned = |x: i32, y: i32| grid.get(x, y).is_some_and(|t| t.region == Some(region));
    let strip_owned = match side {
        Side::Top => (next.left..=next.right).all(|x| owned(x, next.top)),
        Side::Bottom => (next.left..=next.right).all(|x| owned(x, next.bottom)),
        Side::Left => (next.top..=next.bottom).all(|y| owned(next.left, y)),
        Side::Right => (next.top..=next.bottom).all(|y| owned(next.right, y)),
    };
    strip_owned.then_some(next)
}

/// Random trim in `0..=distance / 2`
fn trim(rng: &mut SeededRng, distance: i32) -> i32 {
    rng.next_int_in_range(0, (distance / 2 + 1) as i64) as i32
}
