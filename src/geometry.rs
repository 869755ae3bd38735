//! 2-D geometry primitives
//!
//! Points are `glam::DVec2`; f64 keeps the Bowyer-Watson super-triangle
//! (coordinates near one million) precise next to tile-sized coordinates.

use glam::DVec2;

/// Midpoint of a segment
#[inline]
pub fn midpoint(a: DVec2, b: DVec2) -> DVec2 {
    (a + b) * 0.5
}

/// Tile coordinate a point falls in (tiles are centred on integer coordinates)
#[inline]
pub fn tile_coord(p: DVec2) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Circle through three points, as `(center, radius_sq)`
///
/// Collinear (or coincident) points have no finite circumcircle; they return
/// an infinite radius so every point tests as inside.
pub fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> (DVec2, f64) {
    // Work relative to `a` to keep magnitudes small
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp_dot(ac);
    if d.abs() < 1e-12 {
        return (a, f64::INFINITY);
    }

    let ab_sq = ab.length_squared();
    let ac_sq = ac.length_squared();
    let offset = DVec2::new(
        (ac.y * ab_sq - ab.y * ac_sq) / d,
        (ab.x * ac_sq - ac.x * ab_sq) / d,
    );

    (a + offset, offset.length_squared())
}
