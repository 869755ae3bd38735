//! Pathway rasterization
//!
//! Lines are stepped column by column in the non-steep orientation (axes are
//! swapped for steep lines), marking the nearest row plus its neighbour on the
//! side the line leans toward. Lines running close to a row centre also get
//! the opposite neighbour, so corridors are two or three tiles wide and never
//! have diagonal-only gaps.

use glam::DVec2;

use crate::geometry::tile_coord;
use crate::grid::Grid;
use crate::node::{Line, Node};

/// Past this distance from the row centre the line is treated as lying on a
/// tile boundary and only gets two rows
const BOUNDARY_BAND: f64 = 0.4;

/// Mark every tile touched by the segment `a`-`b` as path floor
///
/// Returns the in-grid tiles marked, in marking order (may repeat).
pub fn rasterize_line(grid: &mut Grid, a: DVec2, b: DVec2) -> Vec<(i32, i32)> {
    let mut marked = Vec::new();
    let mut mark = |grid: &mut Grid, x: i32, y: i32| {
        if grid.mark_path(x, y) {
            marked.push((x, y));
        }
    };

    let (ax, ay) = tile_coord(a);
    let (bx, by) = tile_coord(b);
    mark(grid, ax, ay);
    mark(grid, bx, by);

    let (mut x0, mut y0, mut x1, mut y1) = (a.x, a.y, b.x, b.y);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    if dx <= f64::EPSILON {
        return marked;
    }
    let gradient = (y1 - y0) / dx;

    for column in (x0.round() as i32)..=(x1.round() as i32) {
        let y = y0 + gradient * (column as f64 - x0);
        for r in covered_rows(y, gradient).into_iter().flatten() {
            let (x, y) = if steep { (r, column) } else { (column, r) };
            mark(grid, x, y);
        }
    }

    marked
}

/// Rows marked for a column where the line sits at height `y`
///
/// The nearest row and the neighbour the line leans toward are always marked.
/// The opposite neighbour is added unless the line is within the boundary band.
fn covered_rows(y: f64, gradient: f64) -> [Option<i32>; 3] {
    let nearest = y.round();
    let frac = y - nearest;
    let lean = if frac > 0.0 {
        1
    } else if frac < 0.0 {
        -1
    } else if gradient >= 0.0 {
        1
    } else {
        -1
    };

    let row = nearest as i32;
    let mut rows = [Some(row), Some(row + lean), None];
    if frac.abs() < BOUNDARY_BAND {
        rows[2] = Some(row - lean);
    }
    rows
}

/// Rasterize every line between its endpoint nodes
///
/// Returns the number of tile marks made.
///
/// # Panics
///
/// Panics if a line references a node outside `nodes`.
pub fn rasterize_lines(grid: &mut Grid, nodes: &[Node], lines: &[Line]) -> usize {
    lines
        .iter()
        .map(|line| {
            assert!(
                line.from < nodes.len() && line.to < nodes.len(),
                "line {:?} references a node outside the node list ({} nodes)",
                line,
                nodes.len()
            );
            rasterize_line(grid, nodes[line.from].position, nodes[line.to].position).len()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RegionKind;
    use std::collections::BTreeSet;

    /// Marked tiles form one 8-connected blob containing both endpoints
    fn assert_gap_free(marked: &[(i32, i32)], a: (i32, i32), b: (i32, i32)) {
        let set: BTreeSet<(i32, i32)> = marked.iter().copied().collect();
        assert!(set.contains(&a) && set.contains(&b));

        let mut seen = BTreeSet::new();
        let mut stack = vec![a];
        seen.insert(a);
        while let Some((x, y)) = stack.pop() {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let n = (x + dx, y + dy);
                    if set.contains(&n) && seen.insert(n) {
                        stack.push(n);
                    }
                }
            }
        }
        assert_eq!(seen.len(), set.len(), "rasterized line has a gap");
    }

    #[test]
    fn test_horizontal_line() {
        let mut grid = Grid::new(20, 10);
        let marked = rasterize_line(&mut grid, DVec2::new(3.0, 5.0), DVec2::new(15.0, 5.0));
        assert_gap_free(&marked, (3, 5), (15, 5));
        // On a row centre: three rows thick
        for x in 3..=15 {
            assert!(grid.is_floor(x, 4) && grid.is_floor(x, 5) && grid.is_floor(x, 6));
        }
        assert!(!grid.is_floor(2, 5));
        assert!(!grid.is_floor(16, 5));
    }

    #[test]
    fn test_vertical_line() {
        let mut grid = Grid::new(15, 20);
        let marked = rasterize_line(&mut grid, DVec2::new(7.0, 18.0), DVec2::new(7.0, 2.0));
        assert_gap_free(&marked, (7, 18), (7, 2));
        for y in 2..=18 {
            assert!(grid.is_floor(7, y));
        }
    }

    #[test]
    fn test_diagonal_line() {
        let mut grid = Grid::new(20, 20);
        let marked = rasterize_line(&mut grid, DVec2::new(2.0, 2.0), DVec2::new(14.0, 14.0));
        assert_gap_free(&marked, (2, 2), (14, 14));
        for i in 2..=14 {
            assert!(grid.is_floor(i, i));
        }
    }

    #[test]
    fn test_arbitrary_steep_line() {
        let mut grid = Grid::new(25, 25);
        let a = DVec2::new(18.6, 4.1);
        let b = DVec2::new(12.3, 21.8);
        let marked = rasterize_line(&mut grid, a, b);
        assert_gap_free(&marked, tile_coord(a), tile_coord(b));
    }

    #[test]
    fn test_boundary_line_is_two_rows() {
        let mut grid = Grid::new(20, 10);
        rasterize_line(&mut grid, DVec2::new(3.0, 4.5), DVec2::new(12.0, 4.5));
        // frac = 0.5 rounds away from zero: row 5, leaning toward row 4
        for x in 4..=11 {
            assert!(grid.is_floor(x, 4) && grid.is_floor(x, 5));
            assert!(!grid.is_floor(x, 3) && !grid.is_floor(x, 6));
        }
    }

    #[test]
    fn test_band_edge_gets_two_rows() {
        assert_eq!(covered_rows(0.4, 0.0), [Some(0), Some(1), None]);
        assert_eq!(covered_rows(-0.4, 0.0), [Some(0), Some(-1), None]);
        assert_eq!(covered_rows(0.25, 0.0), [Some(0), Some(1), Some(-1)]);
        // Exactly on a row centre the gradient picks the lean
        assert_eq!(covered_rows(3.0, -0.5), [Some(3), Some(2), Some(4)]);
    }

    #[test]
    fn test_zero_length_line() {
        let mut grid = Grid::new(10, 10);
        let p = DVec2::new(4.2, 4.2);
        let marked = rasterize_line(&mut grid, p, p);
        assert_eq!(marked, vec![(4, 4), (4, 4)]);
        assert_eq!(grid.floor_count(), 1);
    }

    #[test]
    fn test_off_grid_tiles_are_skipped() {
        let mut grid = Grid::new(10, 10);
        let marked = rasterize_line(&mut grid, DVec2::new(0.0, 0.0), DVec2::new(9.0, 0.0));
        assert!(marked.iter().all(|&(_, y)| y >= 0));
        assert!(grid.is_floor(0, 1));
    }

    #[test]
    #[should_panic(expected = "outside the node list")]
    fn test_dangling_line_panics() {
        let mut grid = Grid::new(10, 10);
        let nodes = vec![Node::new(0, DVec2::new(2.0, 2.0), RegionKind::Natural, 3.0)];
        rasterize_lines(&mut grid, &nodes, &[Line::new(0, 1)]);
    }
}
