//! Wall curve tracing
//!
//! Wall tiles are walked greedily into polylines. Side branches found after a
//! walk are traced separately and either spliced in (when longer than what
//! they replace) or emitted as their own curves. Finally any curve that
//! revisits a tile is cut into a closed loop plus the rest.

use tracing::trace;

use super::Curve;
use crate::grid::{Grid, TileId};

/// Trace every wall tile into curves
///
/// Visited flags are reset first, so tracing the same walls twice gives the
/// same curves. Starting tiles are taken in row-major order.
pub fn trace_walls(grid: &mut Grid) -> Vec<Curve> {
    for id in 0..grid.tiles().len() {
        grid.tile_mut(id).visited = false;
    }

    let mut curves = Vec::new();
    for start in 0..grid.tiles().len() {
        let tile = grid.tile(start);
        if !tile.is_wall || tile.visited {
            continue;
        }

        let primary = walk(grid, start);
        for resolved in resolve_branches(grid, primary) {
            split_shapes(resolved, &mut curves);
        }
    }
    curves
}

/// Greedy walk from `start` over unvisited wall tiles
///
/// Orthogonal steps are preferred over diagonal ones; among candidates the
/// one with the most non-wall neighbours wins, earliest in neighbour order on
/// ties. A walk that stalls next to its start closes into a loop.
fn walk(grid: &mut Grid, start: TileId) -> Vec<TileId> {
    grid.tile_mut(start).visited = true;
    let mut points = vec![start];
    let mut current = start;

    while let Some(next) = next_step(grid, current) {
        grid.tile_mut(next).visited = true;
        points.push(next);
        current = next;
    }

    if points.len() >= 3 && grid.tile(current).neighbours().contains(&start) {
        points.push(start);
    }
    points
}

fn next_step(grid: &Grid, current: TileId) -> Option<TileId> {
    let tile = grid.tile(current);
    best_candidate(grid, tile.orthogonal_neighbours())
        .or_else(|| best_candidate(grid, tile.diagonal_neighbours()))
}

fn best_candidate(grid: &Grid, neighbours: &[TileId]) -> Option<TileId> {
    let mut best: Option<(TileId, usize)> = None;
    for &n in neighbours {
        if !is_open_wall(grid, n) {
            continue;
        }
        let score = open_sides(grid, n);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((n, score));
        }
    }
    best.map(|(n, _)| n)
}

#[inline]
fn is_open_wall(grid: &Grid, id: TileId) -> bool {
    let tile = grid.tile(id);
    tile.is_wall && !tile.visited
}

/// Non-wall neighbours of `id`
fn open_sides(grid: &Grid, id: TileId) -> usize {
    grid.tile(id)
        .neighbours()
        .iter()
        .filter(|&&n| !grid.tile(n).is_wall)
        .count()
}

/// Latest point of `points` that still touches an unvisited wall
fn branch_point(grid: &Grid, points: &[TileId]) -> Option<usize> {
    points.iter().rposition(|&p| {
        grid.tile(p)
            .neighbours()
            .iter()
            .any(|&n| is_open_wall(grid, n))
    })
}

fn resolve_branches(grid: &mut Grid, primary: Vec<TileId>) -> Vec<Vec<TileId>> {
    let mut finished = Vec::new();
    let mut pending = vec![primary];

    while let Some(mut points) = pending.pop() {
        while let Some(at) = branch_point(grid, &points) {
            let secondary = walk(grid, points[at]);
            let tail = points.len() - 1 - at;
            let closed = points.len() > 1 && points.first() == points.last();
            trace!(branch = points[at], length = secondary.len(), tail, "wall branch");

            if at == 0 && !closed {
                // Branch off the open start: prepend it reversed
                let mut joined: Vec<TileId> = secondary.into_iter().rev().collect();
                joined.extend_from_slice(&points[1..]);
                points = joined;
            } else if secondary.len() - 1 > tail {
                let rest = points.split_off(at);
                points.extend(secondary);
                if rest.len() > 1 {
                    pending.push(rest);
                }
            } else {
                pending.push(secondary);
            }
        }
        finished.push(points);
    }
    finished
}

/// Cut `points` at its first revisited tile into a loop and a remainder
fn split_shapes(points: Vec<TileId>, out: &mut Vec<Curve>) {
    let last = points.len().saturating_sub(1);
    let repeat = (1..points.len()).find_map(|j| {
        points[..j]
            .iter()
            .position(|&p| p == points[j])
            .filter(|&k| !(k == 0 && j == last))
            .map(|k| (k, j))
    });

    match repeat {
        Some((k, j)) => {
            let ring = points[k..=j].to_vec();
            let mut rest = points[..=k].to_vec();
            rest.extend_from_slice(&points[j + 1..]);

            split_shapes(ring, out);
            if rest.len() > 1 {
                split_shapes(rest, out);
            }
        }
        None => {
            let is_loop = points.len() > 2 && points.first() == points.last();
            out.push(Curve {
                key_points: points,
                is_loop,
            });
        }
    }
}
