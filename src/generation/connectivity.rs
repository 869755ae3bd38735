//! Final pathway selection
//!
//! Connectivity is a percentage. The lower half blends from the spanning tree
//! toward the relative neighbourhood graph, the upper half from the relative
//! neighbourhood graph toward the Gabriel graph.

use std::collections::BTreeSet;

use super::GraphStages;
use crate::node::Line;
use crate::rng::SeededRng;

/// Pick the final pathways for a connectivity in `0..=100`
///
/// The result always contains the spanning tree. Candidates are shuffled once
/// with the stage's stream and a prefix is taken, so for a fixed seed a
/// higher connectivity within the same band keeps every edge a lower one had.
pub fn filter_connectivity(graph: &GraphStages, connectivity: f64, rng: &mut SeededRng) -> Vec<Line> {
    let (base, looser, fraction) = if connectivity < 50.0 {
        (
            &graph.spanning_tree,
            &graph.relative_neighbourhood,
            connectivity / 50.0,
        )
    } else {
        (
            &graph.relative_neighbourhood,
            &graph.gabriel,
            (connectivity - 50.0) / 50.0,
        )
    };

    let base_set: BTreeSet<Line> = base.iter().copied().collect();
    let mut candidates: Vec<Line> = looser
        .iter()
        .copied()
        .filter(|line| !base_set.contains(line))
        .collect();
    candidates.sort_unstable();

    let count = ((fraction * candidates.len() as f64).round() as usize).min(candidates.len());
    rng.shuffle(&mut candidates);

    let mut lines: Vec<Line> = base_set
        .into_iter()
        .chain(candidates.into_iter().take(count))
        .collect();
    lines.sort_unstable();
    lines
}
