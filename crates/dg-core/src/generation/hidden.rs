//! Hidden edge marking
//!
//! Every directed edge is a separate candidate, so a passage can be obvious
//! from one side and hidden from the other.

use crate::consts::{
    HIDDEN_DC_JITTER, HIDDEN_DC_MAX, HIDDEN_DC_MIN, HIDDEN_FRACTION_MAX, HIDDEN_FRACTION_MIN,
};
use crate::graph::{Condition, RegionGraph};
use crate::rng::RegionRng;

/// Number of hidden edges for `total` directed edges at `fraction`
///
/// Clamped so the realized share stays inside the configured band whenever
/// the total is large enough for the band to contain an integer.
pub fn hidden_count(total: usize, fraction: f64) -> usize {
    let lo = (total as f64 * HIDDEN_FRACTION_MIN).ceil() as usize;
    let hi = (total as f64 * HIDDEN_FRACTION_MAX).floor() as usize;
    let count = (total as f64 * fraction).round() as usize;
    if lo <= hi { count.clamp(lo, hi) } else { count.min(total) }
}

/// Perception difficulty before jitter
pub fn base_difficulty(region_difficulty: u32) -> i32 {
    HIDDEN_DC_MIN + 2 * region_difficulty.min(HIDDEN_DC_MAX as u32) as i32
}

/// Hide a random 15-25% of the directed edges; returns how many
pub fn mark_hidden_edges(graph: &mut RegionGraph, region_difficulty: u32, rng: &mut RegionRng) -> usize {
    let refs: Vec<(usize, usize)> = graph
        .nodes()
        .iter()
        .enumerate()
        .flat_map(|(ni, node)| (0..node.edges.len()).map(move |ei| (ni, ei)))
        .collect();
    if refs.is_empty() {
        return 0;
    }

    let fraction = rng.range_f64(HIDDEN_FRACTION_MIN, HIDDEN_FRACTION_MAX);
    let count = hidden_count(refs.len(), fraction);
    let base = base_difficulty(region_difficulty);

    let chosen = rng.sample(&refs, count);
    let nodes = graph.nodes_mut();
    for (ni, ei) in chosen {
        let jitter = rng.range_i32(-HIDDEN_DC_JITTER, HIDDEN_DC_JITTER);
        let difficulty = (base + jitter).clamp(HIDDEN_DC_MIN, HIDDEN_DC_MAX);
        let edge = &mut nodes[ni].edges[ei];
        edge.hidden = true;
        edge.conditions.push(Condition::perception(difficulty));
    }
    count
}
