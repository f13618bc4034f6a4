//! Region generation pipeline
//!
//! layout -> spanning tree -> loops -> directions -> validation ->
//! classification -> hidden edges. One seeded `RegionRng` is threaded
//! through every step.

mod classify;
mod directions;
mod hidden;
mod layout;
mod loops;
mod rect;
mod spanning;
mod validate;

use tracing::info;

pub use classify::{RoleCounts, classify_nodes, dead_end_quota, frontier_quota};
pub use directions::{AssignmentStats, assign_directions};
pub use hidden::{base_difficulty, hidden_count, mark_hidden_edges};
pub use layout::LayoutKind;
pub use loops::{augment_loops, base_extra_edges, target_extra_edges};
pub use rect::{Rect, partition};
pub use spanning::{ConnectivityTracker, spanning_tree};
pub use validate::{find_issues, validate_region};

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::graph::{Node, RegionGraph};
use crate::rng::RegionRng;

/// What each pipeline stage produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub nodes: usize,
    pub tree_edges: usize,
    pub loop_edges: usize,
    pub labels: AssignmentStats,
    pub roles: RoleCounts,
    pub hidden_edges: usize,
}

/// Node id for index `i` in `region`
pub fn node_id(region: &str, i: usize) -> String {
    format!("{region}-{i}")
}

/// Generate a region graph
pub fn generate_region(config: &GenerationConfig) -> Result<RegionGraph, GenerationError> {
    generate_region_with_stats(config).map(|(graph, _)| graph)
}

/// Generate a region graph and report per-stage counts
pub fn generate_region_with_stats(
    config: &GenerationConfig,
) -> Result<(RegionGraph, GenerationStats), GenerationError> {
    config
        .validate()
        .map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;

    let mut rng = RegionRng::new(config.seed);
    let layout = config.effective_layout();
    let placements = layout.build(&mut rng)?;
    let n = placements.len();

    let tree = spanning_tree(&placements);
    let extra = augment_loops(n, &tree, config.loop_frequency, &mut rng);

    let mut nodes: Vec<Node> = placements
        .into_iter()
        .enumerate()
        .map(|(i, p)| Node::new(node_id(&config.region_id, i), config.region_id.clone(), p))
        .collect();
    let mut pairs = tree.clone();
    pairs.extend(extra.iter().copied());
    let labels = assign_directions(&mut nodes, &pairs);

    let mut graph = RegionGraph::new(config.region_id.clone(), config.seed, layout, nodes);
    validate_region(&graph)?;

    let roles = classify_nodes(&mut graph, config.frontier_fraction, &mut rng);
    let hidden_edges = mark_hidden_edges(&mut graph, config.region_difficulty, &mut rng);

    let stats = GenerationStats {
        nodes: n,
        tree_edges: tree.len(),
        loop_edges: extra.len(),
        labels,
        roles,
        hidden_edges,
    };
    info!(
        region = %graph.region_id,
        seed = config.seed,
        layout = graph.layout.name(),
        nodes = stats.nodes,
        tree_edges = stats.tree_edges,
        loop_edges = stats.loop_edges,
        hidden = stats.hidden_edges,
        avg_degree = graph.average_degree(),
        "region generated"
    );
    Ok((graph, stats))
}
