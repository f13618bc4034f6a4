//! Direction assignment
//!
//! Each undirected edge is labeled once, choosing the forward label on one
//! endpoint and its opposite on the other together. A pair is committed only
//! when both labels are free on their nodes.

use tracing::debug;

use crate::graph::{
    Direction, Edge, Node, SECONDARY, normalize_bearing, passage_back_label, passage_label,
};

/// Compass candidates tried per edge: nearest bucket and its two neighbors
const COMPASS_CANDIDATES: usize = 3;

/// Labels chosen for one undirected edge
#[derive(Debug, Clone, PartialEq)]
struct LabelPair {
    forward: String,
    reverse: String,
    synthetic: bool,
}

/// Outcome counters for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    pub compass: usize,
    pub secondary: usize,
    pub synthetic: usize,
}

fn pair_is_free(a: &Node, b: &Node, forward: &str, reverse: &str) -> bool {
    !a.has_label(forward) && !b.has_label(reverse)
}

/// Pick labels for `a -> b` and `b -> a`
fn choose_labels(
    a: &Node,
    b: &Node,
    bearing: Option<f64>,
    next_passage: &mut u32,
    stats: &mut AssignmentStats,
) -> LabelPair {
    if let Some(bearing) = bearing {
        for dir in Direction::by_proximity(bearing)
            .into_iter()
            .take(COMPASS_CANDIDATES)
        {
            let (fwd, rev) = (dir.label(), dir.opposite().label());
            if pair_is_free(a, b, fwd, rev) {
                stats.compass += 1;
                return LabelPair {
                    forward: fwd.to_string(),
                    reverse: rev.to_string(),
                    synthetic: false,
                };
            }
        }
    }

    for dir in SECONDARY {
        let (fwd, rev) = (dir.label(), dir.opposite().label());
        if pair_is_free(a, b, fwd, rev) {
            stats.secondary += 1;
            return LabelPair {
                forward: fwd.to_string(),
                reverse: rev.to_string(),
                synthetic: false,
            };
        }
    }

    loop {
        *next_passage += 1;
        let forward = passage_label(*next_passage);
        let reverse = passage_back_label(*next_passage);
        if pair_is_free(a, b, &forward, &reverse) {
            stats.synthetic += 1;
            return LabelPair {
                forward,
                reverse,
                synthetic: true,
            };
        }
    }
}

/// Turn undirected `(i, j)` pairs into mirrored, labeled edges on `nodes`
pub fn assign_directions(nodes: &mut [Node], pairs: &[(usize, usize)]) -> AssignmentStats {
    let mut stats = AssignmentStats::default();
    let mut next_passage = 0;

    for &(i, j) in pairs {
        if i == j || i >= nodes.len() || j >= nodes.len() {
            continue;
        }
        let from_point = nodes[i].point();
        let to_point = nodes[j].point();
        let bearing = match (from_point, to_point) {
            (Some(p), Some(q)) => Some(p.bearing_to(&q)),
            _ => None,
        };

        let labels = choose_labels(&nodes[i], &nodes[j], bearing, &mut next_passage, &mut stats);
        if labels.synthetic {
            debug!(from = %nodes[i].id, to = %nodes[j].id, label = %labels.forward, "synthetic passage");
        }

        let target_j = nodes[j].id.clone();
        let target_i = nodes[i].id.clone();
        nodes[i].edges.push(Edge {
            target: target_j,
            label: labels.forward,
            hidden: false,
            conditions: Vec::new(),
            bearing,
            from_point,
            to_point,
        });
        nodes[j].edges.push(Edge {
            target: target_i,
            label: labels.reverse,
            hidden: false,
            conditions: Vec::new(),
            bearing: bearing.map(|b| normalize_bearing(b + std::f64::consts::PI)),
            from_point: to_point,
            to_point: from_point,
        });
    }

    debug!(
        compass = stats.compass,
        secondary = stats.secondary,
        synthetic = stats.synthetic,
        "directions assigned"
    );
    stats
}
