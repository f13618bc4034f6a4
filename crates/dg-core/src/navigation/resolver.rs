//! Movement resolution
//!
//! Given the player's node and a requested direction, finds the edge, checks
//! its conditions and hidden state, and produces the player's next
//! navigation state. A refused move leaves the caller's state untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evaluator::ConditionEvaluator;
use super::player::{PlayerNav, SkillSnapshot};
use crate::consts::BEARING_TOLERANCE;
use crate::graph::{Condition, Direction, Edge, Node, RegionGraph, angular_distance, edge_key};

/// What the player asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRequest {
    Direction(Direction),
    /// Free exit label such as `passage-2`
    Label(String),
}

impl MoveRequest {
    pub fn label(&self) -> &str {
        match self {
            MoveRequest::Direction(d) => d.label(),
            MoveRequest::Label(l) => l.as_str(),
        }
    }

    /// Compass direction named by the request, if any
    fn compass(&self) -> Option<Direction> {
        let dir = match self {
            MoveRequest::Direction(d) => Some(*d),
            MoveRequest::Label(l) => Direction::parse(l),
        };
        dir.filter(Direction::is_compass)
    }
}

impl From<Direction> for MoveRequest {
    fn from(dir: Direction) -> Self {
        MoveRequest::Direction(dir)
    }
}

/// Why a move was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    /// Player's current node is not in this graph
    UnknownNode { node: String },
    /// No edge matches the request
    NoExit { request: String },
    /// A non-discovery condition failed
    GatingFailed { condition: Condition },
    /// Hidden edge and the Perception check failed
    Undiscovered,
    /// Target node has no content yet
    ContentNotGenerated { target: String },
    /// Free text could not be mapped to an exit
    UnresolvedIntent { visible_exits: Vec<String> },
}

/// A completed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Navigation state after the move
    pub nav: PlayerNav,
    pub from: String,
    pub to: String,
    pub label: String,
    /// Edge ids revealed by this move
    pub revealed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    Moved(Movement),
    Denied(DenialReason),
}

impl MoveResult {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveResult::Moved(_))
    }

    pub fn movement(&self) -> Option<&Movement> {
        match self {
            MoveResult::Moved(m) => Some(m),
            MoveResult::Denied(_) => None,
        }
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        match self {
            MoveResult::Moved(_) => None,
            MoveResult::Denied(r) => Some(r),
        }
    }
}

/// Edge closest to `wanted` within the tolerance window
fn nearest_by_bearing(node: &Node, wanted: f64) -> Option<&Edge> {
    node.point()?;
    node.edges
        .iter()
        .filter_map(|e| e.bearing.map(|b| (e, angular_distance(b, wanted))))
        .filter(|(_, d)| *d <= BEARING_TOLERANCE + 1e-9)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Exact label first, then nearest bearing for compass requests
pub fn locate_edge<'a>(node: &'a Node, request: &MoveRequest) -> Option<&'a Edge> {
    if let Some(edge) = node.edge_by_label(request.label()) {
        return Some(edge);
    }
    let wanted = request.compass()?.bearing()?;
    nearest_by_bearing(node, wanted)
}

/// Resolve one movement attempt
pub fn navigate<E: ConditionEvaluator>(
    graph: &RegionGraph,
    nav: &PlayerNav,
    request: &MoveRequest,
    snapshot: &SkillSnapshot,
    evaluator: &E,
) -> MoveResult {
    navigate_with(|id| graph.node(id), nav, request, snapshot, evaluator)
}

/// Like `navigate`, with node lookup supplied by the caller
///
/// Used where edges may lead out of a single region graph.
pub fn navigate_with<'g, L, E>(
    lookup: L,
    nav: &PlayerNav,
    request: &MoveRequest,
    snapshot: &SkillSnapshot,
    evaluator: &E,
) -> MoveResult
where
    L: Fn(&str) -> Option<&'g Node>,
    E: ConditionEvaluator,
{
    let Some(node) = lookup(&nav.current) else {
        return MoveResult::Denied(DenialReason::UnknownNode {
            node: nav.current.clone(),
        });
    };
    let Some(edge) = locate_edge(node, request) else {
        return MoveResult::Denied(DenialReason::NoExit {
            request: request.label().to_string(),
        });
    };

    let (discovery, gating) = edge.partition_conditions();
    if let Some(failed) = evaluator.first_failure(snapshot, gating) {
        debug!(from = %node.id, to = %edge.target, "gating condition failed");
        return MoveResult::Denied(DenialReason::GatingFailed {
            condition: failed.clone(),
        });
    }

    let mut next = nav.clone();
    let mut revealed = Vec::new();
    if edge.hidden && !nav.has_revealed(&node.id, &edge.target) {
        if !evaluator.all_pass(snapshot, discovery) {
            debug!(from = %node.id, to = %edge.target, "hidden edge not discovered");
            return MoveResult::Denied(DenialReason::Undiscovered);
        }
        next.reveal_in_place(&node.id, &edge.target);
        revealed.push(edge_key(&node.id, &edge.target));
    }

    let Some(target) = lookup(&edge.target) else {
        return MoveResult::Denied(DenialReason::NoExit {
            request: request.label().to_string(),
        });
    };
    if !target.is_materialized() {
        return MoveResult::Denied(DenialReason::ContentNotGenerated {
            target: target.id.clone(),
        });
    }

    // The player remembers the way back
    if let Some(back) = target.edge_to(&node.id)
        && back.hidden
        && next.reveal_in_place(&target.id, &node.id)
    {
        revealed.push(edge_key(&target.id, &node.id));
    }

    next.current = target.id.clone();
    MoveResult::Moved(Movement {
        nav: next,
        from: node.id.clone(),
        to: target.id.clone(),
        label: edge.label.clone(),
        revealed,
    })
}
