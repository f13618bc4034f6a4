//! Runtime navigation
//!
//! Everything here borrows the region graph immutably. Player state moves
//! forward by value: each successful move returns a fresh `PlayerNav`.

mod evaluator;
mod intent;
mod player;
mod resolver;

pub use evaluator::{ConditionEvaluator, PassiveEvaluator};
pub use intent::{
    ExitInterpreter, IntentPhase, IntentResolution, InterpreterAnswer, LocalResolution,
    NoInterpreter, UnresolvedReason, bounded_levenshtein, resolve_exit, resolve_local,
    visible_edges,
};
pub use player::{Attribute, BASE_ATTRIBUTE, BASE_PASSIVE, PlayerNav, SkillSnapshot};
pub use resolver::{
    DenialReason, MoveRequest, MoveResult, Movement, locate_edge, navigate, navigate_with,
};

use crate::config::IntentConfig;
use crate::graph::RegionGraph;

/// Resolve free text to an exit, then attempt the move
///
/// An unresolved intent is reported as `DenialReason::UnresolvedIntent`
/// carrying the exits the player can see.
pub async fn move_by_text<I, E>(
    graph: &RegionGraph,
    nav: &PlayerNav,
    input: &str,
    snapshot: &SkillSnapshot,
    evaluator: &E,
    interpreter: &I,
    config: &IntentConfig,
) -> MoveResult
where
    I: ExitInterpreter + ?Sized,
    E: ConditionEvaluator,
{
    match resolve_exit(graph, nav, input, interpreter, config).await {
        IntentResolution::Matched { label, .. } => {
            navigate(graph, nav, &MoveRequest::Label(label), snapshot, evaluator)
        }
        IntentResolution::Unresolved { visible_exits, .. } => {
            MoveResult::Denied(DenialReason::UnresolvedIntent { visible_exits })
        }
    }
}
