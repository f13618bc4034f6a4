//! Exit intent resolution
//!
//! Maps free text to one of the player's visible exits: exact vocabulary or
//! label match, then a unique bounded edit-distance match, then the external
//! interpreter under a timeout. The interpreter can only pick among the
//! visible exits; anything else is treated as no match.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::player::PlayerNav;
use crate::config::IntentConfig;
use crate::error::CollaboratorError;
use crate::graph::{Direction, Edge, Node, RegionGraph};

/// Which stage produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentPhase {
    Exact,
    Fuzzy,
    Interpreter,
}

/// Why no exit was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    UnknownNode,
    NoCandidate,
    /// More than one label within the edit-distance bound
    Ambiguous(Vec<String>),
    /// Interpreter answered but did not name a visible exit
    Unclear,
    /// Interpreter errored or timed out
    InterpreterFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentResolution {
    Matched {
        label: String,
        target: String,
        phase: IntentPhase,
    },
    Unresolved {
        reason: UnresolvedReason,
        visible_exits: Vec<String>,
    },
}

impl IntentResolution {
    pub fn label(&self) -> Option<&str> {
        match self {
            IntentResolution::Matched { label, .. } => Some(label),
            IntentResolution::Unresolved { .. } => None,
        }
    }

    pub fn phase(&self) -> Option<IntentPhase> {
        match self {
            IntentResolution::Matched { phase, .. } => Some(*phase),
            IntentResolution::Unresolved { .. } => None,
        }
    }
}

/// Answer from the natural-language interpreter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpreterAnswer {
    Matched(String),
    Unclear,
}

/// External free-text interpreter (LLM-backed in production)
#[async_trait]
pub trait ExitInterpreter: Send + Sync {
    async fn interpret(
        &self,
        input: &str,
        visible_exits: &[String],
    ) -> Result<InterpreterAnswer, CollaboratorError>;
}

/// Interpreter that never decides; used when no collaborator is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterpreter;

#[async_trait]
impl ExitInterpreter for NoInterpreter {
    async fn interpret(
        &self,
        _input: &str,
        _visible_exits: &[String],
    ) -> Result<InterpreterAnswer, CollaboratorError> {
        Ok(InterpreterAnswer::Unclear)
    }
}

/// Levenshtein distance, giving up once every path exceeds `bound`
///
/// Returns `None` when the distance is larger than `bound`.
pub fn bounded_levenshtein(a: &str, b: &str, bound: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > bound {
        return None;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        let mut row_min = cur[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
            row_min = row_min.min(cur[j + 1]);
        }
        if row_min > bound {
            return None;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    let dist = prev[b.len()];
    (dist <= bound).then_some(dist)
}

/// Edges the player can see from `node`
pub fn visible_edges<'a>(node: &'a Node, nav: &PlayerNav) -> Vec<&'a Edge> {
    node.edges
        .iter()
        .filter(|e| !e.hidden || nav.has_revealed(&node.id, &e.target))
        .collect()
}

fn labels(edges: &[&Edge]) -> Vec<String> {
    edges.iter().map(|e| e.label.clone()).collect()
}

fn matched(edge: &Edge, phase: IntentPhase) -> IntentResolution {
    IntentResolution::Matched {
        label: edge.label.clone(),
        target: edge.target.clone(),
        phase,
    }
}

/// Outcome of the local phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalResolution {
    Decided(IntentResolution),
    /// Needs the interpreter; carries the ambiguous candidates, if any
    Undecided { ambiguous: Vec<String> },
}

/// Phases 1 and 2 only
pub fn resolve_local(
    graph: &RegionGraph,
    nav: &PlayerNav,
    input: &str,
    config: &IntentConfig,
) -> LocalResolution {
    let Some(node) = graph.node(&nav.current) else {
        return LocalResolution::Decided(IntentResolution::Unresolved {
            reason: UnresolvedReason::UnknownNode,
            visible_exits: Vec::new(),
        });
    };
    let visible = visible_edges(node, nav);
    let text = input.trim().to_lowercase();
    if text.is_empty() {
        return LocalResolution::Decided(IntentResolution::Unresolved {
            reason: UnresolvedReason::NoCandidate,
            visible_exits: labels(&visible),
        });
    }

    // Phase 1: exact label, or a vocabulary word naming its own label only
    if let Some(edge) = visible.iter().find(|e| e.label.eq_ignore_ascii_case(&text)) {
        return LocalResolution::Decided(matched(edge, IntentPhase::Exact));
    }
    if Direction::parse(&text).is_some() {
        return LocalResolution::Undecided {
            ambiguous: Vec::new(),
        };
    }

    // Phase 2: unique label within the edit-distance bound, never a full rewrite
    let close: Vec<&Edge> = visible
        .iter()
        .copied()
        .filter(|e| {
            let label = e.label.to_lowercase();
            bounded_levenshtein(&text, &label, config.max_edit_distance)
                .is_some_and(|dist| dist < label.chars().count())
        })
        .collect();
    match close.as_slice() {
        [edge] => LocalResolution::Decided(matched(edge, IntentPhase::Fuzzy)),
        [] => LocalResolution::Undecided {
            ambiguous: Vec::new(),
        },
        many => LocalResolution::Undecided {
            ambiguous: labels(many),
        },
    }
}

/// All three phases; the interpreter call is bounded by `config.llm_timeout`
pub async fn resolve_exit<I: ExitInterpreter + ?Sized>(
    graph: &RegionGraph,
    nav: &PlayerNav,
    input: &str,
    interpreter: &I,
    config: &IntentConfig,
) -> IntentResolution {
    let ambiguous = match resolve_local(graph, nav, input, config) {
        LocalResolution::Decided(resolution) => return resolution,
        LocalResolution::Undecided { ambiguous } => ambiguous,
    };
    let Some(node) = graph.node(&nav.current) else {
        return IntentResolution::Unresolved {
            reason: UnresolvedReason::UnknownNode,
            visible_exits: Vec::new(),
        };
    };
    let visible = visible_edges(node, nav);
    let visible_exits = labels(&visible);
    let unresolved = |reason| IntentResolution::Unresolved {
        reason,
        visible_exits: visible_exits.clone(),
    };

    debug!(input, candidates = ambiguous.len(), "asking exit interpreter");
    let answer = match tokio::time::timeout(
        config.llm_timeout,
        interpreter.interpret(input, &visible_exits),
    )
    .await
    {
        Ok(Ok(answer)) => answer,
        Ok(Err(err)) => {
            warn!(%err, "exit interpreter failed");
            return unresolved(UnresolvedReason::InterpreterFailed(err.to_string()));
        }
        Err(_) => {
            let err = CollaboratorError::Timeout(config.llm_timeout.as_millis() as u64);
            warn!(%err, "exit interpreter timed out");
            return unresolved(UnresolvedReason::InterpreterFailed(err.to_string()));
        }
    };

    match answer {
        InterpreterAnswer::Matched(label) => {
            match visible.iter().find(|e| e.label.eq_ignore_ascii_case(label.trim())) {
                Some(edge) => matched(edge, IntentPhase::Interpreter),
                None => {
                    debug!(%label, "interpreter named an exit that is not visible");
                    unresolved(UnresolvedReason::Unclear)
                }
            }
        }
        InterpreterAnswer::Unclear if !ambiguous.is_empty() => {
            unresolved(UnresolvedReason::Ambiguous(ambiguous))
        }
        InterpreterAnswer::Unclear => unresolved(UnresolvedReason::Unclear),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::generation::LayoutKind;
    use crate::graph::Placement;

    fn graph_with(labels: &[&str]) -> RegionGraph {
        let mut hub = Node::new("i-0", "i", Placement::Abstract);
        let mut nodes = Vec::new();
        for (k, label) in labels.iter().enumerate() {
            let id = format!("i-{}", k + 1);
            hub.edges.push(Edge::new(id.clone(), *label));
            let mut other = Node::new(id, "i", Placement::Abstract);
            other.edges.push(Edge::new("i-0", "back"));
            nodes.push(other);
        }
        nodes.insert(0, hub);
        let count = nodes.len();
        RegionGraph::new("i", 0, LayoutKind::Abstract { count }, nodes)
    }

    struct Fixed(Result<InterpreterAnswer, CollaboratorError>);

    #[async_trait]
    impl ExitInterpreter for Fixed {
        async fn interpret(
            &self,
            _input: &str,
            _visible: &[String],
        ) -> Result<InterpreterAnswer, CollaboratorError> {
            self.0.clone()
        }
    }

    struct Slow;

    #[async_trait]
    impl ExitInterpreter for Slow {
        async fn interpret(
            &self,
            _input: &str,
            _visible: &[String],
        ) -> Result<InterpreterAnswer, CollaboratorError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(InterpreterAnswer::Matched("north".to_string()))
        }
    }

    #[test]
    fn test_bounded_levenshtein() {
        assert_eq!(bounded_levenshtein("nort", "north", 2), Some(1));
        assert_eq!(bounded_levenshtein("north", "north", 2), Some(0));
        assert_eq!(bounded_levenshtein("sotuh", "south", 2), Some(2));
        assert_eq!(bounded_levenshtein("n", "north", 2), None);
        assert_eq!(bounded_levenshtein("west", "east", 2), Some(1));
        assert_eq!(bounded_levenshtein("", "up", 2), Some(2));
    }

    #[test]
    fn test_exact_match_phase_one() {
        let g = graph_with(&["north", "passage-1"]);
        let nav = PlayerNav::new("i-0");
        let config = IntentConfig::default();
        let LocalResolution::Decided(res) = resolve_local(&g, &nav, "  NORTH ", &config) else {
            panic!("expected a decision");
        };
        assert_eq!(res.phase(), Some(IntentPhase::Exact));
        assert_eq!(res.label(), Some("north"));

        let LocalResolution::Decided(res) = resolve_local(&g, &nav, "Passage-1", &config) else {
            panic!("expected a decision");
        };
        assert_eq!(res.label(), Some("passage-1"));
    }

    #[test]
    fn test_fuzzy_match_phase_two() {
        let g = graph_with(&["north", "east"]);
        let nav = PlayerNav::new("i-0");
        let LocalResolution::Decided(res) = resolve_local(&g, &nav, "nort", &IntentConfig::default())
        else {
            panic!("expected a decision");
        };
        assert_eq!(res.phase(), Some(IntentPhase::Fuzzy));
        assert_eq!(res.label(), Some("north"));
    }

    #[test]
    fn test_single_letter_is_not_local() {
        let g = graph_with(&["north", "northeast"]);
        let nav = PlayerNav::new("i-0");
        assert_eq!(
            resolve_local(&g, &nav, "n", &IntentConfig::default()),
            LocalResolution::Undecided { ambiguous: vec![] }
        );
    }

    #[test]
    fn test_ambiguous_fuzzy_is_undecided() {
        let g = graph_with(&["up", "in"]);
        let nav = PlayerNav::new("i-0");
        assert_eq!(
            resolve_local(&g, &nav, "un", &IntentConfig::default()),
            LocalResolution::Undecided {
                ambiguous: vec!["up".to_string(), "in".to_string()]
            }
        );
    }

    #[test]
    fn test_direction_word_never_remaps_to_another() {
        let config = IntentConfig::default();
        let nav = PlayerNav::new("i-0");

        let g = graph_with(&["north"]);
        assert_eq!(
            resolve_local(&g, &nav, "south", &config),
            LocalResolution::Undecided { ambiguous: vec![] }
        );

        let g = graph_with(&["west", "up"]);
        assert_eq!(
            resolve_local(&g, &nav, "east", &config),
            LocalResolution::Undecided { ambiguous: vec![] }
        );
        let LocalResolution::Decided(res) = resolve_local(&g, &nav, "West", &config) else {
            panic!("expected a decision");
        };
        assert_eq!(res.phase(), Some(IntentPhase::Exact));
    }

    #[test]
    fn test_blank_input_has_no_candidate() {
        let config = IntentConfig::default();
        let nav = PlayerNav::new("i-0");
        for (labels, input) in [(&["up", "north"][..], ""), (&["in"][..], "   ")] {
            let g = graph_with(labels);
            assert_eq!(
                resolve_local(&g, &nav, input, &config),
                LocalResolution::Decided(IntentResolution::Unresolved {
                    reason: UnresolvedReason::NoCandidate,
                    visible_exits: labels.iter().map(|l| l.to_string()).collect(),
                })
            );
        }
    }

    #[test]
    fn test_short_input_needs_overlap_with_label() {
        let config = IntentConfig::default();
        let nav = PlayerNav::new("i-0");

        // "e" -> "up" is two edits, the whole label
        let g = graph_with(&["up", "north"]);
        assert_eq!(
            resolve_local(&g, &nav, "e", &config),
            LocalResolution::Undecided { ambiguous: vec![] }
        );

        let g = graph_with(&["up", "north"]);
        let LocalResolution::Decided(res) = resolve_local(&g, &nav, "u", &config) else {
            panic!("expected a decision");
        };
        assert_eq!(res.label(), Some("up"));
        assert_eq!(res.phase(), Some(IntentPhase::Fuzzy));
    }

    #[test]
    fn test_hidden_exits_are_not_candidates() {
        let mut g = graph_with(&["north", "east"]);
        g.node_mut("i-0").unwrap().edges[0].hidden = true;
        let nav = PlayerNav::new("i-0");
        assert!(matches!(
            resolve_local(&g, &nav, "north", &IntentConfig::default()),
            LocalResolution::Undecided { .. }
        ));
        let nav = nav.with_revealed("i-0", "i-1");
        assert!(matches!(
            resolve_local(&g, &nav, "north", &IntentConfig::default()),
            LocalResolution::Decided(IntentResolution::Matched { .. })
        ));
    }

    #[tokio::test]
    async fn test_interpreter_phase_three() {
        let g = graph_with(&["north", "northeast"]);
        let nav = PlayerNav::new("i-0");
        let config = IntentConfig::default();

        let pick = Fixed(Ok(InterpreterAnswer::Matched("Northeast".to_string())));
        let res = resolve_exit(&g, &nav, "n", &pick, &config).await;
        assert_eq!(res.phase(), Some(IntentPhase::Interpreter));
        assert_eq!(res.label(), Some("northeast"));

        let res = resolve_exit(&g, &nav, "n", &NoInterpreter, &config).await;
        assert_eq!(
            res,
            IntentResolution::Unresolved {
                reason: UnresolvedReason::Unclear,
                visible_exits: vec!["north".to_string(), "northeast".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_interpreter_bad_answers_degrade() {
        let g = graph_with(&["north"]);
        let nav = PlayerNav::new("i-0");
        let config = IntentConfig::default();

        let wrong = Fixed(Ok(InterpreterAnswer::Matched("portal".to_string())));
        let res = resolve_exit(&g, &nav, "go through the shimmer", &wrong, &config).await;
        assert!(matches!(
            res,
            IntentResolution::Unresolved {
                reason: UnresolvedReason::Unclear,
                ..
            }
        ));

        let broken = Fixed(Err(CollaboratorError::Malformed("{".to_string())));
        let res = resolve_exit(&g, &nav, "go through the shimmer", &broken, &config).await;
        assert!(matches!(
            res,
            IntentResolution::Unresolved {
                reason: UnresolvedReason::InterpreterFailed(_),
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interpreter_timeout() {
        let g = graph_with(&["north"]);
        let nav = PlayerNav::new("i-0");
        let config = IntentConfig {
            llm_timeout: Duration::from_millis(100),
            ..IntentConfig::default()
        };
        let res = resolve_exit(&g, &nav, "the dark one", &Slow, &config).await;
        let IntentResolution::Unresolved { reason, visible_exits } = res else {
            panic!("expected timeout to degrade");
        };
        assert_eq!(
            reason,
            UnresolvedReason::InterpreterFailed("collaborator timed out after 100 ms".to_string())
        );
        assert_eq!(visible_exits, vec!["north".to_string()]);
    }
}
