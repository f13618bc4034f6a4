//! End-to-end scenarios: generate, materialize, walk.

use dg_core::generation::{generate_region_with_stats, node_id};
use dg_core::navigation::{
    IntentPhase, LocalResolution, NoInterpreter, bounded_levenshtein, move_by_text,
};
use dg_core::{
    Condition, DenialReason, GenerationConfig, IntentConfig, LayoutKind, MoveRequest,
    MoveResult, NodeType, PassiveEvaluator, PlayerNav, RegionGraph, SkillSnapshot,
    materialize_placeholders, navigate, resolve_local,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn grid_region(seed: u64) -> RegionGraph {
    let config = GenerationConfig::new("s", seed)
        .with_layout(LayoutKind::Grid { width: 3, height: 3 })
        .with_loop_frequency(0.5);
    let (graph, _) = generate_region_with_stats(&config).unwrap();
    materialize_placeholders(&graph)
}

#[test]
fn test_grid_scenario() {
    init_tracing();
    let config = GenerationConfig::new("s", 2024)
        .with_layout(LayoutKind::Grid { width: 3, height: 3 })
        .with_loop_frequency(0.5);
    let (graph, stats) = generate_region_with_stats(&config).unwrap();

    assert_eq!(graph.len(), 9);
    assert_eq!(stats.tree_edges, 8);
    assert!(stats.loop_edges >= 5);
    assert_eq!(graph.entry().unwrap().id, node_id("s", 0));
    assert_eq!(graph.entry().unwrap().node_type, NodeType::Hub);
    assert!(graph.is_connected());
    for node in graph.nodes() {
        let mut labels: Vec<&str> = node.edges.iter().map(|e| e.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), node.edges.len(), "duplicate label on {}", node.id);
    }
}

#[test]
fn test_hidden_edge_refusal_and_discovery() {
    init_tracing();
    let mut graph = grid_region(77);
    // Hide the hub's first exit in both directions behind DC 40
    let hub = graph.entry().unwrap().clone();
    let edge = hub.edges[0].clone();
    let mut target = graph.node(&edge.target).unwrap().clone();
    let mut source = hub;
    for e in source.edges.iter_mut().filter(|e| e.target == edge.target) {
        e.hidden = true;
        e.conditions = vec![Condition::perception(40)];
    }
    for e in target.edges.iter_mut().filter(|e| e.target == source.id) {
        e.hidden = true;
        e.conditions = vec![Condition::perception(40)];
    }
    graph = graph.with_node(source.clone()).unwrap();
    graph = graph.with_node(target.clone()).unwrap();

    let nav = PlayerNav::new(source.id.clone());
    let request = MoveRequest::Label(edge.label.clone());

    let weak = SkillSnapshot::new().with_skill("Perception", 25);
    let refused = navigate(&graph, &nav, &request, &weak, &PassiveEvaluator);
    assert_eq!(refused, MoveResult::Denied(DenialReason::Undiscovered));
    assert_eq!(nav.revealed_count(), 0);

    let sharp = SkillSnapshot::new().with_skill("Perception", 35);
    let moved = navigate(&graph, &nav, &request, &sharp, &PassiveEvaluator);
    let movement = moved.movement().unwrap();
    assert_eq!(movement.to, target.id);
    assert!(movement.nav.has_revealed(&source.id, &target.id));
    assert!(movement.nav.has_revealed(&target.id, &source.id));
}

#[test]
fn test_unmaterialized_target_refuses_without_state_change() {
    let config = GenerationConfig::new("u", 8).with_layout(LayoutKind::Abstract { count: 3 });
    let graph = dg_core::generate_region(&config).unwrap();
    let start = graph.entry().unwrap();
    let Some(edge) = start.edges.iter().find(|e| !e.hidden).cloned() else {
        panic!("hub of seed 8 has no visible exit");
    };
    let nav = PlayerNav::new(start.id.clone());
    let result = navigate(
        &graph,
        &nav,
        &MoveRequest::Label(edge.label),
        &SkillSnapshot::new(),
        &PassiveEvaluator,
    );
    assert_eq!(
        result,
        MoveResult::Denied(DenialReason::ContentNotGenerated {
            target: edge.target
        })
    );
}

#[test]
fn test_fuzzy_exit_resolution() {
    let graph = grid_region(31);
    let config = IntentConfig::default();
    // A node whose only visible label near "nort" is "north"
    let Some(node) = graph.nodes().iter().find(|n| {
        let close: Vec<&str> = n
            .edges
            .iter()
            .filter(|e| !e.hidden)
            .filter(|e| bounded_levenshtein("nort", &e.label, 2).is_some())
            .map(|e| e.label.as_str())
            .collect();
        close == ["north"]
    }) else {
        panic!("seed 31 has no node with a lone visible exit near \"nort\"");
    };
    let nav = PlayerNav::new(node.id.clone());
    let LocalResolution::Decided(res) = resolve_local(&graph, &nav, "nort", &config) else {
        panic!("expected a local decision");
    };
    assert_eq!(res.label(), Some("north"));
    assert_eq!(res.phase(), Some(IntentPhase::Fuzzy));
}

#[tokio::test]
async fn test_text_move_reports_visible_exits() {
    let graph = grid_region(12);
    let nav = PlayerNav::new("s-0");
    let result = move_by_text(
        &graph,
        &nav,
        "climb the rope ladder",
        &SkillSnapshot::new(),
        &PassiveEvaluator,
        &NoInterpreter,
        &IntentConfig::default(),
    )
    .await;
    let MoveResult::Denied(DenialReason::UnresolvedIntent { visible_exits }) = result else {
        panic!("expected unresolved intent");
    };
    let hub = graph.entry().unwrap();
    let expected: Vec<String> = hub
        .edges
        .iter()
        .filter(|e| !e.hidden)
        .map(|e| e.label.clone())
        .collect();
    assert_eq!(visible_exits, expected);
}
