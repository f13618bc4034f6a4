//! Content collaborator boundary
//!
//! Room text comes from an external generator. This module builds its input,
//! bounds each call with a timeout and falls back to placeholder text, so a
//! region can always be materialized.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{GenerationConfig, Theme};
use crate::consts::CONTENT_TIMEOUT_MS;
use crate::error::CollaboratorError;
use crate::graph::{Node, NodeContent, NodeType, RegionGraph};

/// Region-wide inputs shared by every node's content request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionContext {
    pub theme: Theme,
    pub lore: String,
    pub difficulty: u32,
    pub spawn_mobs: bool,
    #[serde(with = "crate::config::duration_ms")]
    pub timeout: Duration,
}

impl RegionContext {
    pub fn from_config(config: &GenerationConfig, lore: impl Into<String>) -> Self {
        Self {
            theme: config.theme,
            lore: lore.into(),
            difficulty: config.region_difficulty,
            spawn_mobs: config.spawn_mobs,
            timeout: Duration::from_millis(CONTENT_TIMEOUT_MS),
        }
    }
}

/// Everything the generator needs for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentContext {
    pub region_id: String,
    pub node_id: String,
    pub theme: Theme,
    pub lore: String,
    pub difficulty: u32,
    /// Visible exit labels, in edge order
    pub direction_hint: Vec<String>,
    pub role: NodeType,
    pub spawn_mobs: bool,
}

impl ContentContext {
    pub fn for_node(region: &RegionContext, node: &Node) -> Self {
        Self {
            region_id: node.region.clone(),
            node_id: node.id.clone(),
            theme: region.theme,
            lore: region.lore.clone(),
            difficulty: region.difficulty,
            direction_hint: node
                .edges
                .iter()
                .filter(|e| !e.hidden)
                .map(|e| e.label.clone())
                .collect(),
            role: node.node_type,
            // Entry rooms stay safe
            spawn_mobs: region.spawn_mobs && node.node_type != NodeType::Hub,
        }
    }
}

/// External room-text generator
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, context: &ContentContext) -> Result<NodeContent, CollaboratorError>;
}

/// Deterministic text built only from the context
pub fn placeholder_content(context: &ContentContext) -> NodeContent {
    let title = format!("{} {}", context.theme, role_noun(context.role));
    let exits = if context.direction_hint.is_empty() {
        "no obvious exits".to_string()
    } else {
        format!("exits lead {}", context.direction_hint.join(", "))
    };
    NodeContent {
        title,
        description: format!("A quiet {} ({}); {exits}.", role_noun(context.role), context.node_id),
    }
}

fn role_noun(role: NodeType) -> &'static str {
    match role {
        NodeType::Hub => "entrance",
        NodeType::Linear => "passage",
        NodeType::Branching => "crossing",
        NodeType::DeadEnd => "alcove",
        NodeType::Boss => "lair",
        NodeType::Frontier => "threshold",
        NodeType::Questable => "shrine",
    }
}

/// Generator that always answers with the placeholder text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGenerator;

#[async_trait]
impl ContentGenerator for PlaceholderGenerator {
    async fn generate(&self, context: &ContentContext) -> Result<NodeContent, CollaboratorError> {
        Ok(placeholder_content(context))
    }
}

/// Copy of `graph` with placeholder content on every unmaterialized node
pub fn materialize_placeholders(graph: &RegionGraph) -> RegionGraph {
    let region = RegionContext {
        theme: Theme::default(),
        lore: String::new(),
        difficulty: 0,
        spawn_mobs: false,
        timeout: Duration::from_millis(CONTENT_TIMEOUT_MS),
    };
    let mut next = graph.clone();
    for node in next.nodes_mut() {
        if node.content.is_none() {
            node.content = Some(placeholder_content(&ContentContext::for_node(&region, node)));
        }
    }
    next
}

/// Copy of `graph` with generated content on every unmaterialized node
///
/// Nodes are requested in order, one at a time. A failed or timed-out call
/// yields the placeholder for that node.
pub async fn materialize_region<G: ContentGenerator + ?Sized>(
    graph: &RegionGraph,
    generator: &G,
    region: &RegionContext,
) -> RegionGraph {
    let mut next = graph.clone();
    let mut fallbacks = 0usize;
    for node in next.nodes_mut() {
        if node.content.is_some() {
            continue;
        }
        let context = ContentContext::for_node(region, node);
        let content = match tokio::time::timeout(region.timeout, generator.generate(&context)).await {
            Ok(Ok(content)) => content,
            Ok(Err(err)) => {
                warn!(node = %node.id, %err, "content generation failed, using placeholder");
                fallbacks += 1;
                placeholder_content(&context)
            }
            Err(_) => {
                let err = CollaboratorError::Timeout(region.timeout.as_millis() as u64);
                warn!(node = %node.id, %err, "content generation timed out, using placeholder");
                fallbacks += 1;
                placeholder_content(&context)
            }
        };
        node.content = Some(content);
    }
    debug!(region = %graph.region_id, fallbacks, "region materialized");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::generation::{LayoutKind, generate_region};

    fn region() -> RegionGraph {
        let config = GenerationConfig::new("c", 11).with_layout(LayoutKind::Grid { width: 2, height: 2 });
        generate_region(&config).unwrap()
    }

    fn context() -> RegionContext {
        RegionContext::from_config(&GenerationConfig::new("c", 11), "An old dwarven hold.")
    }

    /// Fails every other call
    struct Flaky(AtomicUsize);

    #[async_trait]
    impl ContentGenerator for Flaky {
        async fn generate(&self, context: &ContentContext) -> Result<NodeContent, CollaboratorError> {
            if self.0.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                return Err(CollaboratorError::Failed("quota".to_string()));
            }
            Ok(NodeContent {
                title: format!("Generated {}", context.node_id),
                description: context.lore.clone(),
            })
        }
    }

    struct Stalled;

    #[async_trait]
    impl ContentGenerator for Stalled {
        async fn generate(&self, _context: &ContentContext) -> Result<NodeContent, CollaboratorError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(CollaboratorError::Failed("unreachable".to_string()))
        }
    }

    #[test]
    fn test_context_for_hub() {
        let graph = region();
        let hub = graph.entry().unwrap();
        let ctx = ContentContext::for_node(&context(), hub);
        assert_eq!(ctx.role, NodeType::Hub);
        assert_eq!(ctx.region_id, "c");
        assert!(!ctx.spawn_mobs);
        assert_eq!(ctx.lore, "An old dwarven hold.");
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let graph = region();
        let a = materialize_placeholders(&graph);
        let b = materialize_placeholders(&graph);
        assert_eq!(a, b);
        assert!(a.nodes().iter().all(Node::is_materialized));
        assert!(graph.nodes().iter().all(|n| !n.is_materialized()));
    }

    #[tokio::test]
    async fn test_failed_calls_fall_back() {
        let graph = region();
        let generator = Flaky(AtomicUsize::new(0));
        let done = materialize_region(&graph, &generator, &context()).await;
        let titles: Vec<&str> = done
            .nodes()
            .iter()
            .map(|n| n.content.as_ref().unwrap().title.as_str())
            .collect();
        assert_eq!(titles[0], "Generated c-0");
        assert_eq!(titles[1], format!("Dungeon {}", role_noun(done.nodes()[1].node_type)));
        assert_eq!(titles[2], "Generated c-2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let graph = region();
        let mut ctx = context();
        ctx.timeout = Duration::from_millis(10);
        let done = materialize_region(&graph, &Stalled, &ctx).await;
        for node in done.nodes() {
            assert_eq!(
                node.content.as_ref(),
                Some(&placeholder_content(&ContentContext::for_node(&ctx, node)))
            );
        }
    }

    #[tokio::test]
    async fn test_existing_content_is_kept() {
        let graph = region()
            .with_content(
                "c-1",
                NodeContent {
                    title: "Handwritten".to_string(),
                    description: String::new(),
                },
            )
            .unwrap();
        let done = materialize_region(&graph, &PlaceholderGenerator, &context()).await;
        assert_eq!(done.node("c-1").unwrap().content.as_ref().unwrap().title, "Handwritten");
    }
}
