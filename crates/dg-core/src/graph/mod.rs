//! Region graph
//!
//! Contains the node/edge model, the direction vocabulary, and the
//! `RegionGraph` container produced by generation.

mod direction;
mod node;

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

pub use crate::generation::LayoutKind;
pub use direction::{
    COMPASS, Direction, PASSAGE_BACK_PREFIX, PASSAGE_PREFIX, SECONDARY, angular_distance,
    are_opposites, normalize_bearing, opposite_label, passage_back_label, passage_label,
};
pub use node::{Condition, Edge, Node, NodeContent, NodeType, Placement, Point, edge_key};

/// All nodes of one generated region
///
/// Produced once by `generate_region`; later changes (content, region links)
/// go through methods that return a modified copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegionGraphRepr", into = "RegionGraphRepr")]
pub struct RegionGraph {
    pub region_id: String,
    pub seed: u64,
    pub layout: LayoutKind,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct RegionGraphRepr {
    region_id: String,
    seed: u64,
    layout: LayoutKind,
    nodes: Vec<Node>,
}

impl From<RegionGraphRepr> for RegionGraph {
    fn from(repr: RegionGraphRepr) -> Self {
        RegionGraph::new(repr.region_id, repr.seed, repr.layout, repr.nodes)
    }
}

impl From<RegionGraph> for RegionGraphRepr {
    fn from(graph: RegionGraph) -> Self {
        Self {
            region_id: graph.region_id,
            seed: graph.seed,
            layout: graph.layout,
            nodes: graph.nodes,
        }
    }
}

impl RegionGraph {
    pub fn new(region_id: impl Into<String>, seed: u64, layout: LayoutKind, nodes: Vec<Node>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self {
            region_id: region_id.into(),
            seed,
            layout,
            nodes,
            index,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.index_of(id).map(move |i| &mut self.nodes[i])
    }

    /// The entry node (first generated)
    pub fn entry(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    /// Edge `from -> to`, if present
    pub fn edge(&self, from: &str, to: &str) -> Option<&Edge> {
        self.node(from).and_then(|n| n.edge_to(to))
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::degree).sum()
    }

    /// Mean out-degree (equal to undirected degree, every edge is mirrored)
    pub fn average_degree(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.edge_count() as f64 / self.nodes.len() as f64
    }

    pub fn hidden_edge_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.edges.iter())
            .filter(|e| e.hidden)
            .count()
    }

    /// Hop distances from `start` over directed edges; `None` = unreachable
    pub fn bfs_distances(&self, start: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.nodes.len()];
        if start >= self.nodes.len() {
            return dist;
        }
        dist[start] = Some(0);
        let mut queue = VecDeque::from([start]);
        while let Some(i) = queue.pop_front() {
            let d = dist[i].unwrap_or(0);
            for edge in &self.nodes[i].edges {
                if let Some(j) = self.index_of(&edge.target)
                    && dist[j].is_none()
                {
                    dist[j] = Some(d + 1);
                    queue.push_back(j);
                }
            }
        }
        dist
    }

    /// Check that every node reaches every other
    ///
    /// Reachability from the entry suffices because every edge is mirrored;
    /// the mirror property itself is checked by validation.
    pub fn is_connected(&self) -> bool {
        self.bfs_distances(0).iter().all(Option::is_some)
    }

    /// Copy of this graph with content attached to `id`
    pub fn with_content(&self, id: &str, content: NodeContent) -> Option<RegionGraph> {
        let mut graph = self.clone();
        graph.node_mut(id)?.content = Some(content);
        Some(graph)
    }

    /// Copy of this graph with the node of the same id replaced
    pub fn with_node(&self, node: Node) -> Option<RegionGraph> {
        let mut graph = self.clone();
        let slot = graph.node_mut(&node.id)?;
        *slot = node;
        Some(graph)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }
}
