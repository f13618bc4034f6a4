//! Multi-region world and region linking
//!
//! Regions are generated independently. Linking joins a Frontier node of one
//! region to a Frontier node of another with a matched opposite edge pair; the
//! linked regions are returned as a new `World`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LinkError;
use crate::graph::{
    Edge, Node, NodeType, RegionGraph, SECONDARY, passage_back_label, passage_label,
};
use crate::navigation::{
    ConditionEvaluator, MoveRequest, MoveResult, PlayerNav, SkillSnapshot, navigate_with,
};
use crate::rng::RegionRng;

/// One cross-region edge pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLink {
    pub from_region: String,
    pub from_node: String,
    pub to_region: String,
    pub to_node: String,
    /// Label on the `from_node` side
    pub label: String,
    /// Label on the `to_node` side
    pub reverse: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    regions: BTreeMap<String, RegionGraph>,
    links: Vec<RegionLink>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a region
    pub fn insert(&mut self, graph: RegionGraph) {
        self.regions.insert(graph.region_id.clone(), graph);
    }

    pub fn region(&self, region_id: &str) -> Option<&RegionGraph> {
        self.regions.get(region_id)
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionGraph> {
        self.regions.values()
    }

    pub fn links(&self) -> &[RegionLink] {
        &self.links
    }

    /// Find a node in any region
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.regions.values().find_map(|g| g.node(node_id))
    }

    /// Movement that may cross region links
    pub fn navigate<E: ConditionEvaluator>(
        &self,
        nav: &PlayerNav,
        request: &MoveRequest,
        snapshot: &SkillSnapshot,
        evaluator: &E,
    ) -> MoveResult {
        navigate_with(|id| self.node(id), nav, request, snapshot, evaluator)
    }

    /// Link a Frontier node of `from` to one of `to`
    ///
    /// Frontier nodes without an existing cross-region edge are preferred.
    /// Labels come from the secondary pool first, then a matched passage pair.
    pub fn link_regions(
        &self,
        from: &str,
        to: &str,
        rng: &mut RegionRng,
    ) -> Result<(World, RegionLink), LinkError> {
        if from == to {
            return Err(LinkError::SameRegion(from.to_string()));
        }
        let a = self
            .regions
            .get(from)
            .ok_or_else(|| LinkError::MissingRegion(from.to_string()))?;
        let b = self
            .regions
            .get(to)
            .ok_or_else(|| LinkError::MissingRegion(to.to_string()))?;

        let na = pick_frontier(a, rng).ok_or_else(|| LinkError::MissingFrontier(from.to_string()))?;
        let nb = pick_frontier(b, rng).ok_or_else(|| LinkError::MissingFrontier(to.to_string()))?;
        let (label, reverse) = free_pair(na, nb).ok_or_else(|| LinkError::NoFreeLabel {
            from: na.id.clone(),
            to: nb.id.clone(),
        })?;

        let link = RegionLink {
            from_region: from.to_string(),
            from_node: na.id.clone(),
            to_region: to.to_string(),
            to_node: nb.id.clone(),
            label,
            reverse,
        };

        let mut next = self.clone();
        let mut ga = a.clone();
        let mut gb = b.clone();
        if let Some(node) = ga.node_mut(&link.from_node) {
            node.edges.push(Edge::new(link.to_node.clone(), link.label.clone()));
        }
        if let Some(node) = gb.node_mut(&link.to_node) {
            node.edges.push(Edge::new(link.from_node.clone(), link.reverse.clone()));
        }
        next.insert(ga);
        next.insert(gb);
        next.links.push(link.clone());

        info!(
            from = %link.from_node,
            to = %link.to_node,
            label = %link.label,
            "regions linked"
        );
        Ok((next, link))
    }
}

fn is_linked(graph: &RegionGraph, node: &Node) -> bool {
    node.edges.iter().any(|e| graph.node(&e.target).is_none())
}

fn pick_frontier<'g>(graph: &'g RegionGraph, rng: &mut RegionRng) -> Option<&'g Node> {
    let frontier: Vec<&Node> = graph.nodes_of_type(NodeType::Frontier).collect();
    let open: Vec<&Node> = frontier.iter().copied().filter(|n| !is_linked(graph, n)).collect();
    let pool = if open.is_empty() { frontier } else { open };
    rng.choose(&pool).copied()
}

fn free_pair(a: &Node, b: &Node) -> Option<(String, String)> {
    let fits = |forward: &str, reverse: &str| !a.has_label(forward) && !b.has_label(reverse);
    for dir in SECONDARY {
        let (forward, reverse) = (dir.label(), dir.opposite().label());
        if fits(forward, reverse) {
            return Some((forward.to_string(), reverse.to_string()));
        }
    }
    let limit = (a.degree() + b.degree() + 1) as u32;
    (1..=limit)
        .map(|k| (passage_label(k), passage_back_label(k)))
        .find(|(forward, reverse)| fits(forward, reverse))
}
