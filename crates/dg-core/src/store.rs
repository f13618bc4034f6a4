//! Persistence collaborator
//!
//! Regions are stored whole; node-level access is layered on top. Generation
//! and navigation never touch a store directly.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::graph::{Node, RegionGraph};

/// Region storage backend
pub trait NodeStore {
    fn load_region(&self, region_id: &str) -> Result<RegionGraph, StoreError>;

    fn save_region(&mut self, graph: &RegionGraph) -> Result<(), StoreError>;

    /// Ids of all stored regions, sorted
    fn region_ids(&self) -> Result<Vec<String>, StoreError>;

    fn load_node(&self, region_id: &str, node_id: &str) -> Result<Node, StoreError> {
        self.load_region(region_id)?
            .node(node_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{region_id}/{node_id}")))
    }

    /// Replace one node of an already stored region
    fn save_node(&mut self, node: &Node) -> Result<(), StoreError> {
        let graph = self.load_region(&node.region)?;
        let updated = graph
            .with_node(node.clone())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", node.region, node.id)))?;
        self.save_region(&updated)
    }

    fn contains_region(&self, region_id: &str) -> bool {
        self.load_region(region_id).is_ok()
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    regions: BTreeMap<String, RegionGraph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl NodeStore for MemoryStore {
    fn load_region(&self, region_id: &str) -> Result<RegionGraph, StoreError> {
        self.regions
            .get(region_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(region_id.to_string()))
    }

    fn save_region(&mut self, graph: &RegionGraph) -> Result<(), StoreError> {
        self.regions.insert(graph.region_id.clone(), graph.clone());
        Ok(())
    }

    fn region_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.regions.keys().cloned().collect())
    }

    fn contains_region(&self, region_id: &str) -> bool {
        self.regions.contains_key(region_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeContent;
    use crate::{GenerationConfig, LayoutKind, generate_region};

    fn region(id: &str) -> RegionGraph {
        let config = GenerationConfig::new(id, 3).with_layout(LayoutKind::Grid { width: 2, height: 3 });
        generate_region(&config).unwrap()
    }

    #[test]
    fn test_region_roundtrip() {
        let mut store = MemoryStore::new();
        let graph = region("north-wing");
        store.save_region(&graph).unwrap();
        assert_eq!(store.load_region("north-wing").unwrap(), graph);
        assert_eq!(store.region_ids().unwrap(), vec!["north-wing".to_string()]);
        assert!(store.contains_region("north-wing"));
    }

    #[test]
    fn test_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load_region("nowhere"),
            Err(StoreError::NotFound(id)) if id == "nowhere"
        ));
        assert!(!store.contains_region("nowhere"));
    }

    #[test]
    fn test_node_level_access() {
        let mut store = MemoryStore::new();
        store.save_region(&region("w")).unwrap();

        let mut node = store.load_node("w", "w-2").unwrap();
        node.content = Some(NodeContent {
            title: "Cistern".to_string(),
            description: "Water drips.".to_string(),
        });
        store.save_node(&node).unwrap();
        assert_eq!(store.load_node("w", "w-2").unwrap(), node);

        let ghost = crate::graph::Node::new("w-99", "w", crate::graph::Placement::Abstract);
        assert!(matches!(store.save_node(&ghost), Err(StoreError::NotFound(_))));
        assert!(matches!(store.load_node("w", "w-99"), Err(StoreError::NotFound(_))));
    }
}
