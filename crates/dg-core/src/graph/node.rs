//! Nodes, edges and access conditions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::direction::{Direction, normalize_bearing};
use crate::consts::PERCEPTION;

/// Integer map position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        dx.hypot(dy)
    }

    /// Bearing from this point towards `other` (y grows southward)
    pub fn bearing_to(&self, other: &Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        normalize_bearing((-dy).atan2(dx))
    }

    /// The four orthogonal neighbors, N/E/S/W order
    pub fn orthogonal_neighbors(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y - 1),
            Point::new(self.x + 1, self.y),
            Point::new(self.x, self.y + 1),
            Point::new(self.x - 1, self.y),
        ]
    }
}

/// Where a node sits, if anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Node has map coordinates
    At(Point),
    /// Node has no geometry; direction labels come from the fallback pools
    Abstract,
}

impl Placement {
    pub fn point(&self) -> Option<Point> {
        match self {
            Placement::At(p) => Some(*p),
            Placement::Abstract => None,
        }
    }
}

/// Structural role of a node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum NodeType {
    /// Region entry
    Hub,
    #[default]
    Linear,
    Branching,
    DeadEnd,
    /// Farthest node from the entry
    Boss,
    /// Reserved for linking to other regions
    Frontier,
    /// Marked by downstream content generation
    Questable,
}

/// Access condition on an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Condition {
    SkillCheck { skill: String, difficulty: i32 },
    ItemRequired { tag: String },
}

impl Condition {
    pub fn perception(difficulty: i32) -> Self {
        Condition::SkillCheck {
            skill: PERCEPTION.to_string(),
            difficulty,
        }
    }

    /// Perception checks discover hidden edges; everything else gates them
    pub fn is_discovery(&self) -> bool {
        matches!(self, Condition::SkillCheck { skill, .. } if skill.eq_ignore_ascii_case(PERCEPTION))
    }
}

/// One-way labeled connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: String,
    pub label: String,
    pub hidden: bool,
    pub conditions: Vec<Condition>,
    /// Radians in [0, 2π), present when both endpoints have coordinates
    pub bearing: Option<f64>,
    pub from_point: Option<Point>,
    pub to_point: Option<Point>,
}

impl Edge {
    pub fn new(target: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
            hidden: false,
            conditions: Vec::new(),
            bearing: None,
            from_point: None,
            to_point: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// (discovery, gating) condition split
    pub fn partition_conditions(&self) -> (Vec<&Condition>, Vec<&Condition>) {
        self.conditions.iter().partition(|c| c.is_discovery())
    }
}

/// Identifier of the directed edge `source -> target`
pub fn edge_key(source: &str, target: &str) -> String {
    format!("{source}->{target}")
}

/// Text produced by the content collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContent {
    pub title: String,
    pub description: String,
}

/// A navigable location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub region: String,
    pub placement: Placement,
    pub node_type: NodeType,
    pub edges: Vec<Edge>,
    pub content: Option<NodeContent>,
}

impl Node {
    pub fn new(id: impl Into<String>, region: impl Into<String>, placement: Placement) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            placement,
            node_type: NodeType::default(),
            edges: Vec::new(),
            content: None,
        }
    }

    pub fn point(&self) -> Option<Point> {
        self.placement.point()
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn is_materialized(&self) -> bool {
        self.content.is_some()
    }

    /// Edge with this label, case-insensitive
    pub fn edge_by_label(&self, label: &str) -> Option<&Edge> {
        let label = label.trim();
        self.edges.iter().find(|e| e.label.eq_ignore_ascii_case(label))
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.edge_by_label(label).is_some()
    }

    pub fn edge_to(&self, target: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.target == target)
    }

    /// Direction-keyed exit map for consumers that predate labeled edges
    ///
    /// Synthetic passage labels have no `Direction` and are left out.
    pub fn legacy_exit_map(&self) -> BTreeMap<Direction, String> {
        self.edges
            .iter()
            .filter_map(|e| Direction::parse(&e.label).map(|d| (d, e.target.clone())))
            .collect()
    }
}
