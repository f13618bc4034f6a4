//! Player-side navigation state and skill snapshot
//!
//! Discovery of hidden edges is remembered here, on the player, so the graph
//! itself never changes at runtime.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::graph::edge_key;

/// Where the player is and which hidden edges they know about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNav {
    pub current: String,
    revealed: BTreeSet<String>,
}

impl PlayerNav {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            revealed: BTreeSet::new(),
        }
    }

    /// Check if the edge `source -> target` has been revealed
    pub fn has_revealed(&self, source: &str, target: &str) -> bool {
        self.revealed.contains(&edge_key(source, target))
    }

    /// Revealed edge ids (`source->target`), sorted
    pub fn revealed(&self) -> impl Iterator<Item = &str> {
        self.revealed.iter().map(String::as_str)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Copy with the edge `source -> target` revealed
    pub fn with_revealed(&self, source: &str, target: &str) -> Self {
        let mut next = self.clone();
        next.revealed.insert(edge_key(source, target));
        next
    }

    pub(crate) fn reveal_in_place(&mut self, source: &str, target: &str) -> bool {
        self.revealed.insert(edge_key(source, target))
    }
}

/// Character attributes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Attribute {
    Strength,
    Intelligence,
    Wisdom,
    Dexterity,
    Constitution,
    Charisma,
}

impl Attribute {
    /// Attribute that backs a passive skill value, if any
    pub fn governing(skill: &str) -> Option<Attribute> {
        let skill = skill.to_ascii_lowercase();
        match skill.as_str() {
            "perception" | "insight" | "survival" => Some(Attribute::Wisdom),
            "athletics" => Some(Attribute::Strength),
            "acrobatics" | "stealth" | "lockpicking" => Some(Attribute::Dexterity),
            "arcana" | "lore" | "investigation" => Some(Attribute::Intelligence),
            "endurance" => Some(Attribute::Constitution),
            "persuasion" => Some(Attribute::Charisma),
            _ => None,
        }
    }
}

/// Baseline attribute score
pub const BASE_ATTRIBUTE: i32 = 10;
/// Passive value of an untrained skill with average attributes
pub const BASE_PASSIVE: i32 = 10;

/// Read-only view of a player's skills, attributes and carried item tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSnapshot {
    pub skills: BTreeMap<String, i32>,
    pub attributes: BTreeMap<Attribute, i32>,
    pub item_tags: BTreeSet<String>,
}

impl SkillSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, skill: impl Into<String>, level: i32) -> Self {
        self.skills.insert(skill.into(), level);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute, score: i32) -> Self {
        self.attributes.insert(attribute, score);
        self
    }

    pub fn with_item(mut self, tag: impl Into<String>) -> Self {
        self.item_tags.insert(tag.into());
        self
    }

    /// Trained level, case-insensitive on the skill name; 0 if untrained
    pub fn skill_level(&self, skill: &str) -> i32 {
        self.skills
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(skill))
            .map_or(0, |(_, level)| *level)
    }

    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(&attribute).copied().unwrap_or(BASE_ATTRIBUTE)
    }

    /// Attribute modifier, rounding down ((score - 10) / 2)
    pub fn modifier(&self, attribute: Attribute) -> i32 {
        (self.attribute(attribute) - BASE_ATTRIBUTE).div_euclid(2)
    }

    /// Passive check value: 10 + skill level + governing attribute modifier
    pub fn passive(&self, skill: &str) -> i32 {
        let modifier = Attribute::governing(skill).map_or(0, |a| self.modifier(a));
        BASE_PASSIVE + self.skill_level(skill) + modifier
    }

    pub fn has_item(&self, tag: &str) -> bool {
        self.item_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
