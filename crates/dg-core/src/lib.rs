//! dg-core: Dungeon region topology and navigation
//!
//! This crate builds the navigable graph of a dungeon region from a seed and
//! resolves player movement against it. Generation is pure and batch-based;
//! storage, text generation and natural-language parsing are collaborators
//! behind traits.

pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod graph;
pub mod navigation;
pub mod store;
pub mod world;

mod consts;
mod rng;

pub use config::{GenerationConfig, IntentConfig, Theme};
pub use consts::*;
pub use content::{
    ContentContext, ContentGenerator, RegionContext, materialize_placeholders, materialize_region,
};
pub use error::{CollaboratorError, ConfigError, GenerationError, LinkError, StoreError};
pub use generation::{GenerationStats, generate_region, generate_region_with_stats};
pub use graph::{
    Condition, Direction, Edge, LayoutKind, Node, NodeContent, NodeType, Placement, Point,
    RegionGraph,
};
pub use navigation::{
    ConditionEvaluator, DenialReason, ExitInterpreter, IntentResolution, MoveRequest, MoveResult,
    PassiveEvaluator, PlayerNav, SkillSnapshot, navigate, resolve_exit, resolve_local,
};
pub use rng::RegionRng;
pub use store::{MemoryStore, NodeStore};
pub use world::{RegionLink, World};
