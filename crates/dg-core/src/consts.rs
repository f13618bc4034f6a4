//! Tuning constants for region generation and navigation

/// Largest grid layout allowed (width * height)
pub const MAX_GRID_NODES: usize = 100;

/// Default BSP bounding area
pub const BSP_WIDTH: i32 = 64;
pub const BSP_HEIGHT: i32 = 48;
pub const BSP_MIN_ROOM: i32 = 8;
pub const BSP_MAX_DEPTH: u32 = 4;

/// Default flood-fill parameters
pub const FLOOD_TARGET: usize = 24;
pub const FLOOD_DENSITY: f64 = 0.5;

/// Loop augmentation buffer range (fraction of the base extra count)
pub const LOOP_BUFFER_MIN: f64 = 0.10;
pub const LOOP_BUFFER_MAX: f64 = 0.20;

/// Frontier quota
pub const MIN_FRONTIER: usize = 2;
pub const FRONTIER_FRACTION: f64 = 0.25;

/// Share of eligible degree-1 nodes that become dead ends
pub const DEAD_END_FRACTION: f64 = 0.20;

/// Hidden edge share of all directed edges
pub const HIDDEN_FRACTION_MIN: f64 = 0.15;
pub const HIDDEN_FRACTION_MAX: f64 = 0.25;

/// Perception difficulty bounds for hidden edges
pub const HIDDEN_DC_MIN: i32 = 10;
pub const HIDDEN_DC_MAX: i32 = 30;
pub const HIDDEN_DC_JITTER: i32 = 3;

/// Skill used for hidden-edge discovery
pub const PERCEPTION: &str = "Perception";

/// Geometric fallback window for compass requests (radians, 45 degrees)
pub const BEARING_TOLERANCE: f64 = std::f64::consts::FRAC_PI_4;

/// Exit intent fuzzy matching
pub const MAX_EDIT_DISTANCE: usize = 2;
pub const LLM_TIMEOUT_MS: u64 = 2_000;
/// Per-node bound on the content collaborator
pub const CONTENT_TIMEOUT_MS: u64 = 5_000;
