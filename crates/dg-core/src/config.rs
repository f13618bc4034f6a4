//! Generation and navigation configuration
//!
//! Everything that influences a region is an explicit value here, so two
//! calls with equal configs produce equal regions.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{FRONTIER_FRACTION, LLM_TIMEOUT_MS, MAX_EDIT_DISTANCE};
use crate::error::ConfigError;
use crate::generation::LayoutKind;

/// Region theme; picks the default layout and is passed to content generation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dungeon,
    Crypt,
    Cavern,
    Fortress,
    Ruins,
}

impl Theme {
    /// Layout used when the config does not name one
    pub fn default_layout(&self) -> LayoutKind {
        match self {
            Theme::Dungeon | Theme::Fortress => LayoutKind::default_bsp(),
            Theme::Crypt => LayoutKind::Grid { width: 4, height: 4 },
            Theme::Cavern => LayoutKind::default_flood_fill(),
            Theme::Ruins => LayoutKind::Abstract { count: 12 },
        }
    }
}

/// Parameters for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub region_id: String,
    pub seed: u64,
    /// Explicit layout; `None` uses the theme default
    pub layout: Option<LayoutKind>,
    pub theme: Theme,
    /// 0 = as few loops as the degree target allows, 1 = densest
    pub loop_frequency: f64,
    /// Scales hidden-edge difficulty
    pub region_difficulty: u32,
    pub frontier_fraction: f64,
    /// Passed through to content generation
    pub spawn_mobs: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            region_id: "region".to_string(),
            seed: 0,
            layout: None,
            theme: Theme::default(),
            loop_frequency: 0.5,
            region_difficulty: 1,
            frontier_fraction: FRONTIER_FRACTION,
            spawn_mobs: true,
        }
    }
}

impl GenerationConfig {
    pub fn new(region_id: impl Into<String>, seed: u64) -> Self {
        Self {
            region_id: region_id.into(),
            seed,
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_loop_frequency(mut self, loop_frequency: f64) -> Self {
        self.loop_frequency = loop_frequency;
        self
    }

    pub fn with_difficulty(mut self, region_difficulty: u32) -> Self {
        self.region_difficulty = region_difficulty;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Layout actually used for generation
    pub fn effective_layout(&self) -> LayoutKind {
        self.layout
            .clone()
            .unwrap_or_else(|| self.theme.default_layout())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_id.trim().is_empty() {
            return Err(ConfigError::Invalid("region_id is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.loop_frequency) {
            return Err(ConfigError::Invalid(format!(
                "loop_frequency {} outside [0, 1]",
                self.loop_frequency
            )));
        }
        if !(self.frontier_fraction > 0.0 && self.frontier_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "frontier_fraction {} outside (0, 1]",
                self.frontier_fraction
            )));
        }
        self.effective_layout()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Exit intent resolution parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    pub max_edit_distance: usize,
    /// Upper bound on the natural-language fallback call
    #[serde(with = "duration_ms")]
    pub llm_timeout: Duration,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: MAX_EDIT_DISTANCE,
            llm_timeout: Duration::from_millis(LLM_TIMEOUT_MS),
        }
    }
}

pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
