//! Direction vocabulary
//!
//! Eight compass points plus the secondary vertical/abstract pairs, with
//! canonical opposites and bearings. Bearings are radians in [0, 2π) with 0
//! pointing east and angles growing counter-clockwise; map y grows southward.

use std::f64::consts::{FRAC_PI_4, TAU};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Prefix of synthetic forward labels (`passage-3`)
pub const PASSAGE_PREFIX: &str = "passage-";
/// Prefix of synthetic reverse labels (`passage-back-3`)
pub const PASSAGE_BACK_PREFIX: &str = "passage-back-";

/// Exit directions
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Up,
    Down,
    In,
    Out,
}

/// The eight compass points in clockwise order from north
pub const COMPASS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

/// Secondary pool, tried when no compass pair fits
pub const SECONDARY: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::In,
    Direction::Out,
];

impl Direction {
    /// Lowercase label used on edges
    pub const fn label(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "northeast",
            Direction::East => "east",
            Direction::SouthEast => "southeast",
            Direction::South => "south",
            Direction::SouthWest => "southwest",
            Direction::West => "west",
            Direction::NorthWest => "northwest",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Canonical opposite
    pub const fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }

    /// Check if this is one of the eight compass points
    pub const fn is_compass(&self) -> bool {
        !matches!(
            self,
            Direction::Up | Direction::Down | Direction::In | Direction::Out
        )
    }

    /// Compass bearing, `None` for vertical/abstract directions
    pub fn bearing(&self) -> Option<f64> {
        let octant = match self {
            Direction::East => 0.0,
            Direction::NorthEast => 1.0,
            Direction::North => 2.0,
            Direction::NorthWest => 3.0,
            Direction::West => 4.0,
            Direction::SouthWest => 5.0,
            Direction::South => 6.0,
            Direction::SouthEast => 7.0,
            _ => return None,
        };
        Some(octant * FRAC_PI_4)
    }

    /// Parse an exact label, ignoring case and surrounding whitespace
    pub fn parse(text: &str) -> Option<Direction> {
        let text = text.trim();
        Direction::iter().find(|d| d.label().eq_ignore_ascii_case(text))
    }

    /// Nearest compass point to a bearing
    pub fn snap(bearing: f64) -> Direction {
        let mut best = Direction::East;
        let mut best_dist = f64::MAX;
        for dir in COMPASS {
            if let Some(b) = dir.bearing() {
                let dist = angular_distance(bearing, b);
                if dist < best_dist {
                    best = dir;
                    best_dist = dist;
                }
            }
        }
        best
    }

    /// Compass points ordered by angular distance from a bearing
    ///
    /// The first entry is `snap(bearing)`.
    pub fn by_proximity(bearing: f64) -> Vec<Direction> {
        let mut dirs: Vec<(Direction, f64)> = COMPASS
            .iter()
            .filter_map(|d| d.bearing().map(|b| (*d, angular_distance(bearing, b))))
            .collect();
        dirs.sort_by(|a, b| a.1.total_cmp(&b.1));
        dirs.into_iter().map(|(d, _)| d).collect()
    }
}

/// Normalize an angle to [0, 2π)
pub fn normalize_bearing(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Smallest angle between two bearings, wrap-around aware
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (normalize_bearing(a) - normalize_bearing(b)).abs();
    d.min(TAU - d)
}

/// Synthetic forward label for pair `k`
pub fn passage_label(k: u32) -> String {
    format!("{PASSAGE_PREFIX}{k}")
}

/// Synthetic reverse label for pair `k`
pub fn passage_back_label(k: u32) -> String {
    format!("{PASSAGE_BACK_PREFIX}{k}")
}

/// Canonical opposite of any edge label
///
/// Handles vocabulary words and the synthetic passage pairs. Returns `None`
/// for labels outside both.
pub fn opposite_label(label: &str) -> Option<String> {
    if let Some(dir) = Direction::parse(label) {
        return Some(dir.opposite().label().to_string());
    }
    if let Some(k) = label.strip_prefix(PASSAGE_BACK_PREFIX) {
        return k.parse::<u32>().ok().map(passage_label);
    }
    if let Some(k) = label.strip_prefix(PASSAGE_PREFIX) {
        return k.parse::<u32>().ok().map(passage_back_label);
    }
    None
}

/// Check whether two labels are each other's canonical opposites
pub fn are_opposites(a: &str, b: &str) -> bool {
    opposite_label(a).is_some_and(|o| o.eq_ignore_ascii_case(b))
}
