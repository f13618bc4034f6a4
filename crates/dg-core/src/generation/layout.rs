//! Node layout strategies
//!
//! Produces the initial node placements. Grid, BSP and flood-fill layouts
//! give every node coordinates; the abstract layout gives none.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rect::{Rect, partition};
use crate::consts::{
    BSP_HEIGHT, BSP_MAX_DEPTH, BSP_MIN_ROOM, BSP_WIDTH, FLOOD_DENSITY, FLOOD_TARGET,
    MAX_GRID_NODES,
};
use crate::error::GenerationError;
use crate::graph::{Placement, Point};
use crate::rng::RegionRng;

/// Layout strategy and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutKind {
    /// W x H integer positions, row-major
    Grid { width: u32, height: u32 },
    /// Recursive binary space partition of a bounding area
    Bsp {
        width: i32,
        height: i32,
        min_room: i32,
        max_depth: u32,
    },
    /// Random growth outward from the origin
    FloodFill { target: usize, density: f64 },
    /// Nodes without geometry
    Abstract { count: usize },
}

impl LayoutKind {
    /// BSP over the default bounding area
    pub fn default_bsp() -> Self {
        LayoutKind::Bsp {
            width: BSP_WIDTH,
            height: BSP_HEIGHT,
            min_room: BSP_MIN_ROOM,
            max_depth: BSP_MAX_DEPTH,
        }
    }

    /// Flood-fill with the default target and density
    pub fn default_flood_fill() -> Self {
        LayoutKind::FloodFill {
            target: FLOOD_TARGET,
            density: FLOOD_DENSITY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Grid { .. } => "grid",
            LayoutKind::Bsp { .. } => "bsp",
            LayoutKind::FloodFill { .. } => "flood_fill",
            LayoutKind::Abstract { .. } => "abstract",
        }
    }

    /// Largest node count these parameters can yield
    pub fn max_nodes(&self) -> usize {
        match *self {
            LayoutKind::Grid { width, height } => (width as usize).saturating_mul(height as usize),
            LayoutKind::Bsp {
                width,
                height,
                min_room,
                max_depth,
            } => {
                if width <= 0 || height <= 0 {
                    return 0;
                }
                // Every leaf keeps at least min_room on both sides
                let room = i64::from(min_room.max(1));
                let by_area = (i64::from(width) * i64::from(height)) / (room * room);
                let by_depth = 1usize.checked_shl(max_depth).unwrap_or(usize::MAX);
                usize::try_from(by_area).unwrap_or(usize::MAX).max(1).min(by_depth)
            }
            LayoutKind::FloodFill { target, .. } => target,
            LayoutKind::Abstract { count } => count,
        }
    }

    /// Reject parameters that are malformed or exceed the node limit
    ///
    /// Zero-sized layouts pass; `build` reports them as empty.
    pub fn validate(&self) -> Result<(), GenerationError> {
        match *self {
            LayoutKind::Bsp {
                width,
                height,
                min_room,
                ..
            } if width > 0 && height > 0 => {
                if min_room < 1 || min_room > width.min(height) {
                    return Err(GenerationError::InvalidLayout(format!(
                        "bsp min_room {min_room} outside 1..={}",
                        width.min(height)
                    )));
                }
            }
            LayoutKind::FloodFill { density, .. } if !(0.0..=1.0).contains(&density) => {
                return Err(GenerationError::InvalidLayout(format!(
                    "flood_fill density {density} outside [0, 1]"
                )));
            }
            _ => {}
        }

        let requested = self.max_nodes();
        if requested > MAX_GRID_NODES {
            return Err(match self {
                LayoutKind::Grid { .. } => GenerationError::GridTooLarge {
                    requested,
                    max: MAX_GRID_NODES,
                },
                _ => GenerationError::LayoutTooLarge {
                    layout: self.name().to_string(),
                    requested,
                    max: MAX_GRID_NODES,
                },
            });
        }
        Ok(())
    }

    /// Build the placements; the first entry is the region entry
    pub fn build(&self, rng: &mut RegionRng) -> Result<Vec<Placement>, GenerationError> {
        self.validate()?;
        let placements = match *self {
            LayoutKind::Grid { width, height } => grid_layout(width, height),
            LayoutKind::Bsp {
                width,
                height,
                min_room,
                max_depth,
            } => bsp_layout(width, height, min_room, max_depth, rng),
            LayoutKind::FloodFill { target, density } => flood_fill_layout(target, density, rng),
            LayoutKind::Abstract { count } => vec![Placement::Abstract; count],
        };

        if placements.is_empty() {
            return Err(GenerationError::EmptyLayout {
                layout: self.name().to_string(),
            });
        }
        debug!(layout = self.name(), nodes = placements.len(), "layout built");
        Ok(placements)
    }
}

fn grid_layout(width: u32, height: u32) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            placements.push(Placement::At(Point::new(x, y)));
        }
    }
    placements
}

fn bsp_layout(
    width: i32,
    height: i32,
    min_room: i32,
    max_depth: u32,
    rng: &mut RegionRng,
) -> Vec<Placement> {
    if width <= 0 || height <= 0 {
        return Vec::new();
    }
    partition(Rect::sized(width, height), min_room, max_depth, rng)
        .iter()
        .map(|leaf| Placement::At(leaf.center()))
        .collect()
}

fn flood_fill_layout(target: usize, density: f64, rng: &mut RegionRng) -> Vec<Placement> {
    if target == 0 {
        return Vec::new();
    }
    let density = density.clamp(0.0, 1.0);

    let mut cells = vec![Point::ORIGIN];
    let mut occupied: HashSet<Point> = HashSet::new();
    occupied.insert(Point::ORIGIN);
    let mut frontier = vec![Point::ORIGIN];

    while cells.len() < target && !frontier.is_empty() {
        let idx = rng.index(frontier.len());
        let cell = frontier[idx];
        let free: Vec<Point> = cell
            .orthogonal_neighbors()
            .into_iter()
            .filter(|p| !occupied.contains(p))
            .collect();
        if free.is_empty() {
            frontier.swap_remove(idx);
            continue;
        }

        // Always grow by at least one cell so the loop makes progress
        let take = ((free.len() as f64 * density).round() as usize).clamp(1, free.len());
        for p in rng.sample(&free, take) {
            if cells.len() >= target {
                break;
            }
            occupied.insert(p);
            cells.push(p);
            frontier.push(p);
        }
    }

    cells.into_iter().map(Placement::At).collect()
}
