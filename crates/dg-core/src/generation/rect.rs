//! Rectangle partitioning for the BSP layout
//!
//! A bounding rectangle is split recursively along its longer axis until the
//! pieces reach the minimum room size or the depth limit. Each leaf becomes
//! one node positioned at the leaf's center.

use crate::graph::Point;
use crate::rng::RegionRng;

/// Inclusive integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left x coordinate
    pub lx: i32,
    /// Top y coordinate
    pub ly: i32,
    /// Right x coordinate
    pub hx: i32,
    /// Bottom y coordinate
    pub hy: i32,
}

/// Axis a split cuts across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitAxis {
    /// Cut with a vertical line; halves are left/right
    Vertical,
    /// Cut with a horizontal line; halves are top/bottom
    Horizontal,
}

impl Rect {
    /// Rectangle with top-left corner at the origin
    pub fn sized(width: i32, height: i32) -> Self {
        Self {
            lx: 0,
            ly: 0,
            hx: width - 1,
            hy: height - 1,
        }
    }

    pub fn width(&self) -> i32 {
        (self.hx - self.lx + 1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.hy - self.ly + 1).max(0)
    }

    pub fn is_valid(&self) -> bool {
        self.hx >= self.lx && self.hy >= self.ly
    }

    pub fn center(&self) -> Point {
        Point::new(self.lx + self.width() / 2, self.ly + self.height() / 2)
    }

    fn split(&self, axis: SplitAxis, at: i32) -> (Rect, Rect) {
        match axis {
            SplitAxis::Vertical => (
                Rect { hx: self.lx + at - 1, ..*self },
                Rect { lx: self.lx + at, ..*self },
            ),
            SplitAxis::Horizontal => (
                Rect { hy: self.ly + at - 1, ..*self },
                Rect { ly: self.ly + at, ..*self },
            ),
        }
    }
}

/// Pick the split axis that balances aspect ratio, or `None` for a leaf
fn choose_axis(rect: &Rect, min_room: i32, rng: &mut RegionRng) -> Option<SplitAxis> {
    let span = min_room.saturating_mul(2);
    let can_vertical = rect.width() >= span;
    let can_horizontal = rect.height() >= span;

    let preferred = match rect.width().cmp(&rect.height()) {
        std::cmp::Ordering::Greater => SplitAxis::Vertical,
        std::cmp::Ordering::Less => SplitAxis::Horizontal,
        std::cmp::Ordering::Equal => {
            if rng.one_in(2) {
                SplitAxis::Vertical
            } else {
                SplitAxis::Horizontal
            }
        }
    };

    match (preferred, can_vertical, can_horizontal) {
        (SplitAxis::Vertical, true, _) => Some(SplitAxis::Vertical),
        (SplitAxis::Horizontal, _, true) => Some(SplitAxis::Horizontal),
        (_, true, false) => Some(SplitAxis::Vertical),
        (_, false, true) => Some(SplitAxis::Horizontal),
        _ => None,
    }
}

/// Recursively partition `root`, returning leaves in depth-first order
pub fn partition(root: Rect, min_room: i32, max_depth: u32, rng: &mut RegionRng) -> Vec<Rect> {
    let mut leaves = Vec::new();
    if !root.is_valid() {
        return leaves;
    }
    let min_room = min_room.max(1);
    split_into(root, 0, min_room, max_depth, rng, &mut leaves);
    leaves
}

fn split_into(
    rect: Rect,
    depth: u32,
    min_room: i32,
    max_depth: u32,
    rng: &mut RegionRng,
    leaves: &mut Vec<Rect>,
) {
    if depth >= max_depth {
        leaves.push(rect);
        return;
    }
    let Some(axis) = choose_axis(&rect, min_room, rng) else {
        leaves.push(rect);
        return;
    };

    let extent = match axis {
        SplitAxis::Vertical => rect.width(),
        SplitAxis::Horizontal => rect.height(),
    };
    // Both halves keep at least min_room along the cut axis
    let at = rng.range_i32(min_room, extent - min_room);
    let (a, b) = rect.split(axis, at);
    split_into(a, depth + 1, min_room, max_depth, rng, leaves);
    split_into(b, depth + 1, min_room, max_depth, rng, leaves);
}
