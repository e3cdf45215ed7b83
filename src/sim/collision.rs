//! Collision and scoring checks
//!
//! Everything on the field is an axis-aligned box. Boxes that only share an
//! edge do not collide; any overlap with positive area does.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{FieldSize, LossCause, Plane, Segment, TowerPair};
use crate::tuning::Tuning;

/// Axis-aligned box in field pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// True if the plane box overlaps either segment of any pair
pub fn hits_any_tower(
    plane: &Rect,
    towers: &[TowerPair],
    now_ms: f64,
    field: FieldSize,
    tuning: &Tuning,
) -> bool {
    towers.iter().any(|pair| {
        [Segment::Upper, Segment::Lower]
            .into_iter()
            .any(|segment| plane.overlaps(&pair.segment_rect(segment, now_ms, field, tuning)))
    })
}

/// Check whether the plane has left the field
///
/// Above the top counts only once the whole plane is out of view; the ground
/// counts as soon as the plane comes within `ground_epsilon` of it.
pub fn out_of_bounds(plane: &Plane, field: FieldSize, tuning: &Tuning) -> Option<LossCause> {
    if plane.top + tuning.plane_height < 0.0 {
        return Some(LossCause::Ceiling);
    }
    if plane.rect(tuning).bottom() + tuning.ground_epsilon > field.height {
        return Some(LossCause::Ground);
    }
    None
}

/// Mark pairs whose lower segment has moved past the plane
///
/// Returns how many pairs were newly passed. Pairs already marked are
/// skipped, so a pair is counted at most once.
pub fn mark_passed(
    plane: &Rect,
    towers: &mut [TowerPair],
    now_ms: f64,
    field: FieldSize,
    tuning: &Tuning,
) -> u32 {
    let mut passed = 0;
    for pair in towers.iter_mut().filter(|p| !p.passed) {
        let lower = pair.segment_rect(Segment::Lower, now_ms, field, tuning);
        if lower.right() < plane.right() {
            pair.passed = true;
            passed += 1;
        }
    }
    passed
}
