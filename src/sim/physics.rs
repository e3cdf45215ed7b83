//! Per-frame plane physics
//!
//! Falling accelerates up to a cap and tilts the nose down one degree per
//! frame. Climbing is a constant speed with the nose snapped fully up.

use super::state::Plane;
use crate::tuning::Tuning;

/// Speed limits for a given field height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsLimits {
    pub fall_acceleration: f32,
    pub max_fall_speed: f32,
    pub rise_speed: f32,
    pub max_angle: f32,
}

impl PhysicsLimits {
    /// Speeds scale with the field so play feels the same on any display
    pub fn for_field_height(height: f32, tuning: &Tuning) -> Self {
        Self {
            fall_acceleration: tuning.fall_acceleration,
            max_fall_speed: height * tuning.max_fall_factor,
            rise_speed: height * tuning.rise_factor,
            max_angle: tuning.max_angle,
        }
    }
}

/// Advance the plane by one frame
pub fn step_plane(plane: &mut Plane, limits: &PhysicsLimits) {
    if plane.falling {
        plane.speed = (plane.speed + limits.fall_acceleration).min(limits.max_fall_speed);
        plane.top += plane.speed;
        plane.angle = (plane.angle + 1.0).min(limits.max_angle);
    } else {
        plane.speed = 0.0;
        plane.top -= limits.rise_speed;
        plane.angle = -limits.max_angle;
    }
    debug_assert!(plane.top.is_finite(), "plane position went non-finite");
}
