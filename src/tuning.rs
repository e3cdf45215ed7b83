//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults are the shipped
//! balance; a page can override any subset of fields with a JSON document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a tuning document is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance values
///
/// Percentages are of the field height. Speeds are per simulation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Towers ===
    /// Vertical gap between the two segments of a pair
    pub gap_pct: u32,
    /// Smallest upper segment height
    pub min_tower_pct: u32,
    /// Largest upper segment height
    pub max_tower_pct: u32,
    /// Tower width in pixels
    pub tower_width: f32,
    /// Time for a pair to cross the whole field
    pub tower_transit_ms: f64,
    /// Spawn interval while playing
    pub tower_spawn_ms: f64,

    // === Plane ===
    /// Starting top offset
    pub start_top_pct: f32,
    /// Fall speed gained per frame
    pub fall_acceleration: f32,
    /// Maximum fall speed as a fraction of field height
    pub max_fall_factor: f32,
    /// Rise speed as a fraction of field height
    pub rise_factor: f32,
    /// Tilt limit in degrees (applies to both directions)
    pub max_angle: f32,
    /// Plane box left edge in pixels
    pub plane_left: f32,
    pub plane_width: f32,
    pub plane_height: f32,
    /// Distance from the ground that already counts as touching it
    pub ground_epsilon: f32,

    // === Clouds ===
    pub cloud_spawn_ms: f64,
    pub cloud_transit_ms: f64,
    /// Progress given to a cloud spawned onto an empty sky
    pub cloud_head_start_ms: f64,
    pub cloud_width: f32,
    /// Clouds are placed in the top band of the sky
    pub cloud_max_top_pct: f32,

    // === Rules ===
    pub max_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gap_pct: 20,
            min_tower_pct: 10,
            max_tower_pct: 70,
            tower_width: 110.0,
            tower_transit_ms: 6000.0,
            tower_spawn_ms: 3000.0,

            start_top_pct: 30.0,
            fall_acceleration: 0.15,
            max_fall_factor: 0.005,
            rise_factor: 0.006,
            max_angle: 8.0,
            plane_left: 80.0,
            plane_width: 120.0,
            plane_height: 70.0,
            ground_epsilon: 3.0,

            cloud_spawn_ms: 9000.0,
            cloud_transit_ms: 27000.0,
            cloud_head_start_ms: 3000.0,
            cloud_width: 200.0,
            cloud_max_top_pct: 30.0,

            max_lives: 2,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.gap_pct == 0 || self.gap_pct >= 100 {
            return invalid("gap_pct", "must be between 1 and 99");
        }
        if self.min_tower_pct > self.max_tower_pct {
            return invalid("min_tower_pct", "must not exceed max_tower_pct");
        }
        // gap_pct < 100 here, so the subtraction cannot underflow
        if self.max_tower_pct > 100 - self.gap_pct {
            return invalid("max_tower_pct", "leaves no room for the lower segment");
        }
        if !(0.0..=100.0).contains(&self.start_top_pct) {
            return invalid("start_top_pct", "must be a percentage");
        }
        if !(0.0..=100.0).contains(&self.cloud_max_top_pct) {
            return invalid("cloud_max_top_pct", "must be a percentage");
        }
        if !self.plane_left.is_finite() {
            return invalid("plane_left", "must be finite");
        }

        let non_negative = [
            ("ground_epsilon", self.ground_epsilon as f64),
            ("cloud_head_start_ms", self.cloud_head_start_ms),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, "must be zero or more");
            }
        }

        let positive = [
            ("tower_width", self.tower_width as f64),
            ("tower_transit_ms", self.tower_transit_ms),
            ("tower_spawn_ms", self.tower_spawn_ms),
            ("fall_acceleration", self.fall_acceleration as f64),
            ("max_fall_factor", self.max_fall_factor as f64),
            ("rise_factor", self.rise_factor as f64),
            ("max_angle", self.max_angle as f64),
            ("plane_width", self.plane_width as f64),
            ("plane_height", self.plane_height as f64),
            ("cloud_spawn_ms", self.cloud_spawn_ms),
            ("cloud_transit_ms", self.cloud_transit_ms),
            ("cloud_width", self.cloud_width as f64),
        ];
        for (field, value) in positive {
            // NaN fails this too
            if !(value > 0.0) {
                return invalid(field, "must be positive");
            }
        }

        if self.max_lives == 0 {
            return invalid("max_lives", "must be at least 1");
        }

        Ok(())
    }
}
