//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time enters as millisecond timestamps, never read from a clock
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Rect, hits_any_tower, mark_passed, out_of_bounds};
pub use physics::{PhysicsLimits, step_plane};
pub use spawn::{roll_split, spawn_cloud, spawn_towers};
pub use state::{
    Cloud, FieldSize, GameEvent, GamePhase, GameState, LossCause, Plane, Prompt, Segment,
    TowerPair, TowerSplit,
};
pub use tick::{Action, apply_action, tick};
pub use timer::{FrameClock, IntervalTimer};
