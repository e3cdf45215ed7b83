//! Sky Courier - a one-button plane arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `game`: Driver that runs fixed frames and feeds the renderer and audio
//! - `renderer`: Draw command boundary (DOM renderer on the web)
//! - `audio`: Sound cue boundary (Web Audio on the web)
//! - `platform`: Browser input and viewport wiring
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation frame (60 Hz, one display refresh on most screens)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum frames per refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longer refresh gaps (tab in background) are clamped to this
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;
}
