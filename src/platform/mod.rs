//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Viewport size
//! - Tuning overrides embedded in the page
//! - Input events (keyboard, pointer)

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebGame, field_size, load_tuning, setup_input_handlers};

use crate::tuning::Tuning;

/// Resolve optional tuning JSON, falling back to defaults on any error
pub fn tuning_or_default(json: Option<&str>) -> Tuning {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        None => Tuning::default(),
        Some(json) => match Tuning::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        },
    }
}

/// Input meaning of a keyboard `code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Action,
    ToggleMute,
}

pub fn key_binding(code: &str) -> Option<KeyBinding> {
    match code {
        "Space" => Some(KeyBinding::Action),
        "KeyM" => Some(KeyBinding::ToggleMute),
        _ => None,
    }
}
