//! Rendering boundary
//!
//! The game driver describes every visible change as a [`DrawCommand`]. A
//! [`Renderer`] maps those onto whatever surface the platform has: DOM
//! elements in the browser, nothing at all in the headless run.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;

use crate::sim::{Prompt, Segment};

/// One visible change
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Plane pose (top offset in px, tilt in degrees)
    Plane { top: f32, angle: f32 },
    TowerAdded {
        id: u32,
        upper_pct: u32,
        lower_pct: u32,
        aerial: Segment,
        smoke: bool,
    },
    TowerMoved { id: u32, left: f32 },
    TowerRemoved { id: u32 },
    /// Stop all tower motion where it is
    TowersFrozen,
    TowersCleared,
    CloudAdded { id: u32, top_pct: f32 },
    CloudMoved { id: u32, left: f32 },
    CloudRemoved { id: u32 },
    Score(u32),
    /// How many life icons show as intact
    LifeIcons { intact: u8 },
    /// Show one prompt, or hide them all
    Prompt(Option<Prompt>),
}

/// Something that can draw the field
pub trait Renderer {
    fn draw(&mut self, command: DrawCommand);
}

/// Headless renderer
impl Renderer for () {
    fn draw(&mut self, _command: DrawCommand) {}
}
