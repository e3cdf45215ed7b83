//! Demo autopilot
//!
//! Steers the plane toward the middle of the next gap. Used by the native
//! headless run and handy for soak tests.

use super::state::{GameState, Segment};
use super::tick::Action;

/// Vertical slack around the target before the pilot reacts (px)
const DEADBAND: f32 = 6.0;

/// Choose the control state for the next frame
pub fn decide(state: &GameState) -> Action {
    let plane = state.plane_rect();
    let plane_center = (plane.min.y + plane.max.y) * 0.5;

    let target = next_gap_center(state).unwrap_or_else(|| state.field.height * 0.5);

    if plane_center > target + DEADBAND {
        Action::Press
    } else {
        Action::Release
    }
}

/// Center of the gap of the closest pair not yet behind the plane
fn next_gap_center(state: &GameState) -> Option<f32> {
    let plane = state.plane_rect();
    let now = state.time_ms;

    state
        .towers
        .iter()
        .map(|pair| {
            let upper = pair.segment_rect(Segment::Upper, now, state.field, &state.tuning);
            let lower = pair.segment_rect(Segment::Lower, now, state.field, &state.tuning);
            (upper, lower)
        })
        .filter(|(upper, _)| upper.right() > plane.min.x)
        .min_by(|(a, _), (b, _)| a.min.x.total_cmp(&b.min.x))
        .map(|(upper, lower)| (upper.bottom() + lower.min.y) * 0.5)
}
