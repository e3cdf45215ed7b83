//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]. Horizontal
//! positions of towers and clouds are not stored; they are derived from the
//! spawn timestamp and the transit duration.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::timer::IntervalTimer;
use crate::tuning::Tuning;

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, or between lives
    Idle,
    /// Frame loop running
    Playing,
    /// All lives spent, waiting for a restart
    Lost,
}

/// Message shown over the field; its next press is consumed as a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    Start,
    Continue,
    Restart,
}

/// What ended a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Tower,
    Ceiling,
    Ground,
}

/// Which segment of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Upper,
    Lower,
}

/// Things that happened during a tick, drained by the game driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    /// `full` is set when the previous run ended with all lives spent
    Restarted { full: bool },
    Scored { score: u32 },
    LifeLost { cause: LossCause, lives_left: u8 },
    GameOver { final_score: u32 },
    TowerSpawned { id: u32 },
    TowerExpired { id: u32 },
    CloudSpawned { id: u32 },
    CloudExpired { id: u32 },
}

/// Playing field size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Top offset from the field top (px)
    pub top: f32,
    /// Downward speed (px per frame)
    pub speed: f32,
    /// Visual tilt in degrees
    pub angle: f32,
    /// Control released: gravity applies
    pub falling: bool,
}

impl Plane {
    pub fn new(top: f32) -> Self {
        Self {
            top,
            speed: 0.0,
            angle: 0.0,
            falling: true,
        }
    }

    /// Put the plane back at `top`, keeping the current intent
    pub fn reset(&mut self, top: f32) {
        self.top = top;
        self.speed = 0.0;
        self.angle = 0.0;
    }

    pub fn rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(
            tuning.plane_left,
            self.top,
            tuning.plane_width,
            tuning.plane_height,
        )
    }
}

/// Upper/lower height split of a tower pair (percent of field height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerSplit {
    pub upper_pct: u32,
    pub lower_pct: u32,
}

impl TowerSplit {
    /// The lower segment takes whatever the gap and upper segment leave
    pub fn new(upper_pct: u32, gap_pct: u32) -> Self {
        debug_assert!(upper_pct + gap_pct <= 100);
        Self {
            upper_pct,
            lower_pct: 100 - gap_pct - upper_pct,
        }
    }
}

/// A pair of towers scrolling from right to left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerPair {
    pub id: u32,
    pub split: TowerSplit,
    /// Segment carrying the aerial
    pub aerial: Segment,
    /// Smoke drawn above the aerial
    pub smoke: bool,
    /// Already counted for score
    pub passed: bool,
    pub spawned_at_ms: f64,
    /// Set when the run stops; frozen pairs stay where they are
    pub frozen_at_ms: Option<f64>,
}

impl TowerPair {
    /// Milliseconds spent in transit
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (self.frozen_at_ms.unwrap_or(now_ms) - self.spawned_at_ms).max(0.0)
    }

    /// Transit completed; frozen pairs never expire
    pub fn is_expired(&self, now_ms: f64, tuning: &Tuning) -> bool {
        self.frozen_at_ms.is_none() && self.elapsed_ms(now_ms) >= tuning.tower_transit_ms
    }

    pub fn freeze(&mut self, now_ms: f64) {
        if self.frozen_at_ms.is_none() {
            self.frozen_at_ms = Some(now_ms);
        }
    }

    /// Left edge: starts just off the right of the field, ends just off the left
    pub fn left(&self, now_ms: f64, field: FieldSize, tuning: &Tuning) -> f32 {
        let progress = (self.elapsed_ms(now_ms) / tuning.tower_transit_ms).clamp(0.0, 1.0) as f32;
        field.width - progress * (field.width + tuning.tower_width)
    }

    pub fn segment_rect(
        &self,
        segment: Segment,
        now_ms: f64,
        field: FieldSize,
        tuning: &Tuning,
    ) -> Rect {
        let left = self.left(now_ms, field, tuning);
        match segment {
            Segment::Upper => {
                let height = field.height * self.split.upper_pct as f32 / 100.0;
                Rect::new(left, 0.0, tuning.tower_width, height)
            }
            Segment::Lower => {
                let height = field.height * self.split.lower_pct as f32 / 100.0;
                Rect::new(left, field.height - height, tuning.tower_width, height)
            }
        }
    }
}

/// Background cloud; purely cosmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub id: u32,
    pub top_pct: f32,
    pub spawned_at_ms: f64,
    pub head_start_ms: f64,
}

impl Cloud {
    fn progress(&self, now_ms: f64, tuning: &Tuning) -> f64 {
        (now_ms - self.spawned_at_ms + self.head_start_ms) / tuning.cloud_transit_ms
    }

    pub fn is_expired(&self, now_ms: f64, tuning: &Tuning) -> bool {
        self.progress(now_ms, tuning) >= 1.0
    }

    pub fn left(&self, now_ms: f64, field: FieldSize, tuning: &Tuning) -> f32 {
        let progress = self.progress(now_ms, tuning).clamp(0.0, 1.0) as f32;
        field.width - progress * (field.width + tuning.cloud_width)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub field: FieldSize,
    pub phase: GamePhase,
    /// Visible prompt, if any
    pub prompt: Option<Prompt>,
    pub lives: u8,
    pub score: u32,
    /// Set by a tower hit, cleared on full restart
    pub smoke: bool,
    pub plane: Plane,
    /// Active tower pairs in spawn order
    pub towers: Vec<TowerPair>,
    pub clouds: Vec<Cloud>,
    /// Simulation clock (ms), advanced in fixed frames
    pub time_ms: f64,
    /// Frames simulated while playing
    pub frames: u64,
    /// Physics frames run only while this is set
    pub frame_loop_active: bool,
    pub tower_timer: IntervalTimer,
    pub cloud_timer: IntervalTimer,
    /// Pending events for the driver
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh state: idle, start prompt visible, cloud timer running
    pub fn new(tuning: Tuning, field: FieldSize) -> Self {
        let start_top = start_top(&tuning, field);
        let mut cloud_timer = IntervalTimer::new(tuning.cloud_spawn_ms);
        cloud_timer.start(0.0);

        Self {
            field,
            phase: GamePhase::Idle,
            prompt: Some(Prompt::Start),
            lives: tuning.max_lives,
            score: 0,
            smoke: false,
            plane: Plane::new(start_top),
            towers: Vec::new(),
            clouds: Vec::new(),
            time_ms: 0.0,
            frames: 0,
            frame_loop_active: false,
            tower_timer: IntervalTimer::new(tuning.tower_spawn_ms),
            cloud_timer,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Starting top offset for the plane
    pub fn start_top(&self) -> f32 {
        start_top(&self.tuning, self.field)
    }

    pub fn plane_rect(&self) -> Rect {
        self.plane.rect(&self.tuning)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn start_top(tuning: &Tuning, field: FieldSize) -> f32 {
    (field.height * tuning.start_top_pct / 100.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldSize {
        FieldSize::new(1200.0, 800.0)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(Tuning::default(), field());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.prompt, Some(Prompt::Start));
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert!(!state.smoke);
        assert!(state.plane.falling);
        assert!(!state.frame_loop_active);
        assert!(!state.tower_timer.is_active());
        assert!(state.cloud_timer.is_active());
    }

    #[test]
    fn test_start_position_is_thirty_percent() {
        let state = GameState::new(Tuning::default(), field());
        assert_eq!(state.plane.top, 240.0);

        // Floored like a pixel offset
        let state = GameState::new(Tuning::default(), FieldSize::new(1000.0, 667.0));
        assert_eq!(state.plane.top, 200.0);
    }

    #[test]
    fn test_split_remainder() {
        let split = TowerSplit::new(45, 20);
        assert_eq!(split.lower_pct, 35);
        let split = TowerSplit::new(70, 20);
        assert_eq!(split.lower_pct, 10);
    }

    #[test]
    fn test_tower_scrolls_and_expires() {
        let tuning = Tuning::default();
        let pair = TowerPair {
            id: 1,
            split: TowerSplit::new(40, 20),
            aerial: Segment::Upper,
            smoke: false,
            passed: false,
            spawned_at_ms: 1000.0,
            frozen_at_ms: None,
        };

        assert_eq!(pair.left(1000.0, field(), &tuning), 1200.0);
        let end = pair.left(1000.0 + tuning.tower_transit_ms, field(), &tuning);
        assert!((end - -tuning.tower_width).abs() < 0.001);

        assert!(!pair.is_expired(6999.0, &tuning));
        assert!(pair.is_expired(7000.0, &tuning));
    }

    #[test]
    fn test_frozen_tower_holds_position() {
        let tuning = Tuning::default();
        let mut pair = TowerPair {
            id: 1,
            split: TowerSplit::new(40, 20),
            aerial: Segment::Lower,
            smoke: false,
            passed: false,
            spawned_at_ms: 0.0,
            frozen_at_ms: None,
        };
        pair.freeze(2000.0);
        let at_freeze = pair.left(2000.0, field(), &tuning);
        assert_eq!(pair.left(50_000.0, field(), &tuning), at_freeze);
        assert!(!pair.is_expired(50_000.0, &tuning));

        // Freezing twice keeps the first timestamp
        pair.freeze(3000.0);
        assert_eq!(pair.frozen_at_ms, Some(2000.0));
    }

    #[test]
    fn test_segment_rects() {
        let tuning = Tuning::default();
        let pair = TowerPair {
            id: 1,
            split: TowerSplit::new(45, 20),
            aerial: Segment::Upper,
            smoke: false,
            passed: false,
            spawned_at_ms: 0.0,
            frozen_at_ms: None,
        };
        let upper = pair.segment_rect(Segment::Upper, 0.0, field(), &tuning);
        let lower = pair.segment_rect(Segment::Lower, 0.0, field(), &tuning);
        assert_eq!(upper.min.y, 0.0);
        assert_eq!(upper.max.y, 360.0);
        assert_eq!(lower.min.y, 520.0);
        assert_eq!(lower.max.y, 800.0);
        // Gap of 20% between them
        assert_eq!(lower.min.y - upper.max.y, 160.0);
    }

    #[test]
    fn test_cloud_head_start() {
        let tuning = Tuning::default();
        let cloud = Cloud {
            id: 1,
            top_pct: 10.0,
            spawned_at_ms: 0.0,
            head_start_ms: 3000.0,
        };
        assert!(cloud.left(0.0, field(), &tuning) < field().width);
        assert!(!cloud.is_expired(23_999.0, &tuning));
        assert!(cloud.is_expired(24_000.0, &tuning));
    }
}
