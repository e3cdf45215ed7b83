//! Game driver
//!
//! Owns the simulation state, the seeded RNG and the injected render/audio
//! capabilities. Platform code feeds it refresh timestamps and input; it
//! runs fixed frames and turns simulation events into draw commands and
//! sound cues.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundCue};
use crate::consts::FRAME_MS;
use crate::renderer::{DrawCommand, Renderer};
use crate::sim::{
    Action, FieldSize, FrameClock, GameEvent, GameState, Prompt, apply_action, spawn_cloud, tick,
};
use crate::tuning::Tuning;

/// Game instance holding all state
pub struct Game<R: Renderer, A: AudioSink> {
    state: GameState,
    rng: Pcg32,
    seed: u64,
    clock: FrameClock,
    renderer: R,
    audio: A,
}

impl<R: Renderer, A: AudioSink> Game<R, A> {
    /// Set up an idle game and draw the opening screen
    pub fn new(tuning: Tuning, field: FieldSize, seed: u64, renderer: R, audio: A) -> Self {
        let mut game = Self {
            state: GameState::new(tuning, field),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            clock: FrameClock::new(),
            renderer,
            audio,
        };

        // The first cloud is on screen from the start
        spawn_cloud(&mut game.state, &mut game.rng);

        let max_lives = game.state.tuning.max_lives;
        game.renderer.draw(DrawCommand::Prompt(Some(Prompt::Start)));
        game.renderer.draw(DrawCommand::Score(0));
        game.renderer
            .draw(DrawCommand::LifeIcons { intact: max_lives });
        game.flush();
        game.draw_positions();

        log::info!(
            "Game initialized with seed {} on a {}x{} field",
            seed,
            field.width,
            field.height
        );
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Action control pressed
    pub fn press(&mut self) {
        apply_action(&mut self.state, Action::Press);
        self.flush();
    }

    /// Action control released
    pub fn release(&mut self) {
        apply_action(&mut self.state, Action::Release);
        self.flush();
    }

    /// Run the frames due for a display refresh at `now_ms`
    pub fn advance(&mut self, now_ms: f64) {
        let frames = self.clock.frames_due(now_ms);
        self.step_frames(frames);
    }

    /// Run `frames` fixed frames and redraw once
    pub fn step_frames(&mut self, frames: u32) {
        if frames == 0 {
            return;
        }
        for _ in 0..frames {
            tick(&mut self.state, &mut self.rng, FRAME_MS);
            self.flush();
        }
        self.draw_positions();
    }

    /// Turn pending simulation events into draw commands and cues
    fn flush(&mut self) {
        let max_lives = self.state.tuning.max_lives;

        for event in self.state.drain_events() {
            match event {
                GameEvent::Started => {
                    self.renderer.draw(DrawCommand::Prompt(None));
                }
                GameEvent::Restarted { full } => {
                    if full {
                        self.renderer
                            .draw(DrawCommand::LifeIcons { intact: max_lives });
                        self.renderer.draw(DrawCommand::Score(0));
                    }
                    self.renderer.draw(DrawCommand::Prompt(None));
                    self.renderer.draw(DrawCommand::TowersCleared);
                }
                GameEvent::Scored { score } => {
                    self.renderer.draw(DrawCommand::Score(score));
                    self.audio.play(SoundCue::Scored);
                }
                GameEvent::LifeLost { lives_left, .. } => {
                    self.audio.play(SoundCue::Lost);
                    self.renderer.draw(DrawCommand::TowersFrozen);
                    self.renderer
                        .draw(DrawCommand::LifeIcons { intact: lives_left });
                    if lives_left > 0 {
                        self.renderer
                            .draw(DrawCommand::Prompt(Some(Prompt::Continue)));
                    }
                }
                GameEvent::GameOver { .. } => {
                    self.renderer
                        .draw(DrawCommand::Prompt(Some(Prompt::Restart)));
                }
                GameEvent::TowerSpawned { id } => {
                    if let Some(pair) = self.state.towers.iter().find(|p| p.id == id) {
                        self.renderer.draw(DrawCommand::TowerAdded {
                            id,
                            upper_pct: pair.split.upper_pct,
                            lower_pct: pair.split.lower_pct,
                            aerial: pair.aerial,
                            smoke: pair.smoke,
                        });
                    }
                }
                GameEvent::TowerExpired { id } => {
                    self.renderer.draw(DrawCommand::TowerRemoved { id });
                }
                GameEvent::CloudSpawned { id } => {
                    if let Some(cloud) = self.state.clouds.iter().find(|c| c.id == id) {
                        self.renderer.draw(DrawCommand::CloudAdded {
                            id,
                            top_pct: cloud.top_pct,
                        });
                    }
                }
                GameEvent::CloudExpired { id } => {
                    self.renderer.draw(DrawCommand::CloudRemoved { id });
                }
            }
        }

        // Plane pose changes on restart and on loss even without a frame
        self.renderer.draw(DrawCommand::Plane {
            top: self.state.plane.top,
            angle: self.state.plane.angle,
        });
    }

    /// Redraw everything that moves
    fn draw_positions(&mut self) {
        let now = self.state.time_ms;
        let field = self.state.field;
        let tuning = &self.state.tuning;

        self.renderer.draw(DrawCommand::Plane {
            top: self.state.plane.top,
            angle: self.state.plane.angle,
        });
        for pair in &self.state.towers {
            self.renderer.draw(DrawCommand::TowerMoved {
                id: pair.id,
                left: pair.left(now, field, tuning),
            });
        }
        for cloud in &self.state.clouds {
            self.renderer.draw(DrawCommand::CloudMoved {
                id: cloud.id,
                left: cloud.left(now, field, tuning),
            });
        }
    }
}
