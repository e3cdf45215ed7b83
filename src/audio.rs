//! Audio cues
//!
//! The game only ever fires two cues. In the browser they are generated
//! procedurally with the Web Audio API - no sound files needed.

/// Fire-and-forget sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// A tower pair was cleared
    Scored,
    /// A life was lost
    Lost,
}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Silent sink for headless runs
impl AudioSink for () {
    fn play(&mut self, _cue: SoundCue) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Flip mute, returning the new state
        pub fn toggle_muted(&mut self) -> bool {
            self.muted = !self.muted;
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Score - two quick rising blips
        fn play_scored(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [660.0, 990.0].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                    return;
                };
                let start = t + i as f64 * 0.07;

                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.15, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.09)
                    .ok();

                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.1).ok();
            }
        }

        /// Lost - falling engine whine
        fn play_lost(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.7)
                .ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(70.0, t + 0.7)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.75).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                SoundCue::Scored => self.play_scored(ctx, vol),
                SoundCue::Lost => self.play_lost(ctx, vol),
            }
        }
    }
}
