//! Fixed timestep simulation tick
//!
//! Advances timers, spawns, and (while a run is live) one physics frame.
//! Input arrives separately through [`apply_action`].

use rand::Rng;

use super::collision::{hits_any_tower, mark_passed, out_of_bounds};
use super::physics::{PhysicsLimits, step_plane};
use super::spawn::{expire_finished, spawn_cloud, spawn_towers};
use super::state::{GameEvent, GamePhase, GameState, LossCause, Prompt};

/// The single game control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
}

/// Apply a press or release of the action control
///
/// A press first answers any visible prompt (start, continue, restart) and
/// then always starts a climb. A release always lets the plane fall.
pub fn apply_action(state: &mut GameState, action: Action) {
    match action {
        Action::Press => {
            match state.prompt {
                Some(Prompt::Start) => start(state),
                Some(Prompt::Continue | Prompt::Restart) => restart(state),
                None => {}
            }
            state.plane.falling = false;
        }
        Action::Release => state.plane.falling = true,
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<R: Rng>(state: &mut GameState, rng: &mut R, dt_ms: f64) {
    state.time_ms += dt_ms;
    let now = state.time_ms;

    // Clouds drift regardless of game status
    for _ in 0..state.cloud_timer.poll(now) {
        spawn_cloud(state, rng);
    }

    if state.phase == GamePhase::Playing {
        for _ in 0..state.tower_timer.poll(now) {
            spawn_towers(state, rng);
        }
    } else {
        state.tower_timer.cancel();
    }

    expire_finished(state);

    if state.frame_loop_active {
        run_frame(state);
    }
}

/// One physics + collision + scoring pass
fn run_frame(state: &mut GameState) {
    state.frames += 1;

    let limits = PhysicsLimits::for_field_height(state.field.height, &state.tuning);
    step_plane(&mut state.plane, &limits);

    let now = state.time_ms;
    let plane_box = state.plane_rect();

    let passed = mark_passed(
        &plane_box,
        &mut state.towers,
        now,
        state.field,
        &state.tuning,
    );
    for _ in 0..passed {
        state.score += 1;
        log::debug!("Scored: {}", state.score);
        state.push_event(GameEvent::Scored { score: state.score });
    }

    let cause = if hits_any_tower(&plane_box, &state.towers, now, state.field, &state.tuning) {
        state.smoke = true;
        Some(LossCause::Tower)
    } else {
        out_of_bounds(&state.plane, state.field, &state.tuning)
    };

    if let Some(cause) = cause {
        lose_life(state, cause);
    }
}

fn start(state: &mut GameState) {
    state.prompt = None;
    state.phase = GamePhase::Playing;
    state.frame_loop_active = true;
    state.tower_timer.start(state.time_ms);
    log::info!("Run started");
    state.push_event(GameEvent::Started);
}

fn restart(state: &mut GameState) {
    // Lives are back at max only after a game over
    let full = state.lives == state.tuning.max_lives;

    state.prompt = None;
    state.phase = GamePhase::Playing;
    let top = state.start_top();
    state.plane.reset(top);
    state.towers.clear();
    state.tower_timer.start(state.time_ms);
    state.frame_loop_active = true;

    log::info!("Run restarted (lives {}, full reset {})", state.lives, full);
    state.push_event(GameEvent::Restarted { full });
}

/// End the current life: stop the run, freeze the field, settle the score
fn lose_life(state: &mut GameState, cause: LossCause) {
    let now = state.time_ms;

    state.frame_loop_active = false;
    state.tower_timer.cancel();
    for pair in &mut state.towers {
        pair.freeze(now);
    }
    state.plane.angle = 0.0;

    debug_assert!(state.lives > 0, "lost a life with none left");
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::LifeLost {
        cause,
        lives_left: state.lives,
    });

    if state.lives > 0 {
        log::info!("Life lost ({:?}), {} left", cause, state.lives);
        state.phase = GamePhase::Idle;
        state.prompt = Some(Prompt::Continue);
    } else {
        let final_score = state.score;
        log::info!("Game over ({:?}), final score {}", cause, final_score);
        state.lives = state.tuning.max_lives;
        state.score = 0;
        state.smoke = false;
        state.phase = GamePhase::Lost;
        state.prompt = Some(Prompt::Restart);
        state.push_event(GameEvent::GameOver { final_score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::state::{FieldSize, Segment, TowerPair, TowerSplit};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state() -> (GameState, Pcg32) {
        let state = GameState::new(Tuning::default(), FieldSize::new(1200.0, 800.0));
        (state, Pcg32::seed_from_u64(12345))
    }

    fn started() -> (GameState, Pcg32) {
        let (mut state, rng) = new_state();
        apply_action(&mut state, Action::Press);
        apply_action(&mut state, Action::Release);
        state.drain_events();
        (state, rng)
    }

    /// Keep the plane near its start height
    fn hover(state: &mut GameState, rng: &mut Pcg32, frames: usize) {
        for _ in 0..frames {
            let action = if state.plane.top > state.start_top() {
                Action::Press
            } else {
                Action::Release
            };
            apply_action(state, action);
            tick(state, rng, FRAME_MS);
        }
    }

    /// A pair that sits across the plane on the next tick
    fn pair_over_plane(state: &mut GameState, upper_pct: u32) -> u32 {
        let id = state.next_entity_id();
        let next_tick = state.time_ms + FRAME_MS;
        state.towers.push(TowerPair {
            id,
            split: TowerSplit::new(upper_pct, state.tuning.gap_pct),
            aerial: Segment::Upper,
            smoke: false,
            passed: false,
            spawned_at_ms: next_tick - state.tuning.tower_transit_ms * 0.8,
            frozen_at_ms: None,
        });
        id
    }

    #[test]
    fn test_start_from_idle() {
        let (mut state, _) = new_state();
        apply_action(&mut state, Action::Press);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.prompt, None);
        assert!(state.frame_loop_active);
        assert!(state.tower_timer.is_active());
        assert!(!state.plane.falling, "the start press also climbs");
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_idle_does_not_move_plane() {
        let (mut state, mut rng) = new_state();
        for _ in 0..120 {
            tick(&mut state, &mut rng, FRAME_MS);
        }
        assert_eq!(state.plane.top, 240.0);
        assert_eq!(state.frames, 0);
    }

    #[test]
    fn test_repeated_signals_are_idempotent() {
        let (mut state, _) = started();
        apply_action(&mut state, Action::Press);
        apply_action(&mut state, Action::Press);
        assert!(!state.plane.falling);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().is_empty());

        apply_action(&mut state, Action::Release);
        apply_action(&mut state, Action::Release);
        assert!(state.plane.falling);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_first_tower_after_spawn_period() {
        let (mut state, mut rng) = started();
        hover(&mut state, &mut rng, 179);
        assert!(state.towers.is_empty());
        hover(&mut state, &mut rng, 3);
        assert_eq!(state.towers.len(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_first_collision_continues() {
        let (mut state, mut rng) = started();
        state.score = 5;
        pair_over_plane(&mut state, 70);

        tick(&mut state, &mut rng, FRAME_MS);

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.prompt, Some(Prompt::Continue));
        assert_eq!(state.lives, 1);
        assert_eq!(state.score, 5);
        assert!(state.smoke);
        assert!(!state.frame_loop_active);
        assert!(!state.tower_timer.is_active());
        assert_eq!(state.plane.angle, 0.0);

        // Frozen, not removed
        assert_eq!(state.towers.len(), 1);
        assert!(state.towers[0].frozen_at_ms.is_some());

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LifeLost {
                cause: LossCause::Tower,
                lives_left: 1
            }]
        );
    }

    #[test]
    fn test_frozen_field_stays_put() {
        let (mut state, mut rng) = started();
        pair_over_plane(&mut state, 70);
        tick(&mut state, &mut rng, FRAME_MS);
        let top = state.plane.top;
        let frames = state.frames;

        for _ in 0..2000 {
            tick(&mut state, &mut rng, FRAME_MS);
        }
        assert_eq!(state.towers.len(), 1, "frozen towers never expire");
        assert_eq!(state.plane.top, top);
        assert_eq!(state.frames, frames);
    }

    #[test]
    fn test_second_collision_is_game_over() {
        let (mut state, mut rng) = started();
        state.lives = 1;
        state.smoke = true;
        state.score = 7;
        pair_over_plane(&mut state, 70);

        tick(&mut state, &mut rng, FRAME_MS);

        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.prompt, Some(Prompt::Restart));
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert!(!state.smoke);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::LifeLost {
                    cause: LossCause::Tower,
                    lives_left: 0
                },
                GameEvent::GameOver { final_score: 7 },
            ]
        );
    }

    #[test]
    fn test_ceiling_and_ground() {
        let (mut state, mut rng) = started();
        apply_action(&mut state, Action::Press);
        for _ in 0..200 {
            tick(&mut state, &mut rng, FRAME_MS);
        }
        assert!(state.drain_events().contains(&GameEvent::LifeLost {
            cause: LossCause::Ceiling,
            lives_left: 1
        }));
        assert!(!state.smoke, "leaving the field is not a tower hit");

        // Continue, then drop to the ground
        apply_action(&mut state, Action::Press);
        apply_action(&mut state, Action::Release);
        for _ in 0..170 {
            tick(&mut state, &mut rng, FRAME_MS);
        }
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LifeLost {
            cause: LossCause::Ground,
            lives_left: 0
        }));
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn test_pair_scores_exactly_once() {
        let (mut state, mut rng) = started();
        state.plane.top = 330.0;

        // Gap spans 320..480; trailing edge starts 10 px right of the plane's
        let id = state.next_entity_id();
        let progress = (1200.0 - 100.0) / 1310.0;
        state.towers.push(TowerPair {
            id,
            split: TowerSplit::new(40, 20),
            aerial: Segment::Lower,
            smoke: false,
            passed: false,
            spawned_at_ms: state.time_ms - state.tuning.tower_transit_ms * progress,
            frozen_at_ms: None,
        });

        for _ in 0..20 {
            tick(&mut state, &mut rng, FRAME_MS);
        }

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 1);
        assert!(state.towers[0].passed);
        let scored: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Scored { .. }))
            .collect();
        assert_eq!(scored, vec![GameEvent::Scored { score: 1 }]);
    }

    #[test]
    fn test_restart_after_continue() {
        let (mut state, mut rng) = started();
        hover(&mut state, &mut rng, 200);
        pair_over_plane(&mut state, 70);
        tick(&mut state, &mut rng, FRAME_MS);
        assert_eq!(state.prompt, Some(Prompt::Continue));
        assert!(state.towers.len() >= 2);
        state.drain_events();

        apply_action(&mut state, Action::Press);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.towers.is_empty());
        assert_eq!(state.plane.top, 240.0);
        assert_eq!(state.plane.speed, 0.0);
        assert_eq!(state.lives, 1);
        assert!(state.frame_loop_active);
        assert!(state.tower_timer.is_active());
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted { full: false }]);
    }

    #[test]
    fn test_restart_after_game_over_is_full() {
        let (mut state, mut rng) = started();
        state.lives = 1;
        pair_over_plane(&mut state, 70);
        tick(&mut state, &mut rng, FRAME_MS);
        state.drain_events();

        apply_action(&mut state, Action::Press);
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted { full: true }]);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_smoke_shows_after_crash() {
        let (mut state, mut rng) = started();
        pair_over_plane(&mut state, 70);
        tick(&mut state, &mut rng, FRAME_MS);
        apply_action(&mut state, Action::Press);

        hover(&mut state, &mut rng, 182);
        assert_eq!(state.towers.len(), 1);
        assert!(state.towers[0].smoke);
    }

    #[test]
    fn test_clouds_spawn_while_idle() {
        let (mut state, mut rng) = new_state();
        let frames = (9000.0 / FRAME_MS) as usize + 2;
        for _ in 0..frames {
            tick(&mut state, &mut rng, FRAME_MS);
        }
        assert_eq!(state.clouds.len(), 1);
        assert!(state.towers.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let (mut state1, mut rng1) = started();
        let (mut state2, mut rng2) = started();

        hover(&mut state1, &mut rng1, 600);
        hover(&mut state2, &mut rng2, 600);

        assert_eq!(state1.frames, state2.frames);
        assert_eq!(
            serde_json::to_string(&state1).unwrap(),
            serde_json::to_string(&state2).unwrap()
        );
    }
}
