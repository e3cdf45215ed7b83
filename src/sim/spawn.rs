//! Tower and cloud spawning
//!
//! All randomness comes from the RNG passed in, so a seeded generator gives
//! the same field every run.

use rand::Rng;

use super::state::{Cloud, GameEvent, GamePhase, GameState, Segment, TowerPair, TowerSplit};

/// Roll a height split: upper segment uniform in the tuned bounds
pub fn roll_split<R: Rng>(rng: &mut R, state: &GameState) -> TowerSplit {
    let tuning = &state.tuning;
    let upper = rng.random_range(tuning.min_tower_pct..=tuning.max_tower_pct);
    TowerSplit::new(upper, tuning.gap_pct)
}

/// Spawn one tower pair; does nothing unless the game is being played
pub fn spawn_towers<R: Rng>(state: &mut GameState, rng: &mut R) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let split = roll_split(rng, state);
    let aerial = if rng.random_bool(0.5) {
        Segment::Upper
    } else {
        Segment::Lower
    };
    // A run that already crashed once shows smoke on the aerial
    let smoke = state.lives < state.tuning.max_lives && state.smoke;

    let id = state.next_entity_id();
    state.towers.push(TowerPair {
        id,
        split,
        aerial,
        smoke,
        passed: false,
        spawned_at_ms: state.time_ms,
        frozen_at_ms: None,
    });
    log::debug!(
        "Tower pair {} spawned ({}% / {}%, aerial {:?}, smoke {})",
        id,
        split.upper_pct,
        split.lower_pct,
        aerial,
        smoke
    );
    state.push_event(GameEvent::TowerSpawned { id });
}

/// Spawn one cloud, regardless of game phase
pub fn spawn_cloud<R: Rng>(state: &mut GameState, rng: &mut R) {
    let top_pct = rng.random::<f32>() * state.tuning.cloud_max_top_pct;
    // The first cloud on an empty sky starts part-way across
    let head_start_ms = if state.clouds.is_empty() {
        state.tuning.cloud_head_start_ms
    } else {
        0.0
    };

    let id = state.next_entity_id();
    state.clouds.push(Cloud {
        id,
        top_pct,
        spawned_at_ms: state.time_ms,
        head_start_ms,
    });
    state.push_event(GameEvent::CloudSpawned { id });
}

/// Drop towers and clouds whose transit finished
pub fn expire_finished(state: &mut GameState) {
    let now = state.time_ms;
    let tuning = &state.tuning;

    let mut expired = Vec::new();
    state.towers.retain(|pair| {
        let done = pair.is_expired(now, tuning);
        if done {
            expired.push(GameEvent::TowerExpired { id: pair.id });
        }
        !done
    });
    state.clouds.retain(|cloud| {
        let done = cloud.is_expired(now, tuning);
        if done {
            expired.push(GameEvent::CloudExpired { id: cloud.id });
        }
        !done
    });

    state.events.extend(expired);
}
