//! Sky Courier entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use sky_courier::Game;
    use sky_courier::audio::AudioManager;
    use sky_courier::platform::{WebGame, field_size, load_tuning, setup_input_handlers};
    use sky_courier::renderer::DomRenderer;

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Sky Courier starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - nothing to run");
            return;
        };
        let Some(field) = document.query_selector(".game__field").ok().flatten() else {
            log::error!("No .game__field element - nothing to run");
            return;
        };

        let tuning = load_tuning(&document);
        let size = field_size(&document, &field);
        let seed = js_sys::Date::now() as u64;

        let renderer = DomRenderer::new(document.clone(), field.clone());
        let game = Rc::new(RefCell::new(Game::new(
            tuning,
            size,
            seed,
            renderer,
            AudioManager::new(),
        )));

        setup_input_handlers(&field, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Sky Courier running!");
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        game.borrow_mut().advance(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_courier::consts::FRAME_MS;
    use sky_courier::sim::{Action, FieldSize, GamePhase, autopilot};
    use sky_courier::{Game, Tuning};

    env_logger::init();
    log::info!("Sky Courier (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build to play");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = Game::new(Tuning::default(), FieldSize::new(1280.0, 800.0), seed, (), ());

    // Two simulated minutes
    let frames = (120_000.0 / FRAME_MS) as u32;
    let mut run_score = 0;
    let mut best = 0;
    let mut runs = 0;
    let mut last_phase = game.state().phase;

    for _ in 0..frames {
        // Answer start/continue/restart prompts straight away
        if game.state().prompt.is_some() {
            game.press();
            game.release();
        }
        match autopilot::decide(game.state()) {
            Action::Press => game.press(),
            Action::Release => game.release(),
        }
        game.step_frames(1);

        let phase = game.state().phase;
        if phase == GamePhase::Playing {
            run_score = game.state().score;
        }
        if phase == GamePhase::Lost && last_phase != GamePhase::Lost {
            runs += 1;
            best = best.max(run_score);
            log::info!("Run {} over with {}", runs, run_score);
        }
        last_phase = phase;
    }
    best = best.max(run_score);

    println!(
        "Autopilot: {} finished runs, best score {}, seed {}",
        runs,
        best,
        game.seed()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
