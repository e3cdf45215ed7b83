//! Browser wiring: viewport size, page tuning and input listeners

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, KeyboardEvent, PointerEvent};

use super::{KeyBinding, key_binding, tuning_or_default};
use crate::audio::AudioManager;
use crate::game::Game;
use crate::renderer::DomRenderer;
use crate::sim::FieldSize;
use crate::tuning::Tuning;

pub type WebGame = Game<DomRenderer, AudioManager>;

/// Field size: width of the field element, height of the viewport
pub fn field_size(document: &Document, field: &Element) -> FieldSize {
    let height = document
        .document_element()
        .map(|el| el.client_height())
        .unwrap_or_else(|| field.client_height());
    FieldSize::new(field.client_width() as f32, height as f32)
}

/// Read `<script id="tuning" type="application/json">` if the page has one
pub fn load_tuning(document: &Document) -> Tuning {
    let json = document
        .get_element_by_id("tuning")
        .and_then(|el| el.text_content());
    tuning_or_default(json.as_deref())
}

pub fn setup_input_handlers(field: &Element, game: Rc<RefCell<WebGame>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window - input disabled");
        return;
    };

    // Keyboard down
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match key_binding(&event.code()) {
                Some(KeyBinding::Action) => {
                    event.prevent_default();
                    // Held keys repeat; only the first press counts
                    if !event.repeat() {
                        let mut g = game.borrow_mut();
                        g.audio().resume();
                        g.press();
                    }
                }
                Some(KeyBinding::ToggleMute) => {
                    let muted = game.borrow_mut().audio_mut().toggle_muted();
                    log::info!("Muted: {}", muted);
                }
                None => {}
            }
        });
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Keyboard up
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if key_binding(&event.code()) == Some(KeyBinding::Action) {
                game.borrow_mut().release();
            }
        });
        let _ =
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Pointer down on the field (mouse, pen, touch)
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            event.prevent_default();
            let mut g = game.borrow_mut();
            g.audio().resume();
            g.press();
        });
        let _ = field
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Pointer up anywhere, so dragging off the field still releases
    for event_name in ["pointerup", "pointercancel"] {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
            game.borrow_mut().release();
        });
        let _ = window
            .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
