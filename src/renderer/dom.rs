//! DOM renderer
//!
//! Draws the field with plain elements positioned through inline styles.
//! The page provides the static markup (field, plane, score, life icons,
//! prompts); towers and clouds are created and removed here.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{DrawCommand, Renderer};
use crate::sim::{Prompt, Segment};

const HIDDEN: &str = "hidden";

/// Renderer backed by DOM elements
pub struct DomRenderer {
    document: Document,
    field: Element,
    plane: Option<HtmlElement>,
    score: Option<Element>,
    life_icons: Vec<Element>,
    prompts: Vec<(Prompt, Element)>,
    /// Upper and lower segment per pair
    towers: HashMap<u32, [HtmlElement; 2]>,
    clouds: HashMap<u32, HtmlElement>,
}

impl DomRenderer {
    /// Bind to the static markup inside `field`
    pub fn new(document: Document, field: Element) -> Self {
        let find = |selector: &str| -> Option<Element> {
            let found = document.query_selector(selector).ok().flatten();
            if found.is_none() {
                log::warn!("Missing element {}", selector);
            }
            found
        };

        let plane = find(".plane").and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let score = find(".game__score");

        let mut life_icons = Vec::new();
        if let Ok(list) = document.query_selector_all(".game__plane") {
            for i in 0..list.length() {
                if let Some(el) = list.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                    life_icons.push(el);
                }
            }
        }

        let prompts = [
            (Prompt::Start, ".message--start"),
            (Prompt::Continue, ".message--continue"),
            (Prompt::Restart, ".message--restart"),
        ]
        .into_iter()
        .filter_map(|(prompt, selector)| find(selector).map(|el| (prompt, el)))
        .collect();

        Self {
            document,
            field,
            plane,
            score,
            life_icons,
            prompts,
            towers: HashMap::new(),
            clouds: HashMap::new(),
        }
    }

    fn create(&self, tag: &str, class: &str) -> Option<HtmlElement> {
        let el = self.document.create_element(tag).ok()?;
        el.set_class_name(class);
        el.dyn_into::<HtmlElement>().ok()
    }

    fn add_tower(&mut self, id: u32, heights: [u32; 2], aerial: Segment, smoke: bool) {
        let upper = self.create("div", "tower tower--upper");
        let lower = self.create("div", "tower tower--lower");
        let (Some(upper), Some(lower)) = (upper, lower) else {
            log::warn!("Could not create tower {}", id);
            return;
        };

        set_style(&upper, "height", &format!("{}%", heights[0]));
        set_style(&lower, "height", &format!("{}%", heights[1]));

        let decorated = match aerial {
            Segment::Upper => &upper,
            Segment::Lower => &lower,
        };
        if let Some(el) = self.create("span", "aerial") {
            let _ = decorated.append_child(&el);
        }
        if smoke {
            if let Some(el) = self.create("span", "smoke") {
                let _ = decorated.append_child(&el);
            }
        }

        let _ = self.field.append_child(&upper);
        let _ = self.field.append_child(&lower);
        self.towers.insert(id, [upper, lower]);
    }

    fn add_cloud(&mut self, id: u32, top_pct: f32) {
        let Some(cloud) = self.create("div", "cloud") else {
            return;
        };
        set_style(&cloud, "top", &format!("{}%", top_pct));
        let _ = self.field.append_child(&cloud);
        self.clouds.insert(id, cloud);
    }
}

impl Renderer for DomRenderer {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Plane { top, angle } => {
                if let Some(plane) = &self.plane {
                    set_style(plane, "top", &format!("{}px", top));
                    set_style(plane, "transform", &format!("rotate({}deg)", angle));
                }
            }
            DrawCommand::TowerAdded {
                id,
                upper_pct,
                lower_pct,
                aerial,
                smoke,
            } => self.add_tower(id, [upper_pct, lower_pct], aerial, smoke),
            DrawCommand::TowerMoved { id, left } => {
                if let Some(segments) = self.towers.get(&id) {
                    for el in segments {
                        set_style(el, "left", &format!("{}px", left));
                    }
                }
            }
            DrawCommand::TowerRemoved { id } => {
                if let Some(segments) = self.towers.remove(&id) {
                    for el in segments {
                        el.remove();
                    }
                }
            }
            DrawCommand::TowersFrozen => {
                for el in self.towers.values().flatten() {
                    let _ = el.class_list().add_1("tower--frozen");
                }
            }
            DrawCommand::TowersCleared => {
                for (_, segments) in self.towers.drain() {
                    for el in segments {
                        el.remove();
                    }
                }
            }
            DrawCommand::CloudAdded { id, top_pct } => self.add_cloud(id, top_pct),
            DrawCommand::CloudMoved { id, left } => {
                if let Some(cloud) = self.clouds.get(&id) {
                    set_style(cloud, "left", &format!("{}px", left));
                }
            }
            DrawCommand::CloudRemoved { id } => {
                if let Some(cloud) = self.clouds.remove(&id) {
                    cloud.remove();
                }
            }
            DrawCommand::Score(score) => {
                if let Some(el) = &self.score {
                    el.set_text_content(Some(&score.to_string()));
                }
            }
            DrawCommand::LifeIcons { intact } => {
                for (i, icon) in self.life_icons.iter().enumerate() {
                    let lost = i >= intact as usize;
                    let _ = icon
                        .class_list()
                        .toggle_with_force("game__plane--lost", lost);
                }
            }
            DrawCommand::Prompt(visible) => {
                for (prompt, el) in &self.prompts {
                    let hidden = visible != Some(*prompt);
                    let _ = el.class_list().toggle_with_force(HIDDEN, hidden);
                }
            }
        }
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}
