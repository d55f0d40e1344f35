//! Browser bindings
//!
//! Exposes the scene to a JavaScript front end. The front end owns drawing
//! and raw events; it forwards pointer/button state here and reads back the
//! path and the goal flag every frame.

use glam::DVec2;
use wasm_bindgen::prelude::*;

use crate::level::{ExportMode, Level};
use crate::persistence::LevelStore;
use crate::settings::{FireMode, Limits, Settings};
use crate::sim::{ObstaclePalette, PointerState, Scene, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Laser Bounce (web) starting...");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct LaserGame {
    scene: Scene,
    pointer: PointerState,
    input: TickInput,
    settings: Settings,
    store: LevelStore,
}

#[wasm_bindgen]
impl LaserGame {
    /// Create a game from level text (a share-link query string)
    #[wasm_bindgen(constructor)]
    pub fn new(level: &str) -> LaserGame {
        let settings = Settings::load();
        let mut scene = Level::decode(level).to_scene();
        scene.rest_length = settings.rest_length;
        scene.set_mode(settings.fire_mode);
        LaserGame {
            scene,
            pointer: PointerState::default(),
            input: TickInput::default(),
            settings,
            store: LevelStore::load(),
        }
    }

    /// Advance one frame (`dt` in seconds)
    pub fn tick(&mut self, dt: f64) {
        let input = self.input.clone();
        tick(&mut self.scene, &mut self.pointer, &input, &self.settings, dt);

        // Clear one-shot inputs after processing
        self.input.press_at = None;
        self.input.release = false;
        self.input.drag_delta = DVec2::ZERO;
        self.input.delete = false;
        self.input.fire = false;
        self.input.place = None;
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.input.press_at = Some(DVec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.input.release = true;
    }

    /// Accumulate pointer movement (world units) until the next tick
    pub fn pointer_move(&mut self, dx: f64, dy: f64) {
        self.input.drag_delta += DVec2::new(dx, dy);
    }

    pub fn set_rotate_left(&mut self, held: bool) {
        self.input.rotate_left = held;
    }

    pub fn set_rotate_right(&mut self, held: bool) {
        self.input.rotate_right = held;
    }

    pub fn delete_selected(&mut self) {
        self.input.delete = true;
    }

    pub fn fire(&mut self) {
        self.input.fire = true;
    }

    /// Drop a new default square from the palette
    pub fn place_box(&mut self, reflective: bool, x: f64, y: f64) {
        let palette = if reflective {
            ObstaclePalette::Reflective
        } else {
            ObstaclePalette::Absorptive
        };
        self.input.place = Some((palette, DVec2::new(x, y)));
    }

    /// Current path as a flat `[x, y, x, y, ...]` array in world space
    pub fn path(&self) -> Vec<f64> {
        self.scene
            .trace()
            .map(|t| t.world_points().iter().flat_map(|p| [p.x, p.y]).collect())
            .unwrap_or_default()
    }

    pub fn goal_active(&self) -> bool {
        self.scene.target.active
    }

    /// Editor: field size from text boxes (clamped, default on junk)
    pub fn resize(&mut self, width: &str, height: &str) -> Vec<f64> {
        let width = Limits::parse_field_dimension(width);
        let height = Limits::parse_field_dimension(height);
        self.scene.resize(width, height);
        vec![width, height]
    }

    /// Editor: bounce budget from a text box; returns the applied value
    pub fn set_bounces(&mut self, text: &str) -> u32 {
        let bounces = Limits::parse_bounces(text);
        self.scene.set_max_bounces(bounces);
        bounces
    }

    /// Editor: goal radius from a text box; returns the applied value
    pub fn set_goal_radius(&mut self, text: &str) -> f64 {
        let radius = Limits::parse_goal_radius(text);
        self.scene.set_target_radius(radius);
        radius
    }

    pub fn set_fire_mode(&mut self, mode: &str) {
        match FireMode::from_str(mode) {
            Some(mode) => {
                self.settings.fire_mode = mode;
                self.settings.save();
                self.scene.set_mode(mode);
            }
            None => log::warn!("Unknown fire mode {:?}", mode),
        }
    }

    pub fn scatter(&mut self, count: usize, seed: u64) {
        self.scene.scatter(count, seed);
    }

    /// Encode the level for a share link (`editor`, `play` or anything else for plain)
    pub fn export(&self, mode: &str) -> String {
        let mode = match mode {
            "editor" => ExportMode::Editor,
            "play" => ExportMode::Play,
            _ => ExportMode::Plain,
        };
        Level::from_scene(&self.scene, mode).encode()
    }

    pub fn save_slot(&mut self, name: &str) -> bool {
        let text = Level::from_scene(&self.scene, ExportMode::Editor).encode();
        let saved = self.store.put(name, text, js_sys::Date::now());
        if saved {
            self.store.save();
        }
        saved
    }

    /// Replace the scene with a saved level; false when the slot is empty
    pub fn load_slot(&mut self, name: &str) -> bool {
        let Some(saved) = self.store.get(name) else {
            return false;
        };
        let mut scene = Level::decode(&saved.text).to_scene();
        scene.rest_length = self.settings.rest_length;
        scene.set_mode(self.settings.fire_mode);
        self.scene = scene;
        self.pointer = PointerState::default();
        true
    }

    pub fn slot_names(&self) -> Vec<String> {
        self.store.names().map(str::to_string).collect()
    }
}
