//! Browser facade
//!
//! The page owns the canvas, menus, audio and raw input events; it forwards
//! decoded input here, calls `frame` from `requestAnimationFrame` and reads
//! back JSON for drawing and the HUD.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::consts::SIM_DT;
use crate::error::GameError;
use crate::highscores::LocalStorageStore;
use crate::session::Session;
use crate::sim::TickInput;
use crate::{SimConfig, Theme};

fn to_js(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance handed to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorageStore>,
    input: TickInput,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// `config_json` may override any subset of the default tuning
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        // Already initialised when a second game is created
        let _ = console_log::init_with_level(log::Level::Info);

        let config = match config_json {
            Some(json) => SimConfig::from_json(&json).map_err(to_js)?,
            None => SimConfig::default(),
        };
        let session = Session::new(config, LocalStorageStore).map_err(to_js)?;
        log::info!("Edge Siege ready");
        Ok(Self {
            session,
            input: TickInput::default(),
            last_time: None,
        })
    }

    pub fn select_theme(&mut self, name: &str) -> Result<(), JsValue> {
        let theme = Theme::parse(name).map_err(to_js)?;
        self.session.select_theme(theme);
        Ok(())
    }

    /// Start (or restart) a run. Fails if no theme has been picked.
    pub fn start(&mut self) -> Result<(), JsValue> {
        let seed = js_sys::Date::now() as u64 ^ (js_sys::Math::random() * u32::MAX as f64) as u64;
        self.input = TickInput::default();
        self.last_time = None;
        self.session.start(seed).map_err(to_js)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    /// Keyboard axes, each in -1..=1
    pub fn set_move(&mut self, x: f32, y: f32) {
        self.input.move_axis = Vec2::new(x, y);
    }

    pub fn set_drag_target(&mut self, x: f32, y: f32) {
        self.input.move_target = Some(Vec2::new(x, y));
    }

    pub fn clear_drag_target(&mut self) {
        self.input.move_target = None;
    }

    pub fn set_fire(&mut self, held: bool) {
        self.input.fire = held;
    }

    /// Tap-to-fire at a canvas point
    pub fn tap(&mut self, x: f32, y: f32) {
        self.input.aim = Some(Vec2::new(x, y));
    }

    pub fn press_special(&mut self) {
        self.input.special = true;
    }

    pub fn press_pause(&mut self) {
        self.input.pause = true;
    }

    /// Advance one animation frame. `time_ms` is the rAF timestamp.
    /// Returns the frame's events as JSON.
    pub fn frame(&mut self, time_ms: f64) -> Result<String, JsValue> {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);

        let events = self.session.frame(dt, &self.input);

        // Clear one-shot inputs after processing
        self.input.aim = None;
        self.input.special = false;
        self.input.pause = false;

        serde_json::to_string(&events).map_err(|e| to_js(e.into()))
    }

    /// HUD values as JSON (`null` before the first start)
    pub fn hud_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.hud()).map_err(|e| to_js(e.into()))
    }

    /// Full simulation state as JSON, for drawing
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.state()).map_err(|e| to_js(e.into()))
    }

    pub fn high_score(&self) -> f64 {
        self.session.high_score().best as f64
    }
}
