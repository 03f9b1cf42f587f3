//! JavaScript bridge
//!
//! The page owns rendering and the `requestAnimationFrame` loop. Each frame it
//! calls `update(performance.now())`, reads `snapshotJson()` and drains
//! `drainEventsJson()`. Keypad and menu buttons map onto the remaining methods.

use wasm_bindgen::prelude::*;

use crate::levels::LevelTable;
use crate::platform::resolve_seed;
use crate::settings::Settings;
use crate::sim::Session;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `settings_json` may be omitted for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js)?,
            None => Settings::default(),
        };
        let seed = resolve_seed(settings.seed);
        let session = Session::new(LevelTable::standard(), settings, seed).map_err(to_js)?;
        log::info!("Math Balloon initialized with seed: {}", seed);
        Ok(WebGame { session })
    }

    pub fn update(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.session.update(now_ms).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = submitDigit)]
    pub fn submit_digit(&mut self, digit: u8) {
        self.session.submit_digit(digit);
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
    }

    #[wasm_bindgen(js_name = clearInput)]
    pub fn clear_input(&mut self) {
        self.session.clear_input();
    }

    #[wasm_bindgen(js_name = openLevelSelect)]
    pub fn open_level_select(&mut self) -> Result<(), JsValue> {
        self.session.open_level_select().map_err(to_js)
    }

    #[wasm_bindgen(js_name = startSession)]
    pub fn start_session(&mut self, level: u32) -> Result<(), JsValue> {
        self.session.start_session(level).map_err(to_js)
    }

    pub fn retry(&mut self) -> Result<(), JsValue> {
        self.session.retry().map_err(to_js)
    }

    pub fn pause(&mut self) -> Result<(), JsValue> {
        self.session.pause().map_err(to_js)
    }

    pub fn resume(&mut self) -> Result<(), JsValue> {
        self.session.resume().map_err(to_js)
    }

    #[wasm_bindgen(js_name = advanceToNextLevel)]
    pub fn advance_to_next_level(&mut self) -> Result<(), JsValue> {
        self.session.advance_to_next_level().map_err(to_js)
    }

    #[wasm_bindgen(js_name = returnToMenu)]
    pub fn return_to_menu(&mut self) -> Result<(), JsValue> {
        self.session.return_to_menu().map_err(to_js)
    }

    /// Per-frame render state as JSON
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(to_js)
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.drain_events()).map_err(to_js)
    }

    /// The level table, for the level-select grid
    #[wasm_bindgen(js_name = levelsJson)]
    pub fn levels_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.levels()).map_err(to_js)
    }
}
