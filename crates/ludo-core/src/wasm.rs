//! WebAssembly bindings for the Ludo engine.
//!
//! A browser frontend drives the engine through `WasmGame` and renders the
//! events it drains after every call. Animated moves are stepped from a JS
//! timer that passes back the ticket it was given.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::config::GameConfig;
#[cfg(feature = "wasm")]
use crate::engine::Engine;
#[cfg(feature = "wasm")]
use crate::game::{GameError, MoveTicket};
#[cfg(feature = "wasm")]
use crate::player::Color;
#[cfg(feature = "wasm")]
use crate::port::EventLog;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn js_error(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    engine: Engine<EventLog>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a game seating the given colors, e.g. `["Blue","Green"]`
    #[wasm_bindgen(constructor)]
    pub fn new(players_json: &str) -> Result<WasmGame, JsValue> {
        let players: Vec<Color> = serde_json::from_str(players_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid players: {}", e)))?;
        let config = GameConfig::new(players).map_err(js_error)?;
        let engine = Engine::new(config, EventLog::new()).map_err(js_error)?;
        Ok(WasmGame { engine })
    }

    /// Drain pending notifications as a JSON array
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> String {
        let events = self.engine.port_mut().drain();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.engine.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Roll the die, returns the rolled value
    #[wasm_bindgen(js_name = rollDice)]
    pub fn roll_dice(&mut self) -> Result<u8, JsValue> {
        self.engine
            .roll()
            .map(|outcome| outcome.value())
            .map_err(js_error)
    }

    /// Select a piece; returns the ticket to step with, if the move is animated
    #[wasm_bindgen(js_name = selectPiece)]
    pub fn select_piece(&mut self, color: &str, piece: u8) -> Result<Option<u64>, JsValue> {
        let color: Color = color.parse().map_err(js_error)?;
        self.engine.select(color, piece).map_err(js_error)?;
        Ok(self.pending_ticket())
    }

    /// Advance an animated move by one cell; stale tickets are rejected
    #[wasm_bindgen]
    pub fn step(&mut self, ticket: u64) -> Result<(), JsValue> {
        self.engine
            .step(MoveTicket::from_raw(ticket))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Ticket of the move in flight
    #[wasm_bindgen(js_name = pendingTicket)]
    pub fn pending_ticket(&self) -> Option<u64> {
        self.engine.state().pending_move().map(|m| m.ticket.id())
    }

    /// Interval between animation steps in milliseconds
    #[wasm_bindgen(js_name = stepIntervalMs)]
    pub fn step_interval_ms(&self) -> u32 {
        u32::try_from(self.engine.config().step_interval_ms).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.engine.reset();
    }
}
