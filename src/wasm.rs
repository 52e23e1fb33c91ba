use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::Session;
use crate::types::Position;

#[derive(Debug, Serialize)]
struct LegalMoveView {
    position: Position,
    flips: Vec<Position>,
}

/// Browser-facing handle around a [`Session`].
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WasmSession {
    inner: Session,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Session::new(),
        }
    }

    /// Returns true when the move was legal and the board changed.
    pub fn submit_move(&mut self, row: u8, col: u8) -> bool {
        let next = self.inner.submit_move(row, col);
        let changed = next != self.inner;
        self.inner = next;
        changed
    }

    /// Returns false when already at the starting position.
    pub fn undo(&mut self) -> bool {
        if !self.inner.can_undo() {
            return false;
        }
        self.inner = self.inner.undo();
        true
    }

    pub fn reset(&mut self) {
        self.inner = self.inner.reset();
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_state())
    }

    /// Legal moves with the discs each would flip.
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        let moves: Vec<LegalMoveView> = self
            .inner
            .legal_moves()
            .iter()
            .map(|(position, flips)| LegalMoveView {
                position,
                flips: flips.to_vec(),
            })
            .collect();
        to_js(&moves)
    }

    /// Final result, or `null` while the game is still running.
    pub fn result(&self) -> Result<JsValue, JsValue> {
        match self.inner.to_game_result() {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
