use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::{FlipSet, Grid, LegalMoves};
pub use error::GameError;
pub use game::{HistoryEntry, PlacedMove, Session, Status};
pub use types::{Cell, GameResult, GameState, Outcome, Player, Position, StoneCount};
pub use wasm::WasmSession;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
