use std::fmt;

use crate::types::Position;

/// Reasons a move or a setup is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    OutOfRange { row: u8, col: u8 },
    Occupied(Position),
    NoCapture(Position),
    GameOver,
    InvalidGrid(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfRange { row, col } => write!(f, "row/col out of range: ({row}, {col})"),
            GameError::Occupied(pos) => write!(f, "cell {pos} is already occupied"),
            GameError::NoCapture(pos) => write!(f, "illegal move: {pos} captures nothing"),
            GameError::GameOver => write!(f, "game is already over"),
            GameError::InvalidGrid(msg) => write!(f, "invalid grid: {msg}"),
        }
    }
}

impl std::error::Error for GameError {}
