use std::fmt;

use serde::Serialize;

use crate::error::GameError;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// One of the two sides. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Numeric code shared with the rendered board: 1=black, 2=white.
    pub fn to_u8(self) -> u8 {
        match self {
            Player::Black => 1,
            Player::White => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "Black"),
            Player::White => write!(f, "White"),
        }
    }
}

/// Contents of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn to_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Result<Self, GameError> {
        if row >= BOARD_SIZE as u8 || col >= BOARD_SIZE as u8 {
            return Err(GameError::OutOfRange { row, col });
        }
        Ok(Self { row, col })
    }

    /// Packed square index, `row * 8 + col`.
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES, "square index out of range: {idx}");
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Disc tally for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoneCount {
    pub black: u8,
    pub white: u8,
}

impl StoneCount {
    pub fn total(self) -> u8 {
        self.black + self.white
    }

    pub fn of(self, player: Player) -> u8 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "player")]
pub enum Outcome {
    Winner(Player),
    Draw,
}

impl Outcome {
    pub fn from_count(count: StoneCount) -> Self {
        match count.black.cmp(&count.white) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::Black),
            std::cmp::Ordering::Less => Outcome::Winner(Player::White),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Public game state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// 64 cells in row-major order, 0=empty, 1=black, 2=white.
    pub board: Vec<u8>,
    pub current_player: Player,
    pub black_count: u8,
    pub white_count: u8,
    pub legal_moves: Vec<Position>,
    pub is_game_over: bool,
    /// Set only right after a move that forced the opponent to pass.
    pub pass_message: Option<String>,
    pub last_move: Option<Position>,
    /// Discs turned by `last_move`; empty at the start of a game.
    pub flipped: Vec<Position>,
    pub can_undo: bool,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub black_count: u8,
    pub white_count: u8,
}
