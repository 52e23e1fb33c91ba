use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;
use crate::types::{BOARD_SIZE, Cell, NUM_SQUARES, Player, Position, StoneCount};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Immutable 8x8 Othello grid represented by two bitboards.
///
/// Bit `row * 8 + col` is set in `black` or `white` when that side owns the
/// square. A grid is never edited after construction; [`Grid::apply_move`]
/// returns a fresh value, so snapshots kept in history stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    black: u64,
    white: u64,
}

impl Grid {
    /// Creates the canonical starting grid:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn initial() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn from_bitboards(black: u64, white: u64) -> Self {
        debug_assert!(black & white == 0, "a square cannot hold both colors");
        Self { black, white }
    }

    pub fn cell(&self, pos: Position) -> Cell {
        let square = bit(pos.index());
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// All 64 cells in row-major order.
    pub fn cells(&self) -> [Cell; NUM_SQUARES] {
        let mut cells = [Cell::Empty; NUM_SQUARES];
        for (idx, cell) in cells.iter_mut().enumerate() {
            *cell = self.cell(Position::from_index(idx));
        }
        cells
    }

    /// Converts the grid to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        self.cells().map(Cell::to_u8)
    }

    /// Every legal move for `player`, each mapped to the discs it would flip.
    ///
    /// A square qualifies when it is empty and at least one of the eight rays
    /// leaving it crosses one or more opponent discs and ends on a disc of
    /// `player`'s own color.
    pub fn legal_moves(&self, player: Player) -> LegalMoves {
        let (me, opp) = self.sides(player);
        let empty = !(me | opp);

        let mut moves = BTreeMap::new();
        for idx in 0..NUM_SQUARES {
            if (empty & bit(idx)) == 0 {
                continue;
            }
            let flips = collect_flips(idx, me, opp);
            if flips != 0 {
                moves.insert(Position::from_index(idx), FlipSet(flips));
            }
        }

        LegalMoves { moves }
    }

    /// Returns whether `player` has at least one legal move.
    pub fn has_legal_move(&self, player: Player) -> bool {
        let (me, opp) = self.sides(player);
        let empty = !(me | opp);
        (0..NUM_SQUARES).any(|idx| (empty & bit(idx)) != 0 && collect_flips(idx, me, opp) != 0)
    }

    /// Places a disc for `player` at `pos` and turns every square in `flips`.
    ///
    /// Caller contract: `pos` and `flips` must be a pair returned by
    /// [`Grid::legal_moves`] for this same grid and player.
    pub fn apply_move(&self, player: Player, pos: Position, flips: FlipSet) -> Grid {
        let (me, opp) = self.sides(player);
        let move_bit = bit(pos.index());
        debug_assert!(
            ((me | opp) & move_bit) == 0,
            "apply_move() on occupied square {pos}"
        );
        debug_assert!(
            flips.0 != 0 && flips.0 == collect_flips(pos.index(), me, opp),
            "apply_move() called with a flip set not produced by legal_moves()"
        );

        let next_me = me | move_bit | flips.0;
        let next_opp = opp & !flips.0;

        match player {
            Player::Black => Grid::from_bitboards(next_me, next_opp),
            Player::White => Grid::from_bitboards(next_opp, next_me),
        }
    }

    pub fn count(&self) -> StoneCount {
        StoneCount {
            black: self.black.count_ones() as u8,
            white: self.white.count_ones() as u8,
        }
    }

    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.count().total()
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::initial()
    }
}

/// Renders eight rows of `X` (black), `O` (white) and `.` (empty).
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, cell) in self.cells().iter().enumerate() {
            if idx > 0 && idx % BOARD_SIZE == 0 {
                writeln!(f)?;
            }
            write!(f, "{}", cell.symbol())?;
        }
        Ok(())
    }
}

/// Parses the format produced by `Display`. Whitespace is ignored.
impl FromStr for Grid {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut black = 0u64;
        let mut white = 0u64;
        let mut idx = 0usize;

        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            if idx >= NUM_SQUARES {
                return Err(GameError::InvalidGrid(format!(
                    "expected {NUM_SQUARES} cells, got more"
                )));
            }
            match ch {
                'X' => black |= bit(idx),
                'O' => white |= bit(idx),
                '.' => {}
                other => {
                    return Err(GameError::InvalidGrid(format!(
                        "unexpected symbol {other:?} at cell {idx}"
                    )));
                }
            }
            idx += 1;
        }

        if idx != NUM_SQUARES {
            return Err(GameError::InvalidGrid(format!(
                "expected {NUM_SQUARES} cells, got {idx}"
            )));
        }

        Ok(Grid::from_bitboards(black, white))
    }
}

/// Opponent discs captured by one move, as a square bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlipSet(u64);

impl FlipSet {
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, pos: Position) -> bool {
        (self.0 & bit(pos.index())) != 0
    }

    /// Flipped squares in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_index(idx))
        })
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.iter().collect()
    }
}

/// Legal moves for one side, keyed by coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegalMoves {
    moves: BTreeMap<Position, FlipSet>,
}

impl LegalMoves {
    pub fn get(&self, pos: Position) -> Option<FlipSet> {
        self.moves.get(&pos).copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.moves.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, FlipSet)> + '_ {
        self.moves.iter().map(|(pos, flips)| (*pos, *flips))
    }

    pub fn positions(&self) -> Vec<Position> {
        self.moves.keys().copied().collect()
    }
}

fn collect_flips(idx: usize, me: u64, opp: u64) -> u64 {
    let (row, col) = idx_to_row_col(idx);
    let mut flips = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut line = 0u64;

        while in_bounds(r, c) {
            let square = bit((r as usize) * BOARD_SIZE + c as usize);
            if (opp & square) != 0 {
                line |= square;
            } else {
                if (me & square) != 0 {
                    flips |= line;
                }
                break;
            }

            r += dr;
            c += dc;
        }
    }

    flips
}

fn bit(idx: usize) -> u64 {
    if idx < NUM_SQUARES { 1u64 << idx } else { 0 }
}

fn idx_to_row_col(idx: usize) -> (i32, i32) {
    ((idx / BOARD_SIZE) as i32, (idx % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
