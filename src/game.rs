use crate::board::{FlipSet, Grid, LegalMoves};
use crate::error::GameError;
use crate::types::{Cell, GameResult, GameState, Outcome, Player, Position, StoneCount};

/// A placed disc together with the discs it turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedMove {
    pub player: Player,
    pub position: Position,
    pub flipped: FlipSet,
}

/// Snapshot of the game after a move (or at the start).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub grid: Grid,
    /// Side to move from this snapshot, after any forced pass is resolved.
    pub player: Player,
    pub last_move: Option<PlacedMove>,
}

/// Where the game stands, derived from the grid and the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing { to_move: Player },
    /// The last move left `skipped` without a legal reply, so `to_move` goes again.
    Passed { to_move: Player, skipped: Player },
    GameOver(Outcome),
}

impl Status {
    pub fn pass_message(&self) -> Option<String> {
        match self {
            Status::Passed { skipped, .. } => Some(format!("{skipped} has no legal moves and passes")),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Status::GameOver(_))
    }
}

/// A two-player Othello game.
///
/// Sessions are values: every transition borrows the current session and
/// returns the next one, leaving the original (and every snapshot in its
/// history) untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    current: HistoryEntry,
    /// Earlier snapshots, oldest first. Empty at the start of a game.
    past: Vec<HistoryEntry>,
    /// Side whose turn was skipped by the most recent move.
    skipped: Option<Player>,
}

impl Session {
    /// Starts a game from the canonical position with Black to move.
    pub fn new() -> Self {
        Self {
            current: HistoryEntry {
                grid: Grid::initial(),
                player: Player::Black,
                last_move: None,
            },
            past: Vec::new(),
            skipped: None,
        }
    }

    /// Starts a game from an arbitrary setup.
    ///
    /// When `player` has no legal move but the opponent does, the opening turn
    /// is passed to the opponent straight away.
    pub fn from_position(grid: Grid, player: Player) -> Self {
        let (player, skipped) = resolve_turn(&grid, player);
        Self {
            current: HistoryEntry {
                grid,
                player,
                last_move: None,
            },
            past: Vec::new(),
            skipped,
        }
    }

    pub fn grid(&self) -> Grid {
        self.current.grid
    }

    pub fn current_player(&self) -> Player {
        self.current.player
    }

    pub fn legal_moves(&self) -> LegalMoves {
        self.current.grid.legal_moves(self.current.player)
    }

    pub fn score(&self) -> StoneCount {
        self.current.grid.count()
    }

    pub fn last_move(&self) -> Option<PlacedMove> {
        self.current.last_move
    }

    /// All snapshots, starting with the initial position.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.past.iter().chain(std::iter::once(&self.current))
    }

    pub fn history_len(&self) -> usize {
        self.past.len() + 1
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn is_game_over(&self) -> bool {
        let grid = &self.current.grid;
        !grid.has_legal_move(Player::Black) && !grid.has_legal_move(Player::White)
    }

    /// Winner or draw once neither side can move.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_game_over()
            .then(|| Outcome::from_count(self.score()))
    }

    pub fn status(&self) -> Status {
        if let Some(outcome) = self.outcome() {
            return Status::GameOver(outcome);
        }
        let to_move = self.current.player;
        match self.skipped {
            Some(skipped) => Status::Passed { to_move, skipped },
            None => Status::Ongoing { to_move },
        }
    }

    /// Plays a disc for the side to move, or returns the session unchanged
    /// when `(row, col)` is not a legal move.
    pub fn submit_move(&self, row: u8, col: u8) -> Session {
        match self.try_submit_move(row, col) {
            Ok(next) => next,
            Err(err) => {
                tracing::trace!(row, col, %err, "move rejected");
                self.clone()
            }
        }
    }

    /// Like [`Session::submit_move`], but reports why a move was rejected.
    pub fn try_submit_move(&self, row: u8, col: u8) -> Result<Session, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }

        let pos = Position::new(row, col)?;
        let grid = self.current.grid;
        let player = self.current.player;

        if grid.cell(pos) != Cell::Empty {
            return Err(GameError::Occupied(pos));
        }
        let flipped = grid
            .legal_moves(player)
            .get(pos)
            .ok_or(GameError::NoCapture(pos))?;

        let next_grid = grid.apply_move(player, pos, flipped);
        let (next_player, skipped) = resolve_turn(&next_grid, player.opponent());

        tracing::debug!(%player, %pos, flipped = flipped.len(), "move applied");

        let mut past = Vec::with_capacity(self.past.len() + 1);
        past.extend_from_slice(&self.past);
        past.push(self.current);

        let next = Session {
            current: HistoryEntry {
                grid: next_grid,
                player: next_player,
                last_move: Some(PlacedMove {
                    player,
                    position: pos,
                    flipped,
                }),
            },
            past,
            skipped,
        };

        match next.status() {
            Status::Passed { skipped, .. } => tracing::debug!(%skipped, "turn passed"),
            Status::GameOver(outcome) => {
                let score = next.score();
                tracing::debug!(?outcome, black = score.black, white = score.white, "game over");
            }
            Status::Ongoing { .. } => {}
        }

        Ok(next)
    }

    /// Steps back one move. The starting position cannot be undone.
    pub fn undo(&self) -> Session {
        let mut past = self.past.clone();
        let Some(previous) = past.pop() else {
            return self.clone();
        };

        tracing::debug!(history_len = past.len() + 1, "move undone");

        Session {
            current: previous,
            past,
            skipped: None,
        }
    }

    pub fn reset(&self) -> Session {
        tracing::debug!("session reset");
        Session::new()
    }

    pub fn to_game_state(&self) -> GameState {
        let score = self.score();
        let status = self.status();
        GameState {
            board: self.current.grid.to_array().to_vec(),
            current_player: self.current.player,
            black_count: score.black,
            white_count: score.white,
            legal_moves: self.legal_moves().positions(),
            is_game_over: status.is_game_over(),
            pass_message: status.pass_message(),
            last_move: self.current.last_move.map(|mv| mv.position),
            flipped: self
                .current
                .last_move
                .map(|mv| mv.flipped.to_vec())
                .unwrap_or_default(),
            can_undo: self.can_undo(),
        }
    }

    /// Final result, available only after game over.
    pub fn to_game_result(&self) -> Option<GameResult> {
        let outcome = self.outcome()?;
        let score = self.score();
        Some(GameResult {
            outcome,
            black_count: score.black,
            white_count: score.white,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks who moves on `grid` when `player` is due: `player` if they can,
/// otherwise the other side (reporting `player` as skipped) if they can.
/// With no legal move for either side the game is over and `player` is kept.
fn resolve_turn(grid: &Grid, player: Player) -> (Player, Option<Player>) {
    if grid.has_legal_move(player) {
        (player, None)
    } else if grid.has_legal_move(player.opponent()) {
        (player.opponent(), Some(player))
    } else {
        (player, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    fn session(diagram: &str, player: Player) -> Session {
        Session::from_position(diagram.parse().unwrap(), player)
    }

    // Black's (0,2) strands White; Black's (7,2) then ends the game 6-0.
    const PASS_THEN_WIN: &str = "
        XO......
        ........
        ........
        ........
        ........
        ........
        ........
        XO......";

    // Black's (0,2) leaves 3-3 with no legal move for either side.
    const DRAW: &str = "
        XO......
        ........
        ........
        ........
        ........
        ........
        ........
        .....OOO";

    // Black's (0,0) strands White; Black's (2,4) gives White replies again.
    const PASS_THEN_RESUME: &str = "
        .OXO....
        ...O....
        ..OO....
        ........
        ........
        ........
        ........
        ........";

    #[test]
    fn initial_state_is_correct() {
        let game = Session::new();
        let state = game.to_game_state();

        assert_eq!(game.current_player(), Player::Black);
        assert_eq!(game.status(), Status::Ongoing { to_move: Player::Black });
        assert_eq!(game.score(), StoneCount { black: 2, white: 2 });
        assert_eq!(game.history_len(), 1);
        assert!(!game.can_undo());
        assert!(!state.is_game_over);
        assert!(state.pass_message.is_none());
        assert!(state.flipped.is_empty());
        assert_eq!(
            game.legal_moves().positions(),
            vec![pos(2, 3), pos(3, 2), pos(4, 5), pos(5, 4)]
        );
    }

    #[test]
    fn legal_move_flips_and_hands_turn_to_opponent() {
        let game = Session::new().submit_move(2, 3);

        assert_eq!(game.current_player(), Player::White);
        assert_eq!(game.score(), StoneCount { black: 4, white: 1 });
        assert_eq!(game.history_len(), 2);

        let last = game.last_move().unwrap();
        assert_eq!(last.player, Player::Black);
        assert_eq!(last.position, pos(2, 3));
        assert_eq!(last.flipped.to_vec(), vec![pos(3, 3)]);

        let state = game.to_game_state();
        assert_eq!(state.last_move, Some(pos(2, 3)));
        assert_eq!(state.flipped, vec![pos(3, 3)]);
        assert!(state.can_undo);
    }

    #[test]
    fn illegal_moves_leave_session_unchanged() {
        let game = Session::new();

        assert_eq!(game.submit_move(0, 0), game);
        assert_eq!(game.submit_move(3, 3), game);
        assert_eq!(game.submit_move(8, 1), game);

        assert_eq!(game.try_submit_move(0, 0), Err(GameError::NoCapture(pos(0, 0))));
        assert_eq!(game.try_submit_move(3, 3), Err(GameError::Occupied(pos(3, 3))));
        assert_eq!(
            game.try_submit_move(8, 1),
            Err(GameError::OutOfRange { row: 8, col: 1 })
        );
    }

    #[test]
    fn stranded_opponent_is_skipped() {
        let game = session(PASS_THEN_WIN, Player::Black).submit_move(0, 2);

        assert_eq!(game.current_player(), Player::Black);
        assert_eq!(
            game.status(),
            Status::Passed {
                to_move: Player::Black,
                skipped: Player::White
            }
        );
        assert_eq!(
            game.to_game_state().pass_message.as_deref(),
            Some("White has no legal moves and passes")
        );
        assert!(game.to_game_result().is_none());
    }

    #[test]
    fn pass_notice_clears_on_next_regular_move() {
        let passed = session(PASS_THEN_RESUME, Player::Black).submit_move(0, 0);
        assert!(matches!(passed.status(), Status::Passed { skipped: Player::White, .. }));

        let resumed = passed.submit_move(2, 4);

        assert_eq!(resumed.status(), Status::Ongoing { to_move: Player::White });
        assert!(resumed.to_game_state().pass_message.is_none());
        assert_eq!(
            resumed.legal_moves().positions(),
            vec![pos(0, 4), pos(2, 5)]
        );
    }

    #[test]
    fn game_ends_with_winner_when_neither_side_can_move() {
        let game = session(PASS_THEN_WIN, Player::Black)
            .submit_move(0, 2)
            .submit_move(7, 2);

        assert_eq!(game.status(), Status::GameOver(Outcome::Winner(Player::Black)));
        assert_eq!(
            game.to_game_result(),
            Some(GameResult {
                outcome: Outcome::Winner(Player::Black),
                black_count: 6,
                white_count: 0,
            })
        );
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.try_submit_move(0, 3), Err(GameError::GameOver));
        assert_eq!(game.submit_move(0, 3), game);
    }

    #[test]
    fn game_ends_in_draw_on_equal_counts() {
        let game = session(DRAW, Player::Black).submit_move(0, 2);

        assert_eq!(game.score(), StoneCount { black: 3, white: 3 });
        assert_eq!(game.status(), Status::GameOver(Outcome::Draw));
        assert!(game.to_game_state().is_game_over);
    }

    #[test]
    fn undo_at_start_is_a_no_op() {
        let game = Session::new();

        assert_eq!(game.undo(), game);

        let replayed = game.submit_move(2, 3).undo().undo();
        assert_eq!(replayed, game);
    }

    #[test]
    fn undo_after_pass_restores_mover_and_clears_notice() {
        let start = session(PASS_THEN_WIN, Player::Black);
        let passed = start.submit_move(0, 2);
        let after = passed.submit_move(7, 2).undo();

        assert_eq!(after.grid(), passed.grid());
        assert_eq!(after.current_player(), Player::Black);
        assert_eq!(after.status(), Status::Ongoing { to_move: Player::Black });

        let back = passed.undo();
        assert_eq!(back.grid(), start.grid());
        assert_eq!(back.current_player(), start.current_player());
    }

    #[test]
    fn reset_returns_to_canonical_start() {
        let game = session(PASS_THEN_WIN, Player::Black).submit_move(0, 2).reset();

        assert_eq!(game, Session::new());
    }

    #[test]
    fn from_position_hands_opening_turn_to_side_that_can_move() {
        let game = session(PASS_THEN_WIN, Player::White);

        assert_eq!(game.current_player(), Player::Black);
        assert!(matches!(game.status(), Status::Passed { skipped: Player::White, .. }));
    }

    #[test]
    fn full_game_preserves_invariants_and_undo_round_trips() {
        let mut game = Session::new();
        let mut moves_played = 0;

        while !game.is_game_over() {
            let legal = game.legal_moves();
            let (target, _) = legal.iter().next().unwrap();
            let before = game.score().total();

            let next = game.submit_move(target.row, target.col);

            assert_ne!(next, game);
            assert_eq!(next.score().total(), before + 1);
            assert!(next.score().total() <= 64);
            assert_eq!(next.history_len(), game.history_len() + 1);

            let undone = next.undo();
            assert_eq!(undone.grid(), game.grid());
            assert_eq!(undone.current_player(), game.current_player());

            game = next;
            moves_played += 1;
        }

        assert!(moves_played <= 60);
        assert_eq!(game.history().count(), moves_played + 1);
        assert_eq!(game.history().next().map(|entry| entry.grid), Some(Grid::initial()));
        assert!(game.to_game_result().is_some());
    }
}
