use std::mem;

use rand::Rng as _;

use crate::{
    PieceCollisionError,
    core::{
        board::{Board, BoardSize},
        piece::Piece,
    },
};

use super::{
    action::Action,
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
};

/// Phase of a game between ticks.
///
/// Locking happens inside a single tick and is reported through
/// [`TickOutcome::lock`] rather than as a phase of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// What happened to the action requested for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ActionResult {
    /// The active piece was moved or rotated.
    Applied,
    /// The move would have collided and was reverted.
    Rejected,
    /// The action does nothing (`Idle`, or the game is already over).
    Ignored,
}

/// A piece merging into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    /// The piece as it was merged.
    pub piece: Piece,
    pub cleared_lines: usize,
    pub score_delta: usize,
}

/// Observable result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub action: Action,
    pub action_result: ActionResult,
    pub lock: Option<LockEvent>,
    /// Phase after the tick.
    pub phase: GamePhase,
}

impl TickOutcome {
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }
}

/// Complete state of one game.
///
/// The state owns its piece generator, so cloning a `GameState` forks the
/// game: both copies evolve identically when fed the same actions. This makes
/// [`GameState::ticked`] a pure `(state, action) -> state'` function.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active_piece: Piece,
    next_piece: Piece,
    generator: PieceGenerator,
    stats: GameStats,
    phase: GamePhase,
}

impl GameState {
    /// Starts a game on an empty board with a random seed.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self::with_seed(size, rand::rng().random())
    }

    /// Starts a game on an empty board with the given seed.
    #[must_use]
    pub fn with_seed(size: BoardSize, seed: PieceSeed) -> Self {
        Self::with_board(Board::new(size), seed)
    }

    /// Starts a game from an existing grid.
    #[must_use]
    pub fn with_board(board: Board, seed: PieceSeed) -> Self {
        let mut generator = PieceGenerator::with_seed(board.size(), seed);
        let active_piece = generator.next_piece();
        let next_piece = generator.next_piece();
        Self {
            board,
            active_piece,
            next_piece,
            generator,
            stats: GameStats::new(),
            phase: GamePhase::Playing,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Replaces the active piece if it fits on the board.
    pub fn set_active_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.active_piece = piece;
        Ok(())
    }

    /// Returns where the active piece would land with a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        let mut dropped = self.active_piece;
        // A colliding step always exists within the grid height for a
        // non-empty shape.
        for _ in 0..self.board.size().height() {
            let next = dropped.down();
            if self.board.is_colliding(&next) {
                break;
            }
            dropped = next;
        }
        dropped
    }

    /// Returns the grid with the active piece painted in, for display.
    #[must_use]
    pub fn render_board(&self) -> Board {
        let mut board = self.board.clone();
        if self.phase.is_playing() {
            board.fill_piece(&self.active_piece);
        }
        board
    }

    /// Advances the game by one tick.
    ///
    /// Ticks after game over change nothing and report
    /// [`ActionResult::Ignored`].
    pub fn tick(&mut self, action: Action) -> TickOutcome {
        if self.phase.is_game_over() {
            return TickOutcome {
                action,
                action_result: ActionResult::Ignored,
                lock: None,
                phase: self.phase,
            };
        }

        self.stats.increment_tick();
        let action_result = self.apply_action(action);
        let lock = self.apply_gravity();
        TickOutcome {
            action,
            action_result,
            lock,
            phase: self.phase,
        }
    }

    /// Pure form of [`Self::tick`]: returns the next state, leaving `self`
    /// untouched.
    #[must_use]
    pub fn ticked(&self, action: Action) -> (Self, TickOutcome) {
        let mut next = self.clone();
        let outcome = next.tick(action);
        (next, outcome)
    }

    fn apply_action(&mut self, action: Action) -> ActionResult {
        let candidate = match action {
            Action::Idle => return ActionResult::Ignored,
            Action::MoveLeft => self.active_piece.left(),
            Action::MoveRight => self.active_piece.right(),
            Action::Rotate => self.active_piece.rotated(),
            Action::SoftDrop => self.active_piece.down(),
            Action::Drop => {
                self.active_piece = self.drop_position();
                return ActionResult::Applied;
            }
        };
        match self.set_active_piece(candidate) {
            Ok(()) => ActionResult::Applied,
            Err(PieceCollisionError) => ActionResult::Rejected,
        }
    }

    fn apply_gravity(&mut self) -> Option<LockEvent> {
        if self.set_active_piece(self.active_piece.down()).is_ok() {
            return None;
        }
        Some(self.lock_active_piece())
    }

    fn lock_active_piece(&mut self) -> LockEvent {
        let piece = self.active_piece;
        self.board.fill_piece(&piece);
        let cleared_lines = self.board.clear_lines();
        let score_delta = self.stats.complete_piece_drop(cleared_lines);

        let drawn = self.generator.next_piece();
        self.active_piece = mem::replace(&mut self.next_piece, drawn);

        if self.board.is_top_row_occupied() {
            self.phase = GamePhase::GameOver;
        }

        LockEvent {
            piece,
            cleared_lines,
            score_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::{PieceColor, PieceKind, PiecePosition, PieceShape};

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn state_with_board(s: &str) -> GameState {
        GameState::with_board(s.parse().unwrap(), SEED)
    }

    fn piece_at(kind: PieceKind, x: i32, y: i32) -> Piece {
        Piece::new(kind.shape(), PieceColor::Cyan, PiecePosition::new(x, y))
    }

    #[test]
    fn test_new_game_has_two_pieces_and_empty_board() {
        let state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        assert!(state.phase().is_playing());
        assert_eq!(state.board().occupied_cell_count(), 0);
        assert_eq!(state.active_piece().position().y(), 0);
        assert_eq!(state.next_piece().position().y(), 0);
        assert_eq!(state.stats().drop_speed(), 5);
    }

    #[test]
    fn test_idle_applies_gravity_only() {
        let mut state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        let before = *state.active_piece();
        let outcome = state.tick(Action::Idle);
        assert!(outcome.action_result.is_ignored());
        assert_eq!(outcome.lock, None);
        assert_eq!(*state.active_piece(), before.down());
        assert_eq!(state.stats().ticks(), 1);
    }

    #[test]
    fn test_move_into_wall_is_reverted() {
        let mut state = state_with_board("......\n......\n......\n......");
        state.set_active_piece(piece_at(PieceKind::O, 0, 0)).unwrap();
        let outcome = state.tick(Action::MoveLeft);
        assert!(outcome.action_result.is_rejected());
        assert_eq!(state.active_piece().position(), PiecePosition::new(0, 1));

        let outcome = state.tick(Action::MoveRight);
        assert!(outcome.action_result.is_applied());
        assert_eq!(state.active_piece().position(), PiecePosition::new(1, 2));
    }

    #[test]
    fn test_move_into_locked_cells_is_reverted() {
        let mut state = state_with_board("......\n......\n..R...\n..R...\n......");
        state.set_active_piece(piece_at(PieceKind::O, 0, 1)).unwrap();
        let outcome = state.tick(Action::MoveRight);
        assert!(outcome.action_result.is_rejected());
        assert_eq!(state.active_piece().position(), PiecePosition::new(0, 2));
    }

    #[test]
    fn test_rotation_past_right_wall_is_rejected() {
        let mut state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        let vertical_i = Piece::new(
            PieceKind::I.shape().rotated_clockwise(),
            PieceColor::Cyan,
            PiecePosition::new(9, 0),
        );
        state.set_active_piece(vertical_i).unwrap();

        let outcome = state.tick(Action::Rotate);
        assert!(outcome.action_result.is_rejected());
        assert_eq!(state.active_piece().shape(), vertical_i.shape());
        assert_eq!(state.active_piece().position(), PiecePosition::new(9, 1));
    }

    #[test]
    fn test_rotation_in_open_space_keeps_anchor() {
        let mut state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        state.set_active_piece(piece_at(PieceKind::T, 3, 2)).unwrap();
        let outcome = state.tick(Action::Rotate);
        assert!(outcome.action_result.is_applied());
        assert_eq!(
            *state.active_piece().shape(),
            PieceKind::T.shape().rotated_clockwise()
        );
        assert_eq!(state.active_piece().position(), PiecePosition::new(3, 3));
    }

    #[test]
    fn test_soft_drop_moves_one_row_then_gravity() {
        let mut state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        state.set_active_piece(piece_at(PieceKind::O, 4, 0)).unwrap();
        let outcome = state.tick(Action::SoftDrop);
        assert!(outcome.action_result.is_applied());
        assert_eq!(state.active_piece().position(), PiecePosition::new(4, 2));
    }

    #[test]
    fn test_drop_locks_in_the_same_tick() {
        let mut state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        let dropped = state.drop_position();
        let next = *state.next_piece();

        let outcome = state.tick(Action::Drop);
        let lock = outcome.lock.expect("hard drop must lock");
        assert_eq!(lock.piece, dropped);
        assert_eq!(*state.active_piece(), next);
        for (x, y) in dropped.occupied_positions() {
            let cell = state
                .board()
                .cell(usize::try_from(x).unwrap(), usize::try_from(y).unwrap())
                .unwrap();
            assert!(cell.is_occupied());
        }
        assert_eq!(state.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_drop_lands_on_top_of_locked_cells() {
        let mut state = state_with_board("....\n....\n....\n....\n....\n..R.\n....\n....");
        state.set_active_piece(piece_at(PieceKind::O, 1, 0)).unwrap();
        assert_eq!(state.drop_position().position(), PiecePosition::new(1, 3));

        let outcome = state.tick(Action::Drop);
        let lock = outcome.lock.unwrap();
        assert_eq!(lock.piece.position(), PiecePosition::new(1, 3));
        assert_eq!(lock.cleared_lines, 0);
        assert_eq!(
            state.board().to_string(),
            "....\n....\n....\n.CC.\n.CC.\n..R.\n....\n...."
        );
        assert!(outcome.phase.is_playing());
    }

    #[test]
    fn test_horizontal_i_clears_bottom_row_and_shifts_rows() {
        let mut state = state_with_board(
            "
            ....
            .B..
            .B..
            ....
            ....
            ....
            ",
        );
        state.set_active_piece(piece_at(PieceKind::I, 0, 3)).unwrap();

        let outcome = state.tick(Action::Drop);
        let lock = outcome.lock.unwrap();
        assert_eq!(lock.cleared_lines, 1);
        assert_eq!(lock.score_delta, 100);
        assert_eq!(state.score(), 100);
        assert_eq!(state.board().size(), BoardSize::new(4, 6));
        assert_eq!(
            state.board().to_string(),
            "....\n....\n.B..\n.B..\n....\n...."
        );
        assert!(outcome.phase.is_playing());
    }

    #[test]
    fn test_lock_reaching_top_row_ends_game() {
        let mut state = state_with_board("....\n.R..");
        state.set_active_piece(piece_at(PieceKind::O, 2, 0)).unwrap();

        let outcome = state.tick(Action::Idle);
        assert!(outcome.lock.is_some());
        assert!(outcome.is_game_over());
        assert!(state.is_game_over());

        let board = state.board().clone();
        let stats = state.stats().clone();
        let outcome = state.tick(Action::MoveLeft);
        assert!(outcome.action_result.is_ignored());
        assert!(outcome.is_game_over());
        assert_eq!(*state.board(), board);
        assert_eq!(*state.stats(), stats);
    }

    #[test]
    fn test_clearing_the_top_row_is_not_game_over() {
        let mut state = state_with_board("..\nR.");
        let bar = Piece::new(
            PieceShape::from_rows(&[&[true], &[true]]),
            PieceColor::Green,
            PiecePosition::new(1, 0),
        );
        state.set_active_piece(bar).unwrap();

        let outcome = state.tick(Action::Idle);
        assert_eq!(outcome.lock.unwrap().cleared_lines, 1);
        assert_eq!(state.board().to_string(), "..\n.G");
        assert!(outcome.phase.is_playing());
    }

    #[test]
    fn test_ticked_leaves_state_untouched() {
        let state = GameState::with_seed(BoardSize::DEFAULT, SEED);
        let (next, outcome) = state.ticked(Action::Drop);
        assert!(outcome.lock.is_some());
        assert_eq!(state.board().occupied_cell_count(), 0);
        assert_eq!(next.board().occupied_cell_count(), 4);
    }

    #[test]
    fn test_same_seed_and_actions_give_same_game() {
        let actions = [
            Action::MoveLeft,
            Action::Rotate,
            Action::Drop,
            Action::MoveRight,
            Action::MoveRight,
            Action::Drop,
            Action::Idle,
        ];
        let mut a = GameState::with_seed(BoardSize::DEFAULT, SEED);
        let mut b = GameState::with_seed(BoardSize::DEFAULT, SEED);
        for _ in 0..40 {
            for action in actions {
                assert_eq!(a.tick(action), b.tick(action));
            }
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_render_board_includes_active_piece() {
        let mut state = state_with_board("....\n....\n....");
        state.set_active_piece(piece_at(PieceKind::O, 1, 0)).unwrap();
        assert_eq!(state.render_board().to_string(), ".CC.\n.CC.\n....");
        assert_eq!(state.board().occupied_cell_count(), 0);
    }
}
