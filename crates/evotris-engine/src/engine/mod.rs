//! Game engine logic and state management.
//!
//! This module provides the tick-based state machine built on top of the core
//! data structures:
//!
//! - [`GameState`] - Board, active and next piece, statistics, and phase
//! - [`Action`] - The closed set of inputs one tick can consume
//! - [`GameStats`] - Score, fall speed, and lock counters
//! - [`PieceGenerator`] - Seeded random piece source
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! Every call to [`GameState::tick`] performs, in order:
//!
//! 1. Apply the action to the active piece, reverting it on collision
//! 2. Move the active piece down one row (gravity)
//! 3. If gravity collides, lock: merge the piece, clear lines, score, promote
//!    the next piece and draw a new one
//! 4. If the top row is occupied after a lock, the game is over
//!
//! # Example
//!
//! ```
//! use evotris_engine::{Action, BoardSize, GameState};
//!
//! let mut state = GameState::new(BoardSize::DEFAULT);
//! state.tick(Action::MoveLeft);
//! let outcome = state.tick(Action::Drop);
//!
//! // A hard drop always locks in the tick it was issued.
//! assert!(outcome.lock.is_some());
//! ```

pub use self::{action::*, game_state::*, game_stats::*, piece_generator::*};

mod action;
mod game_state;
mod game_stats;
mod piece_generator;
