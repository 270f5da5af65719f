//! Deterministic falling-block game simulation.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - Passive data: pieces, shapes, colors, and the [`Board`] grid
//!   with its collision and line-clear primitives
//! - [`engine`] - The tick-based state machine ([`GameState`]) that applies one
//!   [`Action`] per tick, plus scoring ([`GameStats`]) and seeded piece
//!   generation ([`PieceGenerator`])
//!
//! Everything is deterministic given a [`PieceSeed`]: two games started from
//! the same seed and fed the same actions produce identical states.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting active piece")]
pub struct PieceCollisionError;
