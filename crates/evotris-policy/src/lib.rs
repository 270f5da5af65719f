//! Feed-forward control policies for the game engine.
//!
//! A [`Policy`](policy::Policy) is a two-layer dense network without biases:
//!
//! ```text
//! observation (board cells, 0.0 / 1.0)
//!     ↓ W_in, ReLU
//! hidden activations
//!     ↓ W_out
//! action scores → argmax → controller action index
//! ```
//!
//! Policies are deterministic and stateless. [`ObservationEncoder`] turns a
//! board into the observation vector, and the [`Controller`] adapters let
//! either a policy or a human input queue drive a
//! [`GameState`](evotris_engine::GameState).

pub use self::{controller::*, observation::*};

pub mod controller;
pub mod matrix;
pub mod observation;
pub mod policy;
