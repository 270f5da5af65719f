//! Evolutionary training of policy networks.
//!
//! # How Training Works
//!
//! 1. **Population** - `population_size` policies with N(0, 1) weights
//! 2. **Evaluation** - Each policy plays one episode; its final score is its fitness
//! 3. **Selection** - The top-K policies by fitness (stable ranking) become parents
//! 4. **Reproduction** - Every child is the mean of two distinct parents plus Gaussian noise
//! 5. **Repeat** - For a fixed number of generations
//!
//! ```text
//! PopulationTrainer
//!     ↓ per individual
//! EpisodeRunner ⇄ GameState / Policy
//!     ↓ final score
//! Ranking (top-K)
//!     ↓ crossover + mutate
//! Next population
//! ```
//!
//! All randomness flows from the trainer's seed, so a run is reproducible:
//! episode seeds are drawn before evaluation and reproduction consumes the
//! same generator afterwards.

pub mod episode;
pub mod genetic;
pub mod operators;
pub mod trainer;
