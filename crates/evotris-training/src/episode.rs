use evotris_engine::{BoardSize, GameState, PieceSeed, TickOutcome};
use evotris_policy::{Controller, ObservationEncoder, PolicyController, policy::Policy};
use serde::{Deserialize, Serialize};

/// Plays single games to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeRunner {
    board_size: BoardSize,
    max_ticks: Option<u64>,
}

/// Final state of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub seed: PieceSeed,
    pub score: usize,
    pub ticks: u64,
    pub completed_pieces: usize,
    pub cleared_lines: usize,
    /// `false` if the tick cap ended the episode first.
    pub game_over: bool,
}

impl EpisodeSummary {
    /// Fitness of the policy that played this episode: the final score.
    #[must_use]
    pub fn fitness(&self) -> usize {
        self.score
    }
}

impl EpisodeRunner {
    #[must_use]
    pub const fn new(board_size: BoardSize) -> Self {
        Self {
            board_size,
            max_ticks: None,
        }
    }

    /// Ends episodes after `max_ticks` ticks if the game is still running.
    #[must_use]
    pub const fn with_max_ticks(self, max_ticks: Option<u64>) -> Self {
        Self { max_ticks, ..self }
    }

    #[must_use]
    pub const fn board_size(&self) -> BoardSize {
        self.board_size
    }

    #[must_use]
    pub const fn max_ticks(&self) -> Option<u64> {
        self.max_ticks
    }

    /// Lets `policy` play one game from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if the policy input width differs from the board cell count.
    #[must_use]
    pub fn run(&self, policy: &Policy, seed: PieceSeed) -> EpisodeSummary {
        let mut controller =
            PolicyController::new(policy, ObservationEncoder::for_size(self.board_size));
        self.run_controller(&mut controller, seed, |_, _| {})
    }

    /// Plays one game from `seed`, calling `observer` after every tick.
    pub fn run_controller<C, F>(
        &self,
        controller: &mut C,
        seed: PieceSeed,
        mut observer: F,
    ) -> EpisodeSummary
    where
        C: Controller + ?Sized,
        F: FnMut(&GameState, &TickOutcome),
    {
        let mut state = GameState::with_seed(self.board_size, seed);
        while !state.is_game_over() {
            if self
                .max_ticks
                .is_some_and(|max| state.stats().ticks() >= max)
            {
                break;
            }
            let action = controller.next_action(&state);
            let outcome = state.tick(action);
            observer(&state, &outcome);
        }

        let stats = state.stats();
        let summary = EpisodeSummary {
            seed,
            score: stats.score(),
            ticks: stats.ticks(),
            completed_pieces: stats.completed_pieces(),
            cleared_lines: stats.total_cleared_lines(),
            game_over: state.is_game_over(),
        };
        log::debug!(
            "episode {seed}: score={} ticks={} pieces={} lines={}",
            summary.score,
            summary.ticks,
            summary.completed_pieces,
            summary.cleared_lines
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use evotris_engine::Action;
    use evotris_policy::{QueuedController, policy::Topology};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::operators::random_policy;

    const SEED: PieceSeed = PieceSeed::from_bytes([11; 16]);

    #[test]
    fn test_episode_ends_in_game_over() {
        let runner = EpisodeRunner::new(BoardSize::DEFAULT);
        // Zero weights always choose MoveLeft, stacking pieces on the left
        // until they reach the top.
        let summary = runner.run(&Policy::zeros(Topology::DEFAULT), SEED);
        assert!(summary.game_over);
        assert!(summary.completed_pieces > 0);
        assert_eq!(summary.fitness(), summary.score);
    }

    #[test]
    fn test_same_seed_and_policy_give_same_fitness() {
        let policy = random_policy(Topology::DEFAULT, &mut Pcg32::seed_from_u64(21));
        let runner = EpisodeRunner::new(BoardSize::DEFAULT);
        assert_eq!(runner.run(&policy, SEED), runner.run(&policy, SEED));
    }

    #[test]
    fn test_max_ticks_caps_the_episode() {
        let runner = EpisodeRunner::new(BoardSize::DEFAULT).with_max_ticks(Some(3));
        let mut controller = QueuedController::new();
        let summary = runner.run_controller(&mut controller, SEED, |_, _| {});
        assert_eq!(summary.ticks, 3);
        assert!(!summary.game_over);
        assert_eq!(summary.score, 0);
    }

    #[test]
    fn test_observer_sees_every_tick() {
        let runner = EpisodeRunner::new(BoardSize::new(6, 8));
        let mut controller = QueuedController::new();
        controller.extend([Action::Drop; 64]);
        let mut observed = Vec::new();
        let summary = runner.run_controller(&mut controller, SEED, |state, outcome| {
            observed.push((state.stats().ticks(), outcome.lock.is_some()));
        });
        assert!(summary.game_over);
        assert_eq!(u64::try_from(observed.len()).unwrap(), summary.ticks);
        // Every hard drop locks in its own tick.
        assert!(observed.iter().all(|(_, locked)| *locked));
        assert_eq!(
            observed.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
            (1..=summary.ticks).collect::<Vec<_>>()
        );
    }
}
