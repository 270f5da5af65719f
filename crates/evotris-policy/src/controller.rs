use std::collections::VecDeque;

use evotris_engine::{Action, GameState};

use crate::{ObservationEncoder, policy::Policy};

/// Chooses the action for the next tick.
pub trait Controller {
    fn next_action(&mut self, state: &GameState) -> Action;
}

/// Drives the game with a policy network.
#[derive(Debug, Clone)]
pub struct PolicyController<'a> {
    policy: &'a Policy,
    encoder: ObservationEncoder,
}

impl<'a> PolicyController<'a> {
    /// # Panics
    ///
    /// Panics if the encoder output length differs from the policy input
    /// width.
    #[must_use]
    pub fn new(policy: &'a Policy, encoder: ObservationEncoder) -> Self {
        assert_eq!(
            encoder.len(),
            policy.topology().input,
            "observation length must equal the policy input width"
        );
        Self { policy, encoder }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        self.policy
    }
}

impl Controller for PolicyController<'_> {
    fn next_action(&mut self, state: &GameState) -> Action {
        let observation = self.encoder.encode(state.board());
        self.policy.action(&observation)
    }
}

/// Replays actions pushed by an input source, in order.
///
/// Ticks with no pending input are [`Action::Idle`].
#[derive(Debug, Default, Clone)]
pub struct QueuedController {
    pending: VecDeque<Action>,
}

impl QueuedController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Extend<Action> for QueuedController {
    fn extend<T: IntoIterator<Item = Action>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}

impl Controller for QueuedController {
    fn next_action(&mut self, _state: &GameState) -> Action {
        self.pending.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use evotris_engine::{BoardSize, PieceSeed};

    use super::*;
    use crate::{matrix::Matrix, policy::Topology};

    fn state() -> GameState {
        GameState::with_seed(BoardSize::DEFAULT, PieceSeed::from_bytes([3; 16]))
    }

    #[test]
    fn test_queued_controller_is_fifo_then_idle() {
        let mut controller = QueuedController::new();
        controller.push(Action::SoftDrop);
        controller.extend([Action::MoveLeft, Action::Rotate]);
        assert_eq!(controller.pending(), 3);

        let state = state();
        assert_eq!(controller.next_action(&state), Action::SoftDrop);
        assert_eq!(controller.next_action(&state), Action::MoveLeft);
        assert_eq!(controller.next_action(&state), Action::Rotate);
        assert_eq!(controller.next_action(&state), Action::Idle);
        assert_eq!(controller.pending(), 0);
    }

    #[test]
    fn test_policy_controller_on_empty_board() {
        // All-zero observation makes every score zero, so the first
        // controller action is chosen.
        let policy = Policy::zeros(Topology::DEFAULT);
        let mut controller =
            PolicyController::new(&policy, ObservationEncoder::for_size(BoardSize::DEFAULT));
        assert_eq!(controller.next_action(&state()), Action::MoveLeft);
    }

    #[test]
    fn test_policy_controller_reacts_to_locked_cells() {
        // Hidden unit 0 fires on the bottom-left cell and votes for Drop.
        let topology = Topology::DEFAULT;
        let input_hidden = Matrix::from_fn(topology.input, topology.hidden, |r, c| {
            if r == 190 && c == 0 { 1.0 } else { 0.0 }
        });
        let hidden_output = Matrix::from_fn(topology.hidden, topology.output, |r, c| {
            if r == 0 && c == 3 { 1.0 } else { 0.0 }
        });
        let policy = Policy::from_matrices(input_hidden, hidden_output);
        let mut controller =
            PolicyController::new(&policy, ObservationEncoder::for_size(BoardSize::DEFAULT));

        let mut rows = vec![".........."; 19];
        rows.push("R.........");
        let board = rows.join("\n").parse().unwrap();
        let state = GameState::with_board(board, PieceSeed::from_bytes([3; 16]));
        assert_eq!(controller.next_action(&state), Action::Drop);
        assert_eq!(controller.next_action(&self::state()), Action::MoveLeft);
    }

    #[test]
    #[should_panic(expected = "observation length must equal the policy input width")]
    fn test_policy_controller_rejects_mismatched_encoder() {
        let policy = Policy::zeros(Topology::DEFAULT);
        let _ = PolicyController::new(&policy, ObservationEncoder::new(4, 4));
    }
}
