use evotris_engine::{Action, BoardSize};
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

/// Layer widths of a policy network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Observation length; one input per board cell.
    pub input: usize,
    pub hidden: usize,
    /// Number of action scores; one per controller action.
    pub output: usize,
}

impl Topology {
    /// 10×20 board, 100 hidden units, 4 controller actions.
    pub const DEFAULT: Self = Self {
        input: 200,
        hidden: 100,
        output: Action::CONTROLLER_ACTIONS.len(),
    };

    /// Returns the topology observing every cell of a board of `size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use evotris_engine::BoardSize;
    /// use evotris_policy::policy::Topology;
    ///
    /// assert_eq!(Topology::for_board(BoardSize::DEFAULT, 100), Topology::DEFAULT);
    /// ```
    #[must_use]
    pub fn for_board(size: BoardSize, hidden: usize) -> Self {
        Self {
            input: size.cell_count(),
            hidden,
            output: Action::CONTROLLER_ACTIONS.len(),
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Two-layer dense network mapping an observation to a controller action.
///
/// `hidden = max(0, obs · W_in)`, `scores = hidden · W_out`. There are no
/// biases and no internal state, so the same observation always yields the
/// same action.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    input_hidden: Matrix,
    hidden_output: Matrix,
}

impl Policy {
    /// Creates a policy with all weights zero.
    #[must_use]
    pub fn zeros(topology: Topology) -> Self {
        Self {
            input_hidden: Matrix::zeros(topology.input, topology.hidden),
            hidden_output: Matrix::zeros(topology.hidden, topology.output),
        }
    }

    /// Creates a policy from its two weight matrices.
    ///
    /// # Panics
    ///
    /// Panics if the hidden widths of the two matrices differ.
    #[must_use]
    pub fn from_matrices(input_hidden: Matrix, hidden_output: Matrix) -> Self {
        assert_eq!(
            input_hidden.cols(),
            hidden_output.rows(),
            "hidden layer widths must match"
        );
        Self {
            input_hidden,
            hidden_output,
        }
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        Topology {
            input: self.input_hidden.rows(),
            hidden: self.input_hidden.cols(),
            output: self.hidden_output.cols(),
        }
    }

    /// Returns the input→hidden and hidden→output matrices.
    #[must_use]
    pub fn matrices(&self) -> [&Matrix; 2] {
        [&self.input_hidden, &self.hidden_output]
    }

    /// Mutable access to the weights. Shapes cannot be changed through this.
    pub fn weights_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.input_hidden
            .as_mut_slice()
            .iter_mut()
            .chain(self.hidden_output.as_mut_slice())
    }

    /// Returns the raw action scores for an observation.
    ///
    /// # Panics
    ///
    /// Panics if the observation length differs from the input width.
    #[must_use]
    pub fn forward(&self, observation: &[f32]) -> Vec<f32> {
        assert_eq!(
            observation.len(),
            self.input_hidden.rows(),
            "observation length must equal the policy input width"
        );
        let mut hidden = self.input_hidden.vec_mul(observation);
        for h in &mut hidden {
            *h = h.max(0.0);
        }
        self.hidden_output.vec_mul(&hidden)
    }

    /// Returns the index of the highest action score; ties go to the lowest
    /// index.
    ///
    /// # Examples
    ///
    /// ```
    /// use evotris_policy::{matrix::Matrix, policy::Policy};
    ///
    /// // Identity input layer, output layer preferring the second action.
    /// let policy = Policy::from_matrices(
    ///     Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]),
    ///     Matrix::from_vec(2, 4, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    /// );
    /// assert_eq!(policy.select_action(&[1.0, 0.0]), 1);
    /// // All scores zero: the first action wins.
    /// assert_eq!(policy.select_action(&[0.0, 0.0]), 0);
    /// ```
    #[must_use]
    pub fn select_action(&self, observation: &[f32]) -> usize {
        let scores = self.forward(observation);
        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        best
    }

    /// Like [`Self::select_action`], mapped to an engine action.
    #[must_use]
    pub fn action(&self, observation: &[f32]) -> Action {
        Action::from_index(self.select_action(observation))
    }
}
