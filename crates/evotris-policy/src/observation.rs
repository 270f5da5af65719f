use evotris_engine::{Board, BoardSize, Cell};

/// Flattens a board grid into a policy observation.
///
/// Locked cells encode as `1.0` and empty cells as `0.0`, row-major from the
/// top row. The active piece is not part of the observation. Rows are padded
/// with `0.0` or truncated to the encoder width, and missing rows are padded,
/// so the output always has `width * height` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationEncoder {
    width: usize,
    height: usize,
}

impl ObservationEncoder {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn for_size(size: BoardSize) -> Self {
        Self::new(usize::from(size.width()), usize::from(size.height()))
    }

    /// Length of every encoded observation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes `board`.
    ///
    /// # Examples
    ///
    /// ```
    /// use evotris_engine::Board;
    /// use evotris_policy::ObservationEncoder;
    ///
    /// let board: Board = "..\nR.".parse().unwrap();
    /// let encoder = ObservationEncoder::new(3, 2);
    /// assert_eq!(encoder.encode(&board), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    /// ```
    #[must_use]
    pub fn encode(&self, board: &Board) -> Vec<f32> {
        let mut observation = Vec::with_capacity(self.len());
        for row in board.rows().take(self.height) {
            observation.extend(row.iter().take(self.width).map(|cell| encode_cell(*cell)));
            let padding = self.width.saturating_sub(row.len());
            observation.extend(std::iter::repeat_n(0.0, padding));
        }
        observation.resize(self.len(), 0.0);
        observation
    }
}

fn encode_cell(cell: Cell) -> f32 {
    match cell {
        Cell::Empty => 0.0,
        Cell::Filled(_) => 1.0,
    }
}
