/// Points per lock, indexed by the number of rows it cleared (0 to 4).
const LINE_CLEAR_POINTS: [usize; 5] = [0, 100, 300, 500, 800];

/// Fall speed (ticks per gravity step) at score zero.
pub const INITIAL_DROP_SPEED: usize = 5;

/// Returns the score awarded for clearing `cleared_lines` rows with one lock.
///
/// Clears larger than four rows cannot happen with tetrominoes, but are
/// scored linearly at 100 points per row.
///
/// # Examples
///
/// ```
/// use evotris_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(0), 0);
/// assert_eq!(line_clear_score(4), 800);
/// assert_eq!(line_clear_score(6), 600);
/// ```
#[must_use]
pub fn line_clear_score(cleared_lines: usize) -> usize {
    LINE_CLEAR_POINTS
        .get(cleared_lines)
        .copied()
        .unwrap_or(cleared_lines * 100)
}

/// Returns the fall speed for a score: `max(1, 5 - score / 500)`.
///
/// The value never increases as the score grows and never drops below 1.
#[must_use]
pub fn drop_speed(score: usize) -> usize {
    INITIAL_DROP_SPEED.saturating_sub(score / 500).max(1)
}

/// Per-game counters updated on every tick and every lock.
///
/// ```
/// use evotris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.complete_piece_drop(4), 800);
/// assert_eq!(stats.drop_speed(), 4);
/// assert_eq!(stats.line_cleared_counter(), &[0, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    drop_speed: usize,
    ticks: u64,
    locked_pieces: usize,
    cleared_lines: usize,
    clears_by_size: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            drop_speed: INITIAL_DROP_SPEED,
            ticks: 0,
            locked_pieces: 0,
            cleared_lines: 0,
            clears_by_size: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Ticks per gravity step; recomputed from the score after every lock.
    #[must_use]
    pub const fn drop_speed(&self) -> usize {
        self.drop_speed
    }

    /// Ticks processed so far, including ticks that only applied gravity.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pieces merged into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.locked_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Lock counts bucketed by rows cleared: index `n` counts locks that
    /// cleared `n` rows, and index 4 also holds anything larger.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.clears_by_size
    }

    pub(crate) fn increment_tick(&mut self) {
        self.ticks += 1;
    }

    /// Records a lock that cleared `cleared_lines` rows and returns the
    /// points it earned.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let delta = line_clear_score(cleared_lines);
        self.locked_pieces += 1;
        self.cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(self.clears_by_size.len() - 1);
        self.clears_by_size[bucket] += 1;
        self.score += delta;
        self.drop_speed = drop_speed(self.score);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        let scores = (0..=4).map(line_clear_score).collect::<Vec<_>>();
        assert_eq!(scores, vec![0, 100, 300, 500, 800]);
        assert_eq!(line_clear_score(5), 500);
        assert_eq!(line_clear_score(20), 2000);
    }

    #[test]
    fn test_drop_speed_steps() {
        assert_eq!(drop_speed(0), 5);
        assert_eq!(drop_speed(499), 5);
        assert_eq!(drop_speed(500), 4);
        assert_eq!(drop_speed(1999), 2);
        assert_eq!(drop_speed(2000), 1);
        assert_eq!(drop_speed(usize::MAX), 1);
    }

    #[test]
    fn test_zero_line_lock_changes_nothing_but_counters() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(0), 0);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.drop_speed(), INITIAL_DROP_SPEED);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_accumulates_and_speeds_up() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(2);
        stats.complete_piece_drop(3);
        assert_eq!(stats.score(), 900);
        assert_eq!(stats.drop_speed(), 4);
        stats.complete_piece_drop(4);
        stats.complete_piece_drop(6);
        assert_eq!(stats.score(), 2300);
        assert_eq!(stats.drop_speed(), 1);
        assert_eq!(stats.total_cleared_lines(), 16);
        assert_eq!(stats.line_cleared_counter(), &[0, 1, 1, 1, 2]);
    }
}
