use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceColor};

/// Dimensions of the playing grid, fixed for the lifetime of a board.
///
/// Both dimensions are stored as `u8`; the default is the standard 10×20
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSize")]
pub struct BoardSize {
    width: u8,
    height: u8,
}

#[derive(Deserialize)]
struct RawBoardSize {
    width: u8,
    height: u8,
}

impl TryFrom<RawBoardSize> for BoardSize {
    type Error = &'static str;

    fn try_from(raw: RawBoardSize) -> Result<Self, Self::Error> {
        if raw.width == 0 || raw.height == 0 {
            return Err("board dimensions must be non-zero");
        }
        Ok(Self::new(raw.width, raw.height))
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BoardSize {
    pub const DEFAULT: Self = Self::new(10, 20);

    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub const fn new(width: u8, height: u8) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero");
        Self { width, height }
    }

    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> u8 {
        self.height
    }

    /// Total number of cells (`width × height`).
    #[must_use]
    pub fn cell_count(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked block carrying the color tag of the piece it came from.
    Filled(PieceColor),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled(color) => color.as_char(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoardRow {
    cells: Vec<Cell>,
}

impl BoardRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; width],
        }
    }

    /// A row is complete when every cell is occupied, whatever its color.
    fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| c.is_occupied())
    }

    fn is_any_occupied(&self) -> bool {
        self.cells.iter().any(|c| c.is_occupied())
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

/// The grid of locked cells.
///
/// Row 0 is the top of the field. The number of rows and columns never
/// changes: line clears remove complete rows and insert the same number of
/// empty rows at the top.
///
/// # Example
///
/// ```
/// use evotris_engine::Board;
///
/// let mut board: Board = "
///     ....
///     CCCC
/// "
/// .parse()
/// .unwrap();
///
/// assert_eq!(board.clear_lines(), 1);
/// assert_eq!(board.occupied_cell_count(), 0);
/// assert_eq!(board.size().height(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        let width = usize::from(size.width());
        Self {
            size,
            rows: (0..size.height())
                .map(|_| BoardRow::empty(width))
                .collect(),
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.cells.as_slice())
    }

    fn is_vacant(&self, x: i32, y: i32) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        self.cell(x, y).is_some_and(Cell::is_empty)
    }

    /// Checks whether any occupied cell of the piece lies outside the grid or
    /// on an occupied cell.
    ///
    /// Cells below the bottom row, left of column 0, right of the last column,
    /// or above row 0 all count as collisions. A piece with no occupied cells
    /// never collides.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece
            .occupied_positions()
            .any(|(x, y)| !self.is_vacant(x, y))
    }

    /// Writes the piece's cells into the grid with the piece's color.
    ///
    /// This is the lock operation. Cells that fall outside the grid are
    /// skipped.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let cell = Cell::Filled(piece.color());
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(target) = self.rows.get_mut(y).and_then(|row| row.cells.get_mut(x)) {
                *target = cell;
            }
        }
    }

    /// Clears complete lines and returns how many were cleared.
    ///
    /// All complete rows are removed at once; rows above them shift down and
    /// the same number of empty rows appear at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows.swap(y, y + count);
            }
        }
        for row in &mut self.rows[..count] {
            row.clear();
        }
        count
    }

    /// Returns `true` if the top row holds any occupied cell.
    #[must_use]
    pub fn is_top_row_occupied(&self) -> bool {
        self.rows.first().is_some_and(BoardRow::is_any_occupied)
    }

    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .filter(|c| c.is_occupied())
            .count()
    }
}

/// Text rendering: one line per row, `.` for empty cells and the color
/// character for occupied ones.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                f.write_char('\n')?;
            }
            for cell in &row.cells {
                f.write_char(cell.as_char())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has no rows")]
    NoRows,
    #[display("board is larger than 255×255")]
    TooLarge,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {row}, column {column}")]
    InvalidCell {
        row: usize,
        column: usize,
        found: char,
    },
}

/// Parses the format produced by [`Board`]'s `Display` implementation.
///
/// Leading and trailing whitespace on each line is ignored, as are blank
/// lines.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let first = lines.first().ok_or(ParseBoardError::NoRows)?;
        let width = first.chars().count();

        let mut rows = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(column, c)| match c {
                    '.' => Ok(Cell::Empty),
                    _ => PieceColor::from_char(c).map(Cell::Filled).ok_or(
                        ParseBoardError::InvalidCell {
                            row,
                            column,
                            found: c,
                        },
                    ),
                })
                .collect::<Result<Vec<_>, _>>()?;
            if cells.len() != width {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            rows.push(BoardRow { cells });
        }

        let (Ok(width), Ok(height)) = (u8::try_from(width), u8::try_from(rows.len())) else {
            return Err(ParseBoardError::TooLarge);
        };
        Ok(Self {
            size: BoardSize::new(width, height),
            rows,
        })
    }
}
