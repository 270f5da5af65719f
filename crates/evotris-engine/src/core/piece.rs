use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::board::BoardSize;

/// Largest width or height a piece shape may have.
pub const MAX_SHAPE_SIZE: usize = 4;

/// A falling piece: a shape, a color tag, and the top-left anchor of the shape
/// in grid coordinates.
///
/// Pieces are immutable. Movement and rotation return new `Piece` values and
/// leave collision checks to the caller (see [`Board::is_colliding`]).
///
/// # Example
///
/// ```
/// use evotris_engine::{BoardSize, Piece, PieceColor, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T, PieceColor::Magenta, BoardSize::DEFAULT);
/// let moved = piece.right();
/// let rotated = moved.rotated();
/// assert_eq!(rotated.position(), moved.position());
/// ```
///
/// [`Board::is_colliding`]: crate::Board::is_colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    shape: PieceShape,
    color: PieceColor,
    position: PiecePosition,
}

impl Piece {
    #[must_use]
    pub const fn new(shape: PieceShape, color: PieceColor, position: PiecePosition) -> Self {
        Self {
            shape,
            color,
            position,
        }
    }

    /// Creates a piece of the given kind at the spawn anchor of a board.
    ///
    /// The anchor is horizontally centered (`width / 2 - shape_width / 2`) on
    /// the top row.
    #[must_use]
    pub fn spawn(kind: PieceKind, color: PieceColor, size: BoardSize) -> Self {
        let shape = kind.shape();
        let x = i32::from(size.width() / 2) - i32::from(shape.width() / 2);
        Self::new(shape, color, PiecePosition::new(x, 0))
    }

    #[must_use]
    pub const fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    /// Returns the grid coordinates of every occupied cell of the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .into_iter()
            .map(move |(dx, dy)| {
                (
                    self.position.x() + i32::from(dx),
                    self.position.y() + i32::from(dy),
                )
            })
    }

    #[must_use]
    pub const fn moved_to(&self, position: PiecePosition) -> Self {
        Self {
            shape: self.shape,
            color: self.color,
            position,
        }
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.moved_to(self.position.left())
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.moved_to(self.position.right())
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.moved_to(self.position.down())
    }

    /// Returns the piece rotated 90° clockwise around the same anchor.
    ///
    /// There is no wall kick and no recentering of the bounding box, so a
    /// rotation near a wall can shift the piece's footprint.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            color: self.color,
            position: self.position,
        }
    }
}

/// Top-left anchor of a piece's bounding box.
///
/// - (0, 0) is the top-left cell of the grid
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// Coordinates are signed so that candidate positions left of or above the
/// grid can be represented and rejected by collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y + 1)
    }
}

/// Boolean occupancy matrix of a piece, at most 4×4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl PieceShape {
    /// Builds a shape from row-major rows.
    ///
    /// # Panics
    ///
    /// Panics if there are more than 4 rows, a row is longer than 4 cells, or
    /// the rows have different lengths.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_rows(rows: &[&[bool]]) -> Self {
        assert!(rows.len() <= MAX_SHAPE_SIZE, "shape has too many rows");
        let height = rows.len();
        let width = if height == 0 { 0 } else { rows[0].len() };
        assert!(width <= MAX_SHAPE_SIZE, "shape has too many columns");

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < height {
            assert!(rows[y].len() == width, "shape rows must have equal length");
            let mut x = 0;
            while x < width {
                cells[y][x] = rows[y][x];
                x += 1;
            }
            y += 1;
        }
        Self {
            width: width as u8,
            height: height as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < usize::from(self.width) && y < usize::from(self.height) && self.cells[y][x]
    }

    /// Returns the shape as a vector of rows, mainly for inspection in tests.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells[..usize::from(self.height)]
            .iter()
            .map(|row| row[..usize::from(self.width)].to_vec())
            .collect()
    }

    /// Offsets `(dx, dy)` of the occupied cells relative to the anchor.
    #[must_use]
    pub fn occupied_offsets(&self) -> ArrayVec<(u8, u8), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }> {
        let mut offsets = ArrayVec::new();
        for dy in 0..self.height {
            for dx in 0..self.width {
                if self.cells[usize::from(dy)][usize::from(dx)] {
                    offsets.push((dx, dy));
                }
            }
        }
        offsets
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.occupied_offsets().len()
    }

    /// Rotates 90° clockwise: the transpose of the row-reversed matrix.
    ///
    /// A `w×h` shape becomes `h×w`, with `new[r][c] = old[h - 1 - c][r]`.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let old_height = self.height as usize;
        let old_width = self.width as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < old_width {
            let mut c = 0;
            while c < old_height {
                cells[r][c] = self.cells[old_height - 1 - c][r];
                c += 1;
            }
            r += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    Z = 1,
    S = 2,
    T = 3,
    O = 4,
    L = 5,
    J = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::Z,
        Self::S,
        Self::T,
        Self::O,
        Self::L,
        Self::J,
    ];

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        SPAWN_SHAPES[self as usize]
    }
}

const SPAWN_SHAPES: [PieceShape; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    [
        // I-piece
        PieceShape::from_rows(&[&[C, C, C, C]]),
        // Z-piece
        PieceShape::from_rows(&[&[C, C, E], &[E, C, C]]),
        // S-piece
        PieceShape::from_rows(&[&[E, C, C], &[C, C, E]]),
        // T-piece
        PieceShape::from_rows(&[&[C, C, C], &[E, C, E]]),
        // O-piece
        PieceShape::from_rows(&[&[C, C], &[C, C]]),
        // L-piece
        PieceShape::from_rows(&[&[C, E, E], &[C, C, C]]),
        // J-piece
        PieceShape::from_rows(&[&[E, E, C], &[C, C, C]]),
    ]
};

/// Color tag of a piece. Drawn independently of the piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceColor {
    Cyan = 0,
    Red = 1,
    Green = 2,
    Magenta = 3,
    Yellow = 4,
    Orange = 5,
    Blue = 6,
}

impl Distribution<PieceColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceColor {
        PieceColor::ALL[rng.random_range(0..PieceColor::LEN)]
    }
}

impl PieceColor {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::Cyan,
        Self::Red,
        Self::Green,
        Self::Magenta,
        Self::Yellow,
        Self::Orange,
        Self::Blue,
    ];

    /// Returns the single character used for this color in text boards.
    ///
    /// # Examples
    ///
    /// ```
    /// use evotris_engine::PieceColor;
    ///
    /// assert_eq!(PieceColor::Cyan.as_char(), 'C');
    /// assert_eq!(PieceColor::Orange.as_char(), 'O');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceColor::Cyan => 'C',
            PieceColor::Red => 'R',
            PieceColor::Green => 'G',
            PieceColor::Magenta => 'M',
            PieceColor::Yellow => 'Y',
            PieceColor::Orange => 'O',
            PieceColor::Blue => 'B',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(PieceColor::Cyan),
            'R' => Some(PieceColor::Red),
            'G' => Some(PieceColor::Green),
            'M' => Some(PieceColor::Magenta),
            'Y' => Some(PieceColor::Yellow),
            'O' => Some(PieceColor::Orange),
            'B' => Some(PieceColor::Blue),
            _ => None,
        }
    }
}
