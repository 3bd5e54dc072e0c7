//! Board representation for five-in-a-row

pub mod board;


use std::fmt;

// Re-exports
pub use board::{Board, MoveRecord};

/// Default board size (7x7)
pub const DEFAULT_SIZE: usize = 7;
/// Smallest supported board side
pub const MIN_SIZE: usize = 2;
/// Largest supported board side
pub const MAX_SIZE: usize = 19;
/// Stones in a row needed to win
pub const WIN_LENGTH: usize = 5;

/// Cell contents. `Border` only ever appears in the margin around the
/// playing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
    Border,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            other => other,
        }
    }

    /// True for `Black` and `White`
    #[inline]
    pub fn is_player(self) -> bool {
        matches!(self, Stone::Black | Stone::White)
    }

    /// Slot of a player color in per-color tables
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Stone::White => 1,
            _ => 0,
        }
    }
}

/// The four line directions a five can run along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// West to east
    Horizontal,
    /// North to south
    Vertical,
    /// North-west to south-east
    Diagonal,
    /// North-east to south-west
    AntiDiagonal,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::Diagonal,
        Axis::AntiDiagonal,
    ];

    /// (row, col) step of the positive direction
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
            Axis::Diagonal => (1, 1),
            Axis::AntiDiagonal => (1, -1),
        }
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Position on the board (0-based, row 0 at the top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < MAX_SIZE && (col as usize) < MAX_SIZE);
        Self { row, col }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32, size: usize) -> bool {
        row >= 0 && row < size as i32 && col >= 0 && col < size as i32
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

/// Column letters used by Go-style coordinates (no `I`).
pub(crate) const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COLUMNS[self.col as usize] as char, self.row + 1)
    }
}

/// A move handed to or returned by an engine. `Pass` never corresponds to a
/// board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Play(Pos),
    Pass,
}

/// The pass sentinel
pub const PASS: Move = Move::Pass;

impl Move {
    /// The placed position, `None` for a pass
    #[inline]
    pub fn pos(self) -> Option<Pos> {
        match self {
            Move::Play(pos) => Some(pos),
            Move::Pass => None,
        }
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }
}

impl From<Pos> for Move {
    fn from(pos: Pos) -> Self {
        Move::Play(pos)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Play(pos) => pos.fmt(f),
            Move::Pass => f.write_str("pass"),
        }
    }
}

/// Errors reported by [`Board`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The target cell already holds a stone
    #[error("cell {0} is already occupied")]
    Occupied(Pos),

    /// The position lies outside the playing area
    #[error("position ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: u8, col: u8, size: usize },

    /// Only a player color can be placed
    #[error("only black or white stones can be placed")]
    InvalidColor,

    /// Undo must target the most recent move
    #[error("{0} is not the most recent move")]
    NotLastMove(Pos),

    /// Undo on a board without history
    #[error("no move to undo")]
    NoMoveToUndo,

    /// Requested board size is not supported
    #[error("board size {0} is not supported (expected {min}..={max})", min = MIN_SIZE, max = MAX_SIZE)]
    UnsupportedSize(usize),
}
