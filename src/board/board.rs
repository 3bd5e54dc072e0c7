//! Board structure with a bordered flat grid and move history

use std::fmt;

use super::{
    Axis, BoardError, Pos, Stone, COLUMNS, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, WIN_LENGTH,
};

/// Game board.
///
/// Cells live in a flat array with a one-cell `Border` margin on every side,
/// so walking off the playing area always lands on a sentinel instead of
/// needing a bounds check. Only interior cells ever change.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    /// Row length of the padded grid (`size + 2`)
    stride: usize,
    grid: Vec<Stone>,
    current_player: Stone,
    stones: usize,
    /// Move history for undo
    history: Vec<MoveRecord>,
}

/// Record of a move for undo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub pos: Pos,
    pub color: Stone,
    /// Player to move before this stone was placed
    previous_player: Stone,
}

impl Board {
    /// Empty 7x7 board with Black to move.
    pub fn new() -> Self {
        Self::build(DEFAULT_SIZE)
    }

    /// Empty board of the given side length.
    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        Ok(Self::build(size))
    }

    fn build(size: usize) -> Self {
        let stride = size + 2;
        let mut grid = vec![Stone::Border; stride * stride];
        for row in 0..size {
            let start = (row + 1) * stride + 1;
            grid[start..start + size].fill(Stone::Empty);
        }
        Self {
            size,
            stride,
            grid,
            current_player: Stone::Black,
            stones: 0,
            history: Vec::with_capacity(size * size),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Grid offset of one step along `axis`
    #[inline]
    pub(crate) fn step(&self, axis: Axis) -> isize {
        let (dr, dc) = axis.delta();
        dr as isize * self.stride as isize + dc as isize
    }

    /// Linear grid index of an interior position
    #[inline]
    pub fn index(&self, pos: Pos) -> usize {
        (pos.row as usize + 1) * self.stride + pos.col as usize + 1
    }

    /// Interior position of a grid index, `None` for border cells
    #[inline]
    pub fn pos_of(&self, index: usize) -> Option<Pos> {
        let row = index / self.stride;
        let col = index % self.stride;
        if row == 0 || col == 0 || row > self.size || col > self.size {
            return None;
        }
        Some(Pos::new((row - 1) as u8, (col - 1) as u8))
    }

    /// Cell at a grid index; anything past the array is border.
    #[inline]
    pub(crate) fn cell(&self, index: isize) -> Stone {
        if index < 0 {
            return Stone::Border;
        }
        self.grid
            .get(index as usize)
            .copied()
            .unwrap_or(Stone::Border)
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.grid[self.index(pos)]
    }

    /// Get stone at signed coordinates, `Border` off the board
    #[inline]
    pub fn get_rc(&self, row: i32, col: i32) -> Stone {
        if Pos::is_valid(row, col, self.size) {
            self.get(Pos::new(row as u8, col as u8))
        } else {
            Stone::Border
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        (pos.row as usize) < self.size && (pos.col as usize) < self.size
    }

    #[inline]
    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    /// Override the side to move (e.g. when a front-end asks for a move for
    /// a specific color).
    pub fn set_current_player(&mut self, color: Stone) {
        debug_assert!(color.is_player());
        self.current_player = color;
    }

    /// Place a stone and hand the turn to the opponent.
    ///
    /// Fails without touching the board if the cell is occupied or off the
    /// playing area.
    pub fn place(&mut self, pos: Pos, color: Stone) -> Result<(), BoardError> {
        if !color.is_player() {
            return Err(BoardError::InvalidColor);
        }
        if !self.contains(pos) {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                size: self.size,
            });
        }
        let idx = self.index(pos);
        if self.grid[idx] != Stone::Empty {
            return Err(BoardError::Occupied(pos));
        }
        self.grid[idx] = color;
        self.history.push(MoveRecord {
            pos,
            color,
            previous_player: self.current_player,
        });
        self.current_player = color.opponent();
        self.stones += 1;
        Ok(())
    }

    /// Take back the most recent move, restoring the side to move.
    pub fn undo(&mut self, pos: Pos) -> Result<(), BoardError> {
        if let Some(last) = self.history.last() {
            if last.pos != pos {
                return Err(BoardError::NotLastMove(pos));
            }
        }
        let record = self.history.pop().ok_or(BoardError::NoMoveToUndo)?;
        let idx = self.index(pos);
        self.grid[idx] = Stone::Empty;
        self.current_player = record.previous_player;
        self.stones -= 1;
        Ok(())
    }

    /// Most recent move, if any
    #[inline]
    pub fn last_move(&self) -> Option<MoveRecord> {
        self.history.last().copied()
    }

    /// Moves played so far, oldest first
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Check whether `color` has five in a row through `pos`.
    ///
    /// Only the nine-cell window centred on `pos` is scanned on each axis:
    /// a five through `pos` cannot reach further than four cells away.
    pub fn is_win(&self, pos: Pos, color: Stone) -> bool {
        let center = self.index(pos) as isize;
        let reach = WIN_LENGTH as isize - 1;
        for axis in Axis::ALL {
            let step = self.step(axis);
            let mut run = 0;
            for i in -reach..=reach {
                if self.cell(center + i * step) == color {
                    run += 1;
                    if run >= WIN_LENGTH {
                        return true;
                    }
                } else {
                    run = 0;
                }
            }
        }
        false
    }

    /// Empty cells in row-major order
    pub fn legal_moves(&self) -> Vec<Pos> {
        let mut moves = Vec::with_capacity(self.empty_count());
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Pos::new(row as u8, col as u8);
                if self.is_empty(pos) {
                    moves.push(pos);
                }
            }
        }
        moves
    }

    /// All interior positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |col| Pos::new(row as u8, col as u8)))
    }

    /// On-board cells among the eight around `pos`
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        const AROUND: [(i32, i32); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        AROUND.iter().filter_map(move |&(dr, dc)| {
            let row = pos.row as i32 + dr;
            let col = pos.col as i32 + dc;
            Pos::is_valid(row, col, self.size).then(|| Pos::new(row as u8, col as u8))
        })
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.stones
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.size * self.size - self.stones
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.stones == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones == self.size * self.size
    }

    /// Centre cell, the fixed opening point
    #[inline]
    pub fn center(&self) -> Pos {
        let mid = (self.size / 2) as u8;
        Pos::new(mid, mid)
    }

    /// Same stones and side to move, regardless of how they got there
    pub fn same_position(&self, other: &Board) -> bool {
        self.size == other.size
            && self.current_player == other.current_player
            && self.grid == other.grid
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.same_position(other)
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    /// `X` for black, `O` for white, `.` for empty; row 1 printed last.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.size).rev() {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0..self.size {
                let c = match self.get(Pos::new(row as u8, col as u8)) {
                    Stone::Black => 'X',
                    Stone::White => 'O',
                    _ => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{}", COLUMNS[col] as char)?;
        }
        writeln!(f)
    }
}
