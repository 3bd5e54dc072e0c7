//! Per-cell pattern score cache
//!
//! For every color, axis and interior cell the cache holds the score of the
//! run that color would have through the cell along that axis. Empty cells
//! are scored for both colors as if a stone of that color stood there;
//! occupied cells only for the color that occupies them.
//!
//! After a move or undo only cells whose scan can reach the changed cell are
//! recomputed: those within [`RADIUS`] along each axis, plus cells further
//! out that are still connected through a run the scan would traverse.

use crate::board::{Axis, Board, Pos, Stone};

use super::patterns::ScoreTable;

/// Nominal refresh reach along each axis.
pub const RADIUS: i32 = 4;

const COLORS: [Stone; 2] = [Stone::Black, Stone::White];

/// Pattern score cache for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCache {
    table: ScoreTable,
    size: usize,
    /// `[color][axis][row * size + col]`, flattened
    scores: Vec<i32>,
}

impl ScoreCache {
    /// Build a cache for `board` from scratch.
    pub fn new(board: &Board, table: ScoreTable) -> Self {
        let size = board.size();
        let mut cache = Self {
            table,
            size,
            scores: vec![0; COLORS.len() * Axis::ALL.len() * size * size],
        };
        cache.full_rebuild(board);
        cache
    }

    #[inline]
    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    #[inline]
    fn slot(&self, color: Stone, axis: Axis, pos: Pos) -> usize {
        let cells = self.size * self.size;
        (color.slot() * Axis::ALL.len() + axis.slot()) * cells
            + pos.row as usize * self.size
            + pos.col as usize
    }

    /// Score of `color`'s run through `pos` along `axis`.
    #[inline]
    pub fn score(&self, color: Stone, axis: Axis, pos: Pos) -> i32 {
        self.scores[self.slot(color, axis, pos)]
    }

    /// Sum over the four axes. Always 0 for a cell held by the other color.
    #[inline]
    pub fn total(&self, color: Stone, pos: Pos) -> i32 {
        Axis::ALL
            .iter()
            .map(|&axis| self.score(color, axis, pos))
            .sum()
    }

    /// Recompute every cell, both colors, all axes.
    pub fn full_rebuild(&mut self, board: &Board) {
        if board.size() != self.size {
            self.size = board.size();
            self.scores = vec![0; COLORS.len() * Axis::ALL.len() * self.size * self.size];
        }
        for pos in board.positions() {
            for axis in Axis::ALL {
                self.refresh(board, pos, axis);
            }
        }
    }

    /// Bring the cache in line with `board` after a stone was placed on or
    /// removed from `moved`.
    ///
    /// Idempotent: calling it twice on the same board changes nothing.
    pub fn incremental_update(&mut self, board: &Board, moved: Pos) {
        for axis in Axis::ALL {
            self.refresh_window(board, moved, axis);
        }
    }

    /// Refresh the cells along `axis` whose scan can see `center`.
    fn refresh_window(&mut self, board: &Board, center: Pos, axis: Axis) {
        self.refresh(board, center, axis);

        let (dr, dc) = axis.delta();
        for dir in [1, -1] {
            // Cells strictly between `center` and the one being refreshed.
            let mut empties = 0;
            let mut run_color = None;
            let mut mixed = false;

            for k in 1.. {
                let row = center.row as i32 + dr * dir * k;
                let col = center.col as i32 + dc * dir * k;
                if !Pos::is_valid(row, col, self.size) {
                    break;
                }
                let traversable = empties <= 1 && !mixed;
                if k > RADIUS && !traversable {
                    break;
                }

                let pos = Pos::new(row as u8, col as u8);
                self.refresh(board, pos, axis);

                match board.get(pos) {
                    Stone::Empty => empties += 1,
                    stone => match run_color {
                        None => run_color = Some(stone),
                        Some(color) if color != stone => mixed = true,
                        Some(_) => {}
                    },
                }
            }
        }
    }

    /// Recompute one cell on one axis for the colors that can own it.
    fn refresh(&mut self, board: &Board, pos: Pos, axis: Axis) {
        match board.get(pos) {
            Stone::Empty => {
                for color in COLORS {
                    let slot = self.slot(color, axis, pos);
                    self.scores[slot] = scan(board, &self.table, pos, color, axis);
                }
            }
            stone => {
                let own = self.slot(stone, axis, pos);
                self.scores[own] = scan(board, &self.table, pos, stone, axis);
                let other = self.slot(stone.opponent(), axis, pos);
                self.scores[other] = 0;
            }
        }
    }

    /// Static estimate at the search horizon: adjusted totals of `color`'s
    /// stones minus the opponent's.
    pub fn point_estimation(&self, board: &Board, color: Stone) -> i32 {
        let opponent = color.opponent();
        let mut mine = 0;
        let mut theirs = 0;
        for pos in board.positions() {
            let stone = board.get(pos);
            if stone == color {
                mine += self.table.adjust(self.total(color, pos));
            } else if stone == opponent {
                theirs += self.table.adjust(self.total(opponent, pos));
            }
        }
        mine - theirs
    }

    /// Row-major copy of one color/axis layer.
    pub fn layer(&self, color: Stone, axis: Axis) -> Vec<Vec<i32>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.score(color, axis, Pos::new(row as u8, col as u8)))
                    .collect()
            })
            .collect()
    }
}

/// Score `color`'s run through `pos` along `axis`, treating `pos` itself as
/// holding `color`.
///
/// Walks outward in both directions counting `color` stones. One empty cell
/// followed by another `color` stone is bridged; a second gap ends the scan.
/// A border or opposing stone ends the scan and closes that end.
fn scan(board: &Board, table: &ScoreTable, pos: Pos, color: Stone, axis: Axis) -> i32 {
    let step = board.step(axis);
    let origin = board.index(pos) as isize;

    let mut count = 1;
    let mut block = 0;
    let mut gap: Option<i32> = None;

    let mut at = origin;
    loop {
        at += step;
        match board.cell(at) {
            stone if stone == color => count += 1,
            Stone::Empty => {
                if gap.is_none() && board.cell(at + step) == color {
                    gap = Some(count);
                } else {
                    break;
                }
            }
            _ => {
                block += 1;
                break;
            }
        }
    }

    let mut behind = 0;
    at = origin;
    loop {
        at -= step;
        match board.cell(at) {
            stone if stone == color => {
                behind += 1;
                if let Some(offset) = gap.as_mut() {
                    *offset += 1;
                }
            }
            Stone::Empty => {
                if gap.is_none() && board.cell(at - step) == color {
                    gap = Some(0);
                } else {
                    break;
                }
            }
            _ => {
                block += 1;
                break;
            }
        }
    }

    table.count_to_score(count + behind, block, gap)
}
