//! Five-in-a-row detection and four threats
//!
//! Everything here works on the plain [`Board`] without touching the score
//! cache. "As if" queries treat an empty `pos` as holding `color` and never
//! mutate the board.

use crate::board::{Axis, Board, Pos, Stone, WIN_LENGTH};

/// A solid run through one cell along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    len: usize,
    /// Ends that finish on an empty cell (0, 1 or 2)
    open_ends: u8,
}

/// Measure `color`'s solid run through `pos` along `axis`, treating `pos`
/// itself as `color`.
fn run_through(board: &Board, pos: Pos, color: Stone, axis: Axis) -> Run {
    let (dr, dc) = axis.delta();
    let mut len = 1;
    let mut open_ends = 0;
    for dir in [1, -1] {
        let mut row = pos.row as i32;
        let mut col = pos.col as i32;
        loop {
            row += dr * dir;
            col += dc * dir;
            match board.get_rc(row, col) {
                stone if stone == color => len += 1,
                Stone::Empty => {
                    open_ends += 1;
                    break;
                }
                _ => break,
            }
        }
    }
    Run { len, open_ends }
}

/// Find the color with five in a row anywhere on the board.
///
/// Returns `None` when no five exists. If both colors somehow have one,
/// the first found in row-major order wins.
pub fn check_winner(board: &Board) -> Option<Stone> {
    board.positions().find_map(|pos| {
        let stone = board.get(pos);
        (stone.is_player() && board.is_win(pos, stone)).then_some(stone)
    })
}

/// True if `color` playing the empty cell `pos` completes five in a row.
pub fn makes_five(board: &Board, pos: Pos, color: Stone) -> bool {
    Axis::ALL
        .iter()
        .any(|&axis| run_through(board, pos, color, axis).len >= WIN_LENGTH)
}

/// True if `color` playing the empty cell `pos` makes an open four
/// (`_XXXX_`) on some axis.
pub fn makes_open_four(board: &Board, pos: Pos, color: Stone) -> bool {
    Axis::ALL.iter().any(|&axis| {
        let run = run_through(board, pos, color, axis);
        run.len == WIN_LENGTH - 1 && run.open_ends == 2
    })
}

/// Empty cells where `color` would complete five.
pub fn winning_moves(board: &Board, color: Stone) -> Vec<Pos> {
    board
        .legal_moves()
        .into_iter()
        .filter(|&pos| makes_five(board, pos, color))
        .collect()
}

/// Empty cells where `color` would make an open four.
pub fn open_four_moves(board: &Board, color: Stone) -> Vec<Pos> {
    board
        .legal_moves()
        .into_iter()
        .filter(|&pos| makes_open_four(board, pos, color))
        .collect()
}
