//! Search module for five-in-a-row
//!
//! Contains:
//! - Tiered candidate classification on top of the score cache
//! - Negamax alpha-beta search and a boolean win/draw/loss solver
//! - Monte-Carlo tree search with tree reuse across moves
//!
//! Both engines implement [`SearchStrategy`] so a front-end can pick one at
//! construction and drive it the same way.

pub mod alphabeta;
pub mod candidates;
pub mod mcts;
pub mod policy;
pub mod tree;

use crate::board::{Board, Move, Stone};

pub use alphabeta::{DepthPolicy, MoveSource, Outcome, SearchConfig, Searcher};
pub use candidates::{classify, Candidate, Candidates, Tier};
pub use mcts::{Mcts, MctsConfig};
pub use policy::{ExpansionPolicy, RolloutPolicy};

/// Outcome of one move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Chosen move, `Move::Pass` when nothing can be played
    pub best_move: Move,
    /// Alpha-beta value of the move, or visit count of the chosen child for
    /// MCTS
    pub score: i32,
    /// Nodes (alpha-beta) or playouts (MCTS) spent
    pub nodes: u64,
}

impl SearchResult {
    #[inline]
    pub(crate) fn pass(score: i32, nodes: u64) -> Self {
        Self {
            best_move: Move::Pass,
            score,
            nodes,
        }
    }
}

/// A move-proposing engine.
pub trait SearchStrategy {
    /// Short engine name for logs
    fn name(&self) -> &'static str;

    /// Search `board` for `color` and return the chosen move with stats.
    /// The caller's board is never modified.
    fn get_move_with_stats(&mut self, board: &Board, color: Stone) -> SearchResult;

    /// Convenience wrapper returning only the move.
    fn get_move(&mut self, board: &Board, color: Stone) -> Move {
        self.get_move_with_stats(board, color).best_move
    }

    /// Best move known right now, without further searching.
    fn report_best_move_so_far(&self) -> Move;

    /// Tell the engine a move was actually played.
    fn update_with_move(&mut self, mv: Move);
}
