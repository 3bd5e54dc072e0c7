//! Board and score cache kept in lockstep

use crate::board::{Board, BoardError, Pos, Stone};

use super::cache::ScoreCache;
use super::patterns::ScoreTable;

/// A [`Board`] whose [`ScoreCache`] is refreshed on every play and undo.
///
/// Searchers work on one of these so the two can never drift apart.
#[derive(Debug, Clone)]
pub struct ScoredBoard {
    board: Board,
    cache: ScoreCache,
}

impl ScoredBoard {
    pub fn new(board: Board, table: ScoreTable) -> Self {
        let cache = ScoreCache::new(&board, table);
        Self { board, cache }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    #[inline]
    pub fn table(&self) -> &ScoreTable {
        self.cache.table()
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// Place a stone and refresh the affected cache window.
    pub fn play(&mut self, pos: Pos, color: Stone) -> Result<(), BoardError> {
        self.board.place(pos, color)?;
        self.cache.incremental_update(&self.board, pos);
        Ok(())
    }

    /// Take back the last stone and refresh the affected cache window.
    pub fn undo(&mut self, pos: Pos) -> Result<(), BoardError> {
        self.board.undo(pos)?;
        self.cache.incremental_update(&self.board, pos);
        Ok(())
    }

    /// Static evaluation from `color`'s point of view
    #[inline]
    pub fn evaluate(&self, color: Stone) -> i32 {
        self.cache.point_estimation(&self.board, color)
    }
}
