//! Main AI engine: one entry point over interchangeable search strategies
//!
//! The engine owns either an alpha-beta [`Searcher`] or an [`Mcts`] engine,
//! picked at construction, and adds timing and logging around it. A
//! front-end only ever talks to [`AIEngine`]:
//!
//! 1. `get_move` / `get_move_with_stats` once per turn
//! 2. `update_with_move` for every move actually played, by either side
//! 3. `report_best_move_so_far` when it runs out of time
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, Move, Pos, Stone};
//!
//! let mut engine = AIEngine::new();
//! let mut board = Board::new();
//! board.place(Pos::new(3, 3), Stone::Black).unwrap();
//!
//! let result = engine.get_move_with_stats(&board, Stone::White);
//! println!("Best move: {}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! assert!(matches!(result.best_move, Move::Play(_)));
//! ```

use std::time::Instant;

use crate::board::{Board, Move, Stone};
use crate::eval::ScoreTable;
use crate::search::{Mcts, MctsConfig, SearchConfig, SearchStrategy, Searcher};

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Negamax alpha-beta over tiered candidates
    AlphaBeta,
    /// Monte-Carlo tree search
    Mcts,
}

/// Strategy selection with its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    AlphaBeta(SearchConfig),
    Mcts(MctsConfig),
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// Pattern weights used by the score cache
    pub table: ScoreTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::AlphaBeta(SearchConfig::default()),
            table: ScoreTable::default(),
        }
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found, `Move::Pass` if nothing can be played
    pub best_move: Move,
    /// Alpha-beta value, or visits of the chosen MCTS child
    pub score: i32,
    /// Engine that found this move
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Nodes (alpha-beta) or playouts (MCTS)
    pub nodes: u64,
}

/// AI engine for five-in-a-row.
pub struct AIEngine {
    strategy: Box<dyn SearchStrategy>,
    search_type: SearchType,
    config: EngineConfig,
}

impl AIEngine {
    /// Alpha-beta engine with default settings.
    ///
    /// ```
    /// use gomoku::AIEngine;
    ///
    /// let engine = AIEngine::new();
    /// assert_eq!(engine.name(), "alphabeta");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let (strategy, search_type): (Box<dyn SearchStrategy>, SearchType) = match config.strategy
        {
            Strategy::AlphaBeta(search) => (
                Box::new(Searcher::with_config(search, config.table)),
                SearchType::AlphaBeta,
            ),
            Strategy::Mcts(mcts) => (Box::new(Mcts::new(mcts, config.table)), SearchType::Mcts),
        };
        Self {
            strategy,
            search_type,
            config,
        }
    }

    /// Alpha-beta engine with a custom search configuration.
    #[must_use]
    pub fn alpha_beta(search: SearchConfig) -> Self {
        Self::with_config(EngineConfig {
            strategy: Strategy::AlphaBeta(search),
            ..EngineConfig::default()
        })
    }

    /// MCTS engine with a custom configuration.
    #[must_use]
    pub fn mcts(mcts: MctsConfig) -> Self {
        Self::with_config(EngineConfig {
            strategy: Strategy::Mcts(mcts),
            ..EngineConfig::default()
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Get the best move for the given position.
    ///
    /// Use `get_move_with_stats` if you need search statistics.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, color: Stone) -> Move {
        self.get_move_with_stats(board, color).best_move
    }

    /// Get the best move with timing and node statistics.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, color: Stone) -> MoveResult {
        let start = Instant::now();
        let result = self.strategy.get_move_with_stats(board, color);
        let time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "{} plays {} for {color:?} (score {}, {} nodes, {time_ms}ms)",
            self.strategy.name(),
            result.best_move,
            result.score,
            result.nodes
        );

        MoveResult {
            best_move: result.best_move,
            score: result.score,
            search_type: self.search_type,
            time_ms,
            nodes: result.nodes,
        }
    }

    /// Best move known right now, for a front-end that ran out of time.
    pub fn report_best_move_so_far(&self) -> Move {
        self.strategy.report_best_move_so_far()
    }

    /// Tell the engine a move was played on the real board.
    pub fn update_with_move(&mut self, mv: Move) {
        self.strategy.update_with_move(mv);
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}
