//! Five-in-a-row search engine
//!
//! A tactical engine for freestyle gomoku on small square boards:
//! - Boards from 2x2 to 19x19, 7x7 by default
//! - Five or more in a row wins, Black moves first
//! - No captures, no forbidden moves
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with a sentinel border and move history
//! - [`rules`]: Win detection and forcing-move queries
//! - [`eval`]: Pattern scores and the incrementally updated score cache
//! - [`search`]: Candidate tiers, alpha-beta and Monte-Carlo tree search
//! - [`engine`]: Main AI engine selecting one search strategy
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{AIEngine, Board, Move, Pos, Stone};
//!
//! let mut board = Board::new();
//! let mut engine = AIEngine::new();
//!
//! board.place(Pos::new(3, 3), Stone::Black).unwrap();
//!
//! // AI responds as White
//! if let Move::Play(pos) = engine.get_move(&board, Stone::White) {
//!     board.place(pos, Stone::White).unwrap();
//!     println!("AI plays at {pos}");
//! }
//! ```
//!
//! # Search Priority
//!
//! Both strategies see moves through the same candidate tiers:
//! 1. A cell completing five for either side
//! 2. Our open four
//! 3. Blocking their open four (with our fours as counters)
//! 4. Double threes, fours and threes
//! 5. Everything else near the stones, capped in number

pub mod board;
pub mod engine;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Stone, PASS};
pub use engine::{AIEngine, EngineConfig, MoveResult, SearchType, Strategy};
