//! Position evaluation
//!
//! - [`patterns`]: the score table mapping scanned runs to scores
//! - [`cache`]: per-cell, per-axis scores for both colors
//! - [`scored`]: a board that keeps its cache current

pub mod cache;
pub mod patterns;
pub mod scored;

pub use cache::ScoreCache;
pub use patterns::{PatternScore, ScoreTable};
pub use scored::ScoredBoard;
