//! Move policies for Monte-Carlo tree search
//!
//! Expansion policies give the moves (and their priors) a new tree node is
//! expanded with. Rollout policies pick moves during simulated games.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Pos, Stone};
use crate::eval::ScoredBoard;
use crate::rules::{open_four_moves, winning_moves};

use super::candidates::{classify, DEFAULT_LIMIT};

/// Children created when a node is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionPolicy {
    /// Every empty cell, uniform prior
    Uniform,
    /// The classifier's candidate tier, uniform prior
    Tiered,
}

impl ExpansionPolicy {
    /// `(move, prior)` pairs for `color` to move on `scored`. Priors sum to
    /// one unless the list is empty.
    pub fn priors(self, scored: &ScoredBoard, color: Stone) -> Vec<(Pos, f64)> {
        let moves: Vec<Pos> = match self {
            ExpansionPolicy::Uniform => scored.board().legal_moves(),
            ExpansionPolicy::Tiered => {
                classify(scored.board(), scored.cache(), color, DEFAULT_LIMIT)
                    .positions()
                    .collect()
            }
        };
        let prior = 1.0 / moves.len().max(1) as f64;
        moves.into_iter().map(|pos| (pos, prior)).collect()
    }
}

/// How moves are picked inside a rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutPolicy {
    /// Uniformly random empty cell
    Random,
    /// Forcing moves first (see [`rule_moves`]), random among equals
    RuleBased,
}

impl RolloutPolicy {
    /// Pick a move for `color`, `None` on a full board.
    pub fn choose<R: Rng + ?Sized>(self, board: &Board, color: Stone, rng: &mut R) -> Option<Pos> {
        let moves = match self {
            RolloutPolicy::Random => board.legal_moves(),
            RolloutPolicy::RuleBased => rule_moves(board, color).1,
        };
        moves.choose(rng).copied()
    }
}

/// Category of the moves returned by [`rule_moves`], most forcing first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCategory {
    /// Completes five
    Win,
    /// Stops the opponent's five
    BlockWin,
    /// Makes an open four
    OpenFour,
    /// Takes a cell where the opponent would make an open four
    BlockOpenFour,
    /// Nothing forcing: every empty cell
    Random,
}

/// Moves for `color` from the first non-empty category.
pub fn rule_moves(board: &Board, color: Stone) -> (RuleCategory, Vec<Pos>) {
    let opponent = color.opponent();

    let moves = winning_moves(board, color);
    if !moves.is_empty() {
        return (RuleCategory::Win, moves);
    }
    let moves = winning_moves(board, opponent);
    if !moves.is_empty() {
        return (RuleCategory::BlockWin, moves);
    }
    let moves = open_four_moves(board, color);
    if !moves.is_empty() {
        return (RuleCategory::OpenFour, moves);
    }
    let moves = open_four_moves(board, opponent);
    if !moves.is_empty() {
        return (RuleCategory::BlockOpenFour, moves);
    }
    (RuleCategory::Random, board.legal_moves())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::eval::ScoreTable;

    fn board_with(stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(row, col, color) in stones {
            board.place(Pos::new(row, col), color).unwrap();
        }
        board
    }

    #[test]
    fn test_uniform_priors() {
        let board = board_with(&[(3, 3, Stone::Black)]);
        let scored = ScoredBoard::new(board, ScoreTable::default());
        let priors = ExpansionPolicy::Uniform.priors(&scored, Stone::White);
        assert_eq!(priors.len(), 48);
        let total: f64 = priors.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiered_priors_follow_classifier() {
        let board = board_with(&[(3, 3, Stone::Black)]);
        let scored = ScoredBoard::new(board, ScoreTable::default());
        let priors = ExpansionPolicy::Tiered.priors(&scored, Stone::White);
        assert_eq!(priors.len(), 8);
        assert!(priors.iter().all(|(_, p)| (*p - 0.125).abs() < 1e-12));
    }

    #[test]
    fn test_rule_categories_in_order() {
        // Black can win; White's four must wait
        let board = board_with(&[
            (0, 0, Stone::Black),
            (0, 1, Stone::Black),
            (0, 2, Stone::Black),
            (0, 3, Stone::Black),
            (6, 0, Stone::White),
            (6, 1, Stone::White),
            (6, 2, Stone::White),
            (6, 3, Stone::White),
        ]);
        assert_eq!(
            rule_moves(&board, Stone::Black),
            (RuleCategory::Win, vec![Pos::new(0, 4)])
        );
        assert_eq!(
            rule_moves(&board, Stone::White),
            (RuleCategory::Win, vec![Pos::new(6, 4)])
        );
    }

    #[test]
    fn test_rule_block_win_and_open_four() {
        let board = board_with(&[
            (0, 0, Stone::White),
            (0, 1, Stone::White),
            (0, 2, Stone::White),
            (0, 3, Stone::White),
        ]);
        assert_eq!(
            rule_moves(&board, Stone::Black),
            (RuleCategory::BlockWin, vec![Pos::new(0, 4)])
        );

        let board = board_with(&[
            (3, 1, Stone::Black),
            (3, 2, Stone::Black),
            (3, 3, Stone::Black),
        ]);
        assert_eq!(
            rule_moves(&board, Stone::Black),
            (RuleCategory::OpenFour, vec![Pos::new(3, 4)])
        );
        assert_eq!(
            rule_moves(&board, Stone::White),
            (RuleCategory::BlockOpenFour, vec![Pos::new(3, 4)])
        );
    }

    #[test]
    fn test_rule_random_when_quiet() {
        let board = board_with(&[(3, 3, Stone::Black)]);
        let (category, moves) = rule_moves(&board, Stone::White);
        assert_eq!(category, RuleCategory::Random);
        assert_eq!(moves.len(), 48);
    }

    #[test]
    fn test_choose() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = board_with(&[
            (3, 1, Stone::Black),
            (3, 2, Stone::Black),
            (3, 3, Stone::Black),
        ]);
        for _ in 0..10 {
            assert_eq!(
                RolloutPolicy::RuleBased.choose(&board, Stone::White, &mut rng),
                Some(Pos::new(3, 4))
            );
            let pos = RolloutPolicy::Random.choose(&board, Stone::White, &mut rng).unwrap();
            assert!(board.is_empty(pos));
        }

        let mut full = Board::with_size(2).unwrap();
        for pos in full.legal_moves() {
            let color = full.current_player();
            full.place(pos, color).unwrap();
        }
        assert_eq!(RolloutPolicy::Random.choose(&full, Stone::Black, &mut rng), None);
    }
}
