//! Tiered move candidates
//!
//! Every empty cell is bucketed by how urgent it is for the side to move,
//! using the per-cell totals from the [`ScoreCache`]. Only the most urgent
//! non-empty tier is handed to the search, which keeps the branching factor
//! close to the tactical width of the position.

use crate::board::{Board, Pos, Stone};
use crate::eval::ScoreCache;

/// Default cap on the quiet tier
pub const DEFAULT_LIMIT: usize = 20;

/// An empty cell with both sides' totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub pos: Pos,
    /// Total for the side to move if it plays here
    pub mine: i32,
    /// Total for the opponent if it plays here
    pub theirs: i32,
}

/// Urgency bucket a candidate list was drawn from, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Either side completes five here
    Five,
    /// The side to move makes an open four
    Four,
    /// The opponent threatens an open four and we have no blocked four to
    /// counter with
    BlockFour,
    /// Opponent fours plus every blocked four, to block or counter
    FourExchange,
    /// Double threes for either side, with blocked fours and threes
    DoubleThree,
    /// Threes, then twos (or everything else), capped
    Quiet,
}

/// Result of [`classify`]: the chosen tier and its moves in search order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub tier: Tier,
    pub moves: Vec<Candidate>,
}

impl Candidates {
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.moves.iter().map(|c| c.pos)
    }
}

/// Per-side buckets below the five tier.
#[derive(Debug, Default)]
struct Buckets {
    fours: Vec<Candidate>,
    blocked_fours: Vec<Candidate>,
    double_threes: Vec<Candidate>,
    threes: Vec<Candidate>,
    twos: Vec<Candidate>,
}

/// Select the candidate moves for `color` on `board`.
///
/// Each empty cell lands in exactly one bucket: the first threshold it
/// reaches, checking the mover's total before the opponent's at every level.
/// Only the quiet tier is truncated to `limit`.
pub fn classify(board: &Board, cache: &ScoreCache, color: Stone, limit: usize) -> Candidates {
    let t = cache.table();
    let opponent = color.opponent();

    let mut fives = Vec::new();
    let mut mine = Buckets::default();
    let mut theirs = Buckets::default();
    let mut others = Vec::new();

    for pos in board.legal_moves() {
        let c = Candidate {
            pos,
            mine: cache.total(color, pos),
            theirs: cache.total(opponent, pos),
        };
        if c.mine >= t.five || c.theirs >= t.five {
            fives.push(c);
        } else if c.mine >= t.four {
            mine.fours.push(c);
        } else if c.theirs >= t.four {
            theirs.fours.push(c);
        } else if c.mine >= t.blocked_four {
            mine.blocked_fours.push(c);
        } else if c.theirs >= t.blocked_four {
            theirs.blocked_fours.push(c);
        } else if c.mine >= 2 * t.three {
            mine.double_threes.push(c);
        } else if c.theirs >= 2 * t.three {
            theirs.double_threes.push(c);
        } else if c.mine >= t.three {
            mine.threes.push(c);
        } else if c.theirs >= t.three {
            theirs.threes.push(c);
        } else if c.mine >= t.two {
            mine.twos.push(c);
        } else if c.theirs >= t.two {
            theirs.twos.push(c);
        } else {
            others.push(c);
        }
    }

    if !fives.is_empty() {
        return Candidates { tier: Tier::Five, moves: fives };
    }
    if !mine.fours.is_empty() {
        return Candidates { tier: Tier::Four, moves: mine.fours };
    }
    if !theirs.fours.is_empty() {
        if mine.blocked_fours.is_empty() {
            return Candidates { tier: Tier::BlockFour, moves: theirs.fours };
        }
        let mut moves = theirs.fours;
        moves.extend(mine.blocked_fours);
        moves.extend(theirs.blocked_fours);
        return Candidates { tier: Tier::FourExchange, moves };
    }

    let has_double_three = !mine.double_threes.is_empty() || !theirs.double_threes.is_empty();
    let mut moves = mine.double_threes;
    moves.extend(theirs.double_threes);
    moves.extend(mine.blocked_fours);
    moves.extend(theirs.blocked_fours);
    moves.extend(mine.threes);
    moves.extend(theirs.threes);
    if has_double_three {
        return Candidates { tier: Tier::DoubleThree, moves };
    }

    let mut twos = mine.twos;
    twos.extend(theirs.twos);
    if twos.is_empty() {
        moves.extend(others);
    } else {
        // Latest cell first
        twos.sort_by(|a, b| b.pos.cmp(&a.pos));
        moves.extend(twos);
    }
    moves.truncate(limit);
    Candidates { tier: Tier::Quiet, moves }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::eval::ScoreTable;

    fn setup(stones: &[(u8, u8, Stone)]) -> (Board, ScoreCache) {
        let mut board = Board::new();
        for &(row, col, color) in stones {
            board.place(Pos::new(row, col), color).unwrap();
        }
        let cache = ScoreCache::new(&board, ScoreTable::default());
        (board, cache)
    }

    fn positions(candidates: &Candidates) -> Vec<(u8, u8)> {
        candidates.positions().map(|p| (p.row, p.col)).collect()
    }

    #[test]
    fn test_empty_board_is_quiet_and_capped() {
        let (board, cache) = setup(&[]);
        let result = classify(&board, &cache, Stone::Black, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::Quiet);
        assert_eq!(result.len(), DEFAULT_LIMIT);
        assert_eq!(result.moves[0].pos, Pos::new(0, 0));
    }

    #[test]
    fn test_single_stone_gives_neighbours_latest_first() {
        let (board, cache) = setup(&[(3, 3, Stone::Black)]);
        let result = classify(&board, &cache, Stone::White, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::Quiet);
        assert_eq!(
            positions(&result),
            vec![(4, 4), (4, 3), (4, 2), (3, 4), (3, 2), (2, 4), (2, 3), (2, 2)]
        );
        assert!(result.moves.iter().all(|c| c.theirs > c.mine));
    }

    #[test]
    fn test_five_outranks_opponent_four() {
        let (board, cache) = setup(&[
            (0, 0, Stone::Black),
            (0, 1, Stone::Black),
            (0, 2, Stone::Black),
            (0, 3, Stone::Black),
            (3, 1, Stone::White),
            (3, 2, Stone::White),
            (3, 3, Stone::White),
        ]);
        let result = classify(&board, &cache, Stone::Black, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::Five);
        assert_eq!(positions(&result), vec![(0, 4)]);

        // The same cell is the only answer for the defender too
        let result = classify(&board, &cache, Stone::White, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::Five);
        assert_eq!(positions(&result), vec![(0, 4)]);
    }

    #[test]
    fn test_block_open_four() {
        let (board, cache) = setup(&[
            (3, 1, Stone::White),
            (3, 2, Stone::White),
            (3, 3, Stone::White),
        ]);
        let result = classify(&board, &cache, Stone::Black, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::BlockFour);
        assert_eq!(positions(&result), vec![(3, 4)]);

        let result = classify(&board, &cache, Stone::White, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::Four);
        assert_eq!(positions(&result), vec![(3, 4)]);
    }

    #[test]
    fn test_blocked_four_counters_opponent_four() {
        let (board, cache) = setup(&[
            (3, 1, Stone::White),
            (3, 2, Stone::White),
            (3, 3, Stone::White),
            (6, 0, Stone::Black),
            (6, 1, Stone::Black),
            (6, 2, Stone::Black),
        ]);
        let result = classify(&board, &cache, Stone::Black, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::FourExchange);
        assert_eq!(
            positions(&result),
            vec![(3, 4), (6, 3), (6, 4), (3, 0), (3, 5)]
        );
    }

    #[test]
    fn test_double_three_tier() {
        let (board, cache) = setup(&[
            (3, 1, Stone::Black),
            (3, 2, Stone::Black),
            (1, 3, Stone::Black),
            (2, 3, Stone::Black),
        ]);
        let result = classify(&board, &cache, Stone::Black, DEFAULT_LIMIT);
        assert_eq!(result.tier, Tier::DoubleThree);
        assert_eq!(result.moves[0].pos, Pos::new(3, 3));
        assert!(result.moves[0].mine >= 2 * cache.table().three);
    }

    #[test]
    fn test_full_board_has_no_candidates() {
        let mut board = Board::with_size(2).unwrap();
        for pos in board.legal_moves() {
            let color = board.current_player();
            board.place(pos, color).unwrap();
        }
        let cache = ScoreCache::new(&board, ScoreTable::default());
        let result = classify(&board, &cache, Stone::Black, DEFAULT_LIMIT);
        assert!(result.is_empty());
        assert_eq!(result.tier, Tier::Quiet);
    }
}
