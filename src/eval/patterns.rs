//! Pattern scores for run evaluation
//!
//! A run of same-colored stones along one axis is summarised by three
//! numbers: its length `count` (a bridged single-cell gap included), the
//! number of closed ends `block` (0, 1 or 2), and the offset of the bridged
//! gap, if any. [`ScoreTable::count_to_score`] maps those to a tactical
//! score. The table is the single source of truth for all tactical scoring.

/// Default pattern weights.
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 10_000_000;
    /// Open four: _OOOO_
    pub const FOUR: i32 = 100_000;
    /// Open three: _OOO_
    pub const THREE: i32 = 1_000;
    pub const TWO: i32 = 100;
    pub const ONE: i32 = 10;

    /// Closed four: XOOOO_ or _OOOOX
    pub const BLOCKED_FOUR: i32 = 10_000;
    pub const BLOCKED_THREE: i32 = 100;
    pub const BLOCKED_TWO: i32 = 10;
    pub const BLOCKED_ONE: i32 = 1;
}

/// Score weights used by one cache/engine instance.
///
/// Passed by value so independent boards and engines never share mutable
/// scoring state. The classifier thresholds are read from the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTable {
    pub one: i32,
    pub two: i32,
    pub three: i32,
    pub four: i32,
    pub five: i32,
    pub blocked_one: i32,
    pub blocked_two: i32,
    pub blocked_three: i32,
    pub blocked_four: i32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            one: PatternScore::ONE,
            two: PatternScore::TWO,
            three: PatternScore::THREE,
            four: PatternScore::FOUR,
            five: PatternScore::FIVE,
            blocked_one: PatternScore::BLOCKED_ONE,
            blocked_two: PatternScore::BLOCKED_TWO,
            blocked_three: PatternScore::BLOCKED_THREE,
            blocked_four: PatternScore::BLOCKED_FOUR,
        }
    }
}

impl ScoreTable {
    /// Value returned for decided positions: larger than any sum of
    /// cell scores on a supported board.
    #[inline]
    pub fn win_value(&self) -> i32 {
        10 * self.five
    }

    /// Map a scanned run to its score.
    ///
    /// `gap` is the offset of the bridged empty cell counted from one end of
    /// the run, `None` when the run is solid. Branch order matters: a gap
    /// offset is matched from either end, nearest-to-the-edge first.
    pub fn count_to_score(&self, count: i32, block: i32, gap: Option<i32>) -> i32 {
        let empty = gap.unwrap_or(0);

        if empty <= 0 {
            if count >= 5 {
                return self.five;
            }
            match (block, count) {
                (0, 1) => return self.one,
                (0, 2) => return self.two,
                (0, 3) => return self.three,
                (0, 4) => return self.four,
                (1, 1) => return self.blocked_one,
                (1, 2) => return self.blocked_two,
                (1, 3) => return self.blocked_three,
                (1, 4) => return self.blocked_four,
                _ => {}
            }
        } else if empty == 1 || empty == count - 1 {
            // Gap next to an end stone: X_XXX
            if count >= 6 {
                return self.five;
            }
            match (block, count) {
                (0, 2) => return self.two / 2,
                (0, 3) => return self.three,
                (0, 4) => return self.blocked_four,
                (0, 5) => return self.four,
                (1, 2) => return self.blocked_two,
                (1, 3) => return self.blocked_three,
                (1, 4) | (1, 5) => return self.blocked_four,
                _ => {}
            }
        } else if empty == 2 || empty == count - 2 {
            if count >= 7 {
                return self.five;
            }
            match (block, count) {
                (0, 3) => return self.three,
                (0, 4) | (0, 5) => return self.blocked_four,
                (0, 6) => return self.four,
                (1, 3) => return self.blocked_three,
                (1, 4) | (1, 5) => return self.blocked_four,
                (1, 6) => return self.four,
                (2, 4..=6) => return self.blocked_four,
                _ => {}
            }
        } else if empty == 3 || empty == count - 3 {
            if count >= 8 {
                return self.five;
            }
            match (block, count) {
                (0, 4) | (0, 5) => return self.three,
                (0, 6) => return self.blocked_four,
                (0, 7) => return self.four,
                (1, 4..=6) => return self.blocked_four,
                (1, 7) => return self.four,
                (2, 4..=7) => return self.blocked_four,
                _ => {}
            }
        } else if empty == 4 || empty == count - 4 {
            if count >= 9 {
                return self.five;
            }
            // Only open runs score here; closed ones fall through to 0.
            if block == 0 && (5..=8).contains(&count) {
                return self.four;
            }
        } else if empty == 5 || empty == count - 5 {
            return self.five;
        }

        0
    }

    /// Rescale a cell's total so that lone blocked fours and open threes are
    /// not over-valued at the search horizon:
    /// blocked four < blocked four + three < two blocked fours < four.
    ///
    /// The thresholds are tunable, not derived.
    pub fn adjust(&self, score: i32) -> i32 {
        if self.blocked_four <= score && score < self.four {
            if score < self.blocked_four + self.three {
                // single blocked four
                return self.three;
            } else if score < self.blocked_four * 2 {
                // blocked four + open three
                return self.four;
            }
            // double blocked four
            return self.four * 2;
        }
        score
    }
}
