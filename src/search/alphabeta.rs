//! Negamax alpha-beta search over tiered candidates
//!
//! The search runs on a [`ScoredBoard`], so every play and undo refreshes
//! the pattern cache. Leaves are scored with the cache's point estimation;
//! a node whose last move made five is scored as lost for the side to move.
//!
//! Depth is the only termination control. With [`DepthPolicy::Narrowing`]
//! each ply spends `min(10, candidates)` depth, so forcing lines with one or
//! two candidates run deep while quiet positions are cut off quickly.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::eval::ScoreTable;
//! use gomoku::search::Searcher;
//!
//! let mut board = Board::new();
//! for col in 0..4 {
//!     board.place(Pos::new(3, col), Stone::Black).unwrap();
//!     board.place(Pos::new(6, 2 * col), Stone::White).unwrap();
//! }
//!
//! let mut searcher = Searcher::new(ScoreTable::default());
//! let result = searcher.solve(&board, Stone::Black);
//! assert_eq!(result.best_move.pos(), Some(Pos::new(3, 4)));
//! ```

use crate::board::{Board, Move, Pos, Stone};
use crate::eval::{ScoreTable, ScoredBoard};
use crate::rules::check_winner;

use super::candidates::{classify, DEFAULT_LIMIT};
use super::{SearchResult, SearchStrategy};

/// Largest depth charge per ply under [`DepthPolicy::Narrowing`]
const MAX_PLY_COST: usize = 10;

/// How much depth a ply consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthPolicy {
    /// `min(10, candidates)` per ply
    Narrowing,
    /// One per ply
    Fixed,
}

impl DepthPolicy {
    #[inline]
    fn remaining(self, depth: i32, width: usize) -> i32 {
        match self {
            DepthPolicy::Narrowing => depth - width.min(MAX_PLY_COST) as i32,
            DepthPolicy::Fixed => depth - 1,
        }
    }
}

/// Where moves at each node come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// The candidate classifier's most urgent tier
    Tiered,
    /// Every empty cell in row-major order
    Exhaustive,
}

/// Alpha-beta configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth handed to each root child
    pub max_depth: i32,
    pub depth_policy: DepthPolicy,
    pub move_source: MoveSource,
    /// Cap on the quiet candidate tier
    pub candidate_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 40,
            depth_policy: DepthPolicy::Narrowing,
            move_source: MoveSource::Tiered,
            candidate_limit: DEFAULT_LIMIT,
        }
    }
}

/// Exact game-theoretic result from [`Searcher::solve_boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Loss,
    Draw,
    Win,
}

impl Outcome {
    /// The same result seen from the other side
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
            Outcome::Win => Outcome::Loss,
        }
    }
}

/// Negamax searcher.
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    table: ScoreTable,
    nodes: u64,
    /// Best root move found by the current or last `solve`
    best_so_far: Move,
}

impl Searcher {
    /// Searcher with the default configuration.
    #[must_use]
    pub fn new(table: ScoreTable) -> Self {
        Self::with_config(SearchConfig::default(), table)
    }

    #[must_use]
    pub fn with_config(config: SearchConfig, table: ScoreTable) -> Self {
        Self {
            config,
            table,
            nodes: 0,
            best_so_far: Move::Pass,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Nodes visited by the last `solve`/`solve_boolean`
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Moves to try for `color`, in search order.
    fn moves(&self, scored: &ScoredBoard, color: Stone) -> Vec<Pos> {
        match self.config.move_source {
            MoveSource::Tiered => {
                classify(scored.board(), scored.cache(), color, self.config.candidate_limit)
                    .positions()
                    .collect()
            }
            MoveSource::Exhaustive => scored.board().legal_moves(),
        }
    }

    /// Root moves, logged with their scores at debug level.
    fn root_moves(&self, scored: &ScoredBoard, color: Stone) -> Vec<Pos> {
        if self.config.move_source == MoveSource::Exhaustive {
            return scored.board().legal_moves();
        }
        let candidates = classify(
            scored.board(),
            scored.cache(),
            color,
            self.config.candidate_limit,
        );
        if log::log_enabled!(log::Level::Debug) {
            let listed: Vec<String> = candidates
                .moves
                .iter()
                .map(|c| format!("{} {}/{}", c.pos, c.mine, c.theirs))
                .collect();
            log::debug!(
                "{color:?} candidates ({:?}): {}",
                candidates.tier,
                listed.join(", ")
            );
        }
        candidates.positions().collect()
    }

    /// Take back a move this searcher just played.
    fn retract(scored: &mut ScoredBoard, pos: Pos) {
        if let Err(err) = scored.undo(pos) {
            log::error!("failed to undo {pos}: {err}");
        }
    }

    /// Negamax value of the position reached by `last`, for `color` to
    /// move, within the `(alpha, beta)` window.
    ///
    /// Fail-hard: a cutoff returns `beta`, an all-fail node returns `alpha`.
    /// Siblings are tried in candidate order and the first to reach a new
    /// best wins ties.
    pub fn search(
        &mut self,
        scored: &mut ScoredBoard,
        last: Pos,
        color: Stone,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        let last_color = scored.board().get(last);
        if scored.board().is_win(last, last_color) {
            return -self.table.win_value();
        }
        if depth <= 0 {
            return scored.evaluate(color);
        }

        let moves = self.moves(scored, color);
        if moves.is_empty() {
            return 0;
        }
        let depth = self.config.depth_policy.remaining(depth, moves.len());

        for pos in moves {
            if let Err(err) = scored.play(pos, color) {
                log::error!("candidate {pos} is not playable: {err}");
                continue;
            }
            let value = -self.search(scored, pos, color.opponent(), depth, -beta, -alpha);
            Self::retract(scored, pos);

            if value > alpha {
                alpha = value;
            }
            if value >= beta {
                return beta;
            }
        }
        alpha
    }

    /// Choose a move for `color`.
    ///
    /// Returns the centre on a board with at most one stone, `Move::Pass`
    /// when the game is already decided or nothing is playable, and
    /// otherwise the best root candidate (the first one if every move
    /// loses).
    pub fn solve(&mut self, board: &Board, color: Stone) -> SearchResult {
        self.nodes = 0;
        self.best_so_far = Move::Pass;
        let win = self.table.win_value();

        if let Some(winner) = check_winner(board) {
            let score = if winner == color { win } else { -win };
            return SearchResult::pass(score, 0);
        }

        let mut scored = ScoredBoard::new(board.clone(), self.table);
        let moves = self.root_moves(&scored, color);
        let Some(&first) = moves.first() else {
            return SearchResult::pass(0, 0);
        };

        let center = board.center();
        if board.stone_count() <= 1 && board.is_empty(center) {
            self.best_so_far = Move::Play(center);
            return SearchResult {
                best_move: Move::Play(center),
                score: 1,
                nodes: 0,
            };
        }

        let (mut alpha, beta) = (-win, win);
        let mut best = first;
        self.best_so_far = Move::Play(best);

        for pos in moves {
            if let Err(err) = scored.play(pos, color) {
                log::error!("candidate {pos} is not playable: {err}");
                continue;
            }
            let value = -self.search(
                &mut scored,
                pos,
                color.opponent(),
                self.config.max_depth,
                -beta,
                -alpha,
            );
            Self::retract(&mut scored, pos);
            log::trace!("{pos}: {value}");

            if value > alpha {
                alpha = value;
                best = pos;
                self.best_so_far = Move::Play(best);
            }
            if value >= beta {
                self.best_so_far = Move::Play(pos);
                return SearchResult {
                    best_move: Move::Play(pos),
                    score: beta,
                    nodes: self.nodes,
                };
            }
        }

        SearchResult {
            best_move: Move::Play(best),
            score: alpha,
            nodes: self.nodes,
        }
    }

    /// Prove whether `color` wins, draws or loses with best play over the
    /// candidate moves, with no depth limit.
    ///
    /// Stops at the first winning move. The returned move is `Move::Pass`
    /// only when the game is already over or the board is full.
    pub fn solve_boolean(&mut self, board: &Board, color: Stone) -> (Outcome, Move) {
        self.nodes = 0;
        if let Some(winner) = check_winner(board) {
            let outcome = if winner == color { Outcome::Win } else { Outcome::Loss };
            return (outcome, Move::Pass);
        }
        let mut scored = ScoredBoard::new(board.clone(), self.table);
        self.prove(&mut scored, None, color)
    }

    fn prove(&mut self, scored: &mut ScoredBoard, last: Option<Pos>, color: Stone) -> (Outcome, Move) {
        self.nodes += 1;

        if let Some(last) = last {
            if scored.board().is_win(last, scored.board().get(last)) {
                return (Outcome::Loss, Move::Pass);
            }
        }

        let moves = self.moves(scored, color);
        let Some(&first) = moves.first() else {
            return (Outcome::Draw, Move::Pass);
        };

        let mut best = (Outcome::Loss, Move::Play(first));
        for pos in moves {
            if let Err(err) = scored.play(pos, color) {
                log::error!("candidate {pos} is not playable: {err}");
                continue;
            }
            let (reply, _) = self.prove(scored, Some(pos), color.opponent());
            Self::retract(scored, pos);

            let outcome = reply.reverse();
            if outcome == Outcome::Win {
                return (outcome, Move::Play(pos));
            }
            if outcome > best.0 {
                best = (outcome, Move::Play(pos));
            }
        }
        best
    }
}

impl SearchStrategy for Searcher {
    fn name(&self) -> &'static str {
        "alphabeta"
    }

    fn get_move_with_stats(&mut self, board: &Board, color: Stone) -> SearchResult {
        self.solve(board, color)
    }

    fn report_best_move_so_far(&self) -> Move {
        self.best_so_far
    }

    fn update_with_move(&mut self, _mv: Move) {}
}
