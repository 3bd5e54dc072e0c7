//! Monte-Carlo tree search (UCT) with tree reuse
//!
//! Each playout walks down the tree on a private copy of the position,
//! choosing the child with the best UCT value, expands the leaf it reaches,
//! finishes the game with a rollout policy and backs the result up with
//! alternating signs. The move returned is the most visited root child.
//!
//! The tree survives between moves: [`SearchStrategy::update_with_move`]
//! moves the root down to the played child. The engine also remembers which
//! position the root stands for and starts over when asked about a
//! different one.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, Move, Pos, Stone};
use crate::eval::{ScoreTable, ScoredBoard};
use crate::rules::check_winner;

use super::policy::{ExpansionPolicy, RolloutPolicy};
use super::tree::{NodeId, Tree};
use super::{SearchResult, SearchStrategy};

/// MCTS configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant in the UCT formula
    pub c_puct: f64,
    /// Playouts per move request
    pub playouts: u32,
    /// Moves a single rollout may play before it is scored as a draw
    pub rollout_limit: usize,
    pub expansion: ExpansionPolicy,
    pub rollout: RolloutPolicy,
    /// Stop early once this much time has passed
    pub time_limit: Option<Duration>,
    /// Fixed RNG seed for reproducible searches
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            c_puct: 5.0,
            playouts: 2000,
            rollout_limit: 1000,
            expansion: ExpansionPolicy::Uniform,
            rollout: RolloutPolicy::Random,
            time_limit: None,
            seed: None,
        }
    }
}

/// UCT search engine.
#[derive(Debug)]
pub struct Mcts {
    config: MctsConfig,
    table: ScoreTable,
    tree: Tree,
    rng: StdRng,
    /// Position the tree root describes, side to move included
    root_board: Option<Board>,
}

impl Mcts {
    #[must_use]
    pub fn new(config: MctsConfig, table: ScoreTable) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            table,
            tree: Tree::new(),
            rng,
            root_board: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Drop all statistics.
    pub fn reset(&mut self) {
        self.tree = Tree::new();
        self.root_board = None;
    }

    /// Point the tree at `board`, keeping it only if it already describes
    /// that position.
    fn prepare(&mut self, board: &Board) {
        match &self.root_board {
            Some(known) if known.same_position(board) => {
                log::debug!(
                    "reusing tree: {} nodes, {} root visits",
                    self.tree.len(),
                    self.tree.root().visits()
                );
            }
            Some(_) => {
                log::debug!("position changed since the last search, discarding tree");
                self.tree = Tree::new();
            }
            None => {
                self.tree = Tree::new();
            }
        }
        self.root_board = Some(board.clone());
    }

    /// Run one simulation from `root`, which must match the tree root.
    pub fn playout(&mut self, root: &ScoredBoard) {
        let mut scored = root.clone();
        let mut node = Tree::ROOT;
        let mut last = scored.board().last_move().map(|record| record.pos);

        while let Some((pos, child)) = self.tree.select(node, self.config.c_puct) {
            let color = scored.board().current_player();
            if let Err(err) = scored.play(pos, color) {
                log::error!("tree move {pos} is not playable: {err}");
                return;
            }
            last = Some(pos);
            node = child;
        }

        let board = scored.board();
        let decided = last.is_some_and(|pos| board.is_win(pos, board.get(pos)));
        if !decided {
            let priors = self
                .config
                .expansion
                .priors(&scored, board.current_player());
            self.tree.expand(node, priors);
        }

        let leaf_value = self.rollout(scored.into_board(), last);
        self.tree.update_recursive(node, -leaf_value);
    }

    /// Finish the game from `board` and score it for the side to move
    /// there: 1 for a win, -1 for a loss, 0 for a draw or when the move
    /// limit runs out.
    fn rollout(&mut self, mut board: Board, mut last: Option<Pos>) -> f64 {
        let player = board.current_player();
        let outcome = |board: &Board, last: Option<Pos>| {
            last.and_then(|pos| {
                let color = board.get(pos);
                board
                    .is_win(pos, color)
                    .then_some(if color == player { 1.0 } else { -1.0 })
            })
        };

        for _ in 0..self.config.rollout_limit {
            if let Some(value) = outcome(&board, last) {
                return value;
            }
            let color = board.current_player();
            let Some(pos) = self.config.rollout.choose(&board, color, &mut self.rng) else {
                return 0.0;
            };
            if let Err(err) = board.place(pos, color) {
                log::error!("rollout move {pos} is not playable: {err}");
                return 0.0;
            }
            last = Some(pos);
        }

        if let Some(value) = outcome(&board, last) {
            return value;
        }
        if board.is_full() {
            return 0.0;
        }
        log::warn!("rollout reached move limit ({})", self.config.rollout_limit);
        0.0
    }

    fn log_root(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let root = self.tree.root();
        let mut children: Vec<(Pos, NodeId)> = root.children().to_vec();
        children.sort_by_key(|&(_, id)| std::cmp::Reverse(self.tree.node(id).visits()));
        let top: Vec<String> = children
            .iter()
            .take(5)
            .map(|&(pos, id)| {
                let node = self.tree.node(id);
                format!("{pos} n={} q={:.3}", node.visits(), node.q())
            })
            .collect();
        log::debug!(
            "root: {} visits, {} nodes; top: {}",
            root.visits(),
            self.tree.len(),
            top.join(", ")
        );
    }
}

impl SearchStrategy for Mcts {
    fn name(&self) -> &'static str {
        "mcts"
    }

    /// Run the configured playouts (at least one, fewer if the time limit
    /// hits) and return the most visited root move.
    fn get_move_with_stats(&mut self, board: &Board, color: Stone) -> SearchResult {
        let mut root = board.clone();
        root.set_current_player(color);

        if check_winner(&root).is_some() || root.is_full() {
            self.reset();
            return SearchResult::pass(0, 0);
        }

        self.prepare(&root);
        let scored = ScoredBoard::new(root, self.table);

        let start = Instant::now();
        let mut done: u64 = 0;
        while done < u64::from(self.config.playouts.max(1)) {
            if done > 0 {
                if let Some(limit) = self.config.time_limit {
                    if start.elapsed() >= limit {
                        log::debug!("time limit reached after {done} playouts");
                        break;
                    }
                }
            }
            self.playout(&scored);
            done += 1;
        }
        self.log_root();

        let best_move = self.report_best_move_so_far();
        let score = match best_move {
            Move::Play(pos) => self
                .tree
                .child(Tree::ROOT, pos)
                .map_or(0, |id| self.tree.node(id).visits() as i32),
            Move::Pass => 0,
        };
        SearchResult {
            best_move,
            score,
            nodes: done,
        }
    }

    /// Most visited root child of the current tree.
    fn report_best_move_so_far(&self) -> Move {
        self.tree
            .most_visited(Tree::ROOT)
            .map_or(Move::Pass, |(pos, _)| Move::Play(pos))
    }

    fn update_with_move(&mut self, mv: Move) {
        match (mv, self.root_board.take()) {
            (Move::Play(pos), Some(mut board)) => {
                let color = board.current_player();
                match board.place(pos, color) {
                    Ok(()) => {
                        if self.tree.reroot(pos) {
                            log::debug!("kept subtree under {pos}: {} nodes", self.tree.len());
                        } else {
                            log::debug!("{pos} was never expanded, starting a fresh tree");
                        }
                        self.root_board = Some(board);
                    }
                    Err(err) => {
                        log::warn!("cannot follow {pos} in the search tree: {err}");
                        self.tree = Tree::new();
                    }
                }
            }
            _ => self.tree = Tree::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(playouts: u32) -> MctsConfig {
        MctsConfig {
            playouts,
            seed: Some(42),
            ..MctsConfig::default()
        }
    }

    fn board_with(size: usize, stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::with_size(size).unwrap();
        for &(row, col, color) in stones {
            board.place(Pos::new(row, col), color).unwrap();
        }
        board
    }

    #[test]
    fn test_get_move_is_legal_and_board_untouched() {
        let board = board_with(5, &[(2, 2, Stone::Black), (1, 1, Stone::White)]);
        let before = board.clone();
        let mut mcts = Mcts::new(seeded(300), ScoreTable::default());

        let result = mcts.get_move_with_stats(&board, Stone::Black);
        let pos = result.best_move.pos().unwrap();
        assert!(board.is_empty(pos));
        assert_eq!(board, before);
        assert_eq!(board.history(), before.history());
        assert_eq!(result.nodes, 300);
        assert_eq!(mcts.tree().root().visits(), 300);
        assert_eq!(mcts.report_best_move_so_far(), result.best_move);
    }

    #[test]
    fn test_tiered_expansion_only_offers_neighbours() {
        let board = board_with(7, &[(3, 3, Stone::Black)]);
        let config = MctsConfig {
            expansion: ExpansionPolicy::Tiered,
            ..seeded(2000)
        };
        let mut mcts = Mcts::new(config, ScoreTable::default());
        let pos = mcts.get_move(&board, Stone::White).pos().unwrap();
        assert!(board.neighbors(Pos::new(3, 3)).any(|n| n == pos), "{pos}");
        assert_eq!(mcts.tree().root().children().len(), 8);
    }

    #[test]
    fn test_uniform_search_favours_cells_next_to_stone() {
        let centre = Pos::new(3, 3);
        let board = board_with(7, &[(3, 3, Stone::Black)]);
        let adjacent: Vec<Pos> = board.neighbors(centre).collect();
        let edge: Vec<Pos> = board
            .legal_moves()
            .into_iter()
            .filter(|p| p.row == 0 || p.col == 0 || p.row == 6 || p.col == 6)
            .collect();
        assert_eq!(adjacent.len(), 8);
        assert_eq!(edge.len(), 24);

        // Single seeds are noisy; compare visits summed over several
        let (mut adjacent_visits, mut edge_visits) = (0u64, 0u64);
        for seed in 1..=5 {
            let config = MctsConfig {
                seed: Some(seed),
                ..MctsConfig::default()
            };
            let mut mcts = Mcts::new(config, ScoreTable::default());
            let result = mcts.get_move_with_stats(&board, Stone::White);
            assert_eq!(result.nodes, 2000);

            let tree = mcts.tree();
            let visits = |pos: &Pos| {
                tree.child(Tree::ROOT, *pos)
                    .map_or(0, |id| u64::from(tree.node(id).visits()))
            };
            adjacent_visits += adjacent.iter().map(visits).sum::<u64>();
            edge_visits += edge.iter().map(visits).sum::<u64>();
        }

        let adjacent_mean = adjacent_visits as f64 / adjacent.len() as f64;
        let edge_mean = edge_visits as f64 / edge.len() as f64;
        assert!(
            adjacent_mean > edge_mean,
            "adjacent {adjacent_mean:.1} vs edge {edge_mean:.1}"
        );
    }

    #[test]
    fn test_finds_immediate_win() {
        let board = board_with(
            5,
            &[
                (2, 0, Stone::Black),
                (0, 0, Stone::White),
                (2, 1, Stone::Black),
                (0, 1, Stone::White),
                (2, 2, Stone::Black),
                (4, 4, Stone::White),
                (2, 3, Stone::Black),
                (4, 3, Stone::White),
            ],
        );
        let mut mcts = Mcts::new(seeded(1000), ScoreTable::default());
        assert_eq!(mcts.get_move(&board, Stone::Black), Move::Play(Pos::new(2, 4)));
    }

    #[test]
    fn test_rule_based_rollouts_block_win() {
        let board = board_with(
            5,
            &[
                (0, 0, Stone::Black),
                (4, 0, Stone::White),
                (0, 1, Stone::Black),
                (4, 1, Stone::White),
                (0, 2, Stone::Black),
                (4, 2, Stone::White),
                (0, 3, Stone::Black),
            ],
        );
        let config = MctsConfig {
            rollout: RolloutPolicy::RuleBased,
            expansion: ExpansionPolicy::Tiered,
            ..seeded(200)
        };
        let mut mcts = Mcts::new(config, ScoreTable::default());
        // White must block the open end of Black's four
        assert_eq!(mcts.get_move(&board, Stone::White), Move::Play(Pos::new(0, 4)));
    }

    #[test]
    fn test_update_with_move_reuses_subtree() {
        let board = board_with(5, &[(2, 2, Stone::Black)]);
        let mut mcts = Mcts::new(seeded(400), ScoreTable::default());
        let mv = mcts.get_move(&board, Stone::White);
        let pos = mv.pos().unwrap();
        let child = mcts.tree().child(Tree::ROOT, pos).unwrap();
        let child_visits = mcts.tree().node(child).visits();
        assert!(child_visits > 0);

        mcts.update_with_move(mv);
        assert_eq!(mcts.tree().root().visits(), child_visits);
        assert_eq!(mcts.tree().root().parent(), None);

        // Searching the position after the move continues the same tree
        let mut next = board.clone();
        next.place(pos, Stone::White).unwrap();
        let result = mcts.get_move_with_stats(&next, Stone::Black);
        assert_eq!(result.nodes, 400);
        assert_eq!(mcts.tree().root().visits(), child_visits + 400);
    }

    #[test]
    fn test_unexpanded_move_and_pass_reset_tree() {
        let board = board_with(5, &[(2, 2, Stone::Black)]);
        let mut mcts = Mcts::new(seeded(50), ScoreTable::default());
        mcts.get_move(&board, Stone::White);
        mcts.update_with_move(Move::Pass);
        assert_eq!(mcts.tree(), &Tree::new());

        // An occupied cell cannot be followed
        mcts.get_move(&board, Stone::White);
        mcts.update_with_move(Move::Play(Pos::new(2, 2)));
        assert_eq!(mcts.tree(), &Tree::new());
        assert_eq!(mcts.report_best_move_so_far(), Move::Pass);
    }

    #[test]
    fn test_different_position_discards_tree() {
        let mut mcts = Mcts::new(seeded(100), ScoreTable::default());
        let first = board_with(5, &[(2, 2, Stone::Black)]);
        mcts.get_move(&first, Stone::White);

        let second = board_with(5, &[(0, 0, Stone::Black)]);
        mcts.get_move(&second, Stone::White);
        assert_eq!(mcts.tree().root().visits(), 100);

        // Same position again keeps accumulating
        mcts.get_move(&second, Stone::White);
        assert_eq!(mcts.tree().root().visits(), 200);
    }

    #[test]
    fn test_time_limit_still_runs_one_playout() {
        let config = MctsConfig {
            time_limit: Some(Duration::ZERO),
            ..seeded(1000)
        };
        let mut mcts = Mcts::new(config, ScoreTable::default());
        let result = mcts.get_move_with_stats(&Board::new(), Stone::Black);
        assert_eq!(result.nodes, 1);
        assert!(!result.best_move.is_pass());
    }

    #[test]
    fn test_finished_games_pass() {
        let mut mcts = Mcts::new(seeded(10), ScoreTable::default());
        let won = board_with(
            5,
            &[
                (1, 0, Stone::White),
                (1, 1, Stone::White),
                (1, 2, Stone::White),
                (1, 3, Stone::White),
                (1, 4, Stone::White),
            ],
        );
        assert_eq!(mcts.get_move(&won, Stone::Black), Move::Pass);

        let mut full = Board::with_size(2).unwrap();
        for pos in full.legal_moves() {
            let color = full.current_player();
            full.place(pos, color).unwrap();
        }
        assert_eq!(mcts.get_move(&full, Stone::Black), Move::Pass);
    }

    #[test]
    fn test_rollout_scores() {
        let mut mcts = Mcts::new(seeded(1), ScoreTable::default());
        let mut board = board_with(
            5,
            &[
                (1, 0, Stone::White),
                (1, 1, Stone::White),
                (1, 2, Stone::White),
                (1, 3, Stone::White),
            ],
        );
        board.place(Pos::new(1, 4), Stone::White).unwrap();
        board.set_current_player(Stone::Black);
        // White just won, Black is to move
        assert_eq!(mcts.rollout(board.clone(), Some(Pos::new(1, 4))), -1.0);

        let limited = MctsConfig {
            rollout_limit: 0,
            ..seeded(1)
        };
        let mut mcts = Mcts::new(limited, ScoreTable::default());
        assert_eq!(mcts.rollout(Board::new(), None), 0.0);
    }
}
