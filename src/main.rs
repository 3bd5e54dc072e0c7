//! Self-play driver
//!
//! Pits the alpha-beta engine against MCTS on one board and prints every
//! position until someone wins or the board fills up.

use std::time::Duration;

use clap::Parser;
use gomoku::search::{ExpansionPolicy, MctsConfig, RolloutPolicy, SearchConfig};
use gomoku::{AIEngine, Board, Move, Stone};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board side length (2-19)
    #[arg(long, default_value_t = 7)]
    size: usize,

    /// Depth handed to each alpha-beta root move
    #[arg(long, default_value_t = 40)]
    depth: i32,

    /// MCTS playouts per move
    #[arg(long, default_value_t = 2000)]
    playouts: u32,

    /// MCTS time limit per move in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// Expand MCTS nodes with candidate tiers instead of every empty cell
    #[arg(long)]
    tiered: bool,

    /// Use forcing moves in MCTS rollouts
    #[arg(long)]
    rule_rollouts: bool,

    /// RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Let MCTS play Black
    #[arg(long)]
    mcts_black: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .init();

    let mut board = Board::with_size(args.size)?;

    let alpha_beta = AIEngine::alpha_beta(SearchConfig {
        max_depth: args.depth,
        ..SearchConfig::default()
    });
    let mcts = AIEngine::mcts(MctsConfig {
        playouts: args.playouts,
        time_limit: args.time_ms.map(Duration::from_millis),
        expansion: if args.tiered {
            ExpansionPolicy::Tiered
        } else {
            ExpansionPolicy::Uniform
        },
        rollout: if args.rule_rollouts {
            RolloutPolicy::RuleBased
        } else {
            RolloutPolicy::Random
        },
        seed: args.seed,
        ..MctsConfig::default()
    });

    let (mut black, mut white) = if args.mcts_black {
        (mcts, alpha_beta)
    } else {
        (alpha_beta, mcts)
    };
    log::info!(
        "{}x{} board, {} (X) vs {} (O)",
        args.size,
        args.size,
        black.name(),
        white.name()
    );

    loop {
        let color = board.current_player();
        let engine = if color == Stone::Black { &mut black } else { &mut white };
        let result = engine.get_move_with_stats(&board, color);

        let Move::Play(pos) = result.best_move else {
            println!("{color:?} passes");
            break;
        };
        board.place(pos, color)?;
        black.update_with_move(result.best_move);
        white.update_with_move(result.best_move);

        println!("{color:?} {pos} ({}ms, {} nodes)", result.time_ms, result.nodes);
        println!("{board}");

        if board.is_win(pos, color) {
            println!("{color:?} wins");
            break;
        }
        if board.is_full() {
            println!("Draw");
            break;
        }
    }

    Ok(())
}
