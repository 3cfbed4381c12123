//! Plays one game of flipper chess between two thinking-tree players and
//! prints the game record.

use std::time::Duration;

use clap::Parser;
use flipper::chess::position::Position;
use flipper::evaluation::Evaluation;
use flipper::game::{Game, TurnResolver};
use flipper::search::player::TreePlayer;
use flipper::search::SearchConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

/// Self-play of two search-backed players under the coin flip rules.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Chance of each proposed move to succeed.
    #[arg(long, default_value_t = 0.5)]
    probability: f64,

    /// Thinking time of White for each position, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    white_think_ms: u64,

    /// Thinking time of Black for each position, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    black_think_ms: u64,

    /// Share of the exploration that goes to the best-looking move.
    #[arg(long, default_value_t = 0.5)]
    search_bias: f64,

    /// Expected success chance of the proposals used by the search.
    #[arg(long, default_value_t = 0.5)]
    play_bias: f64,

    /// Value of a lost game, in pawns.
    #[arg(long, default_value_t = 100.0)]
    loss_value: f64,

    #[arg(long, value_enum, default_value_t = Evaluation::Positional)]
    white_eval: Evaluation,

    #[arg(long, value_enum, default_value_t = Evaluation::Positional)]
    black_eval: Evaluation,

    /// Seed of the coin flips.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop the game unfinished after this many played moves.
    #[arg(long, default_value_t = 300)]
    max_plies: usize,

    /// Starting position, the standard one if omitted.
    #[arg(long)]
    fen: Option<String>,
}

impl Config {
    fn search_config(&self, think_ms: u64) -> anyhow::Result<SearchConfig> {
        SearchConfig::new(
            self.search_bias,
            self.play_bias,
            Duration::from_millis(think_ms),
            self.loss_value,
        )
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    flipper::print_engine_info();
    flipper::print_binary_info();

    let start = match &config.fen {
        Some(fen) => Position::try_from(fen.as_str())?,
        None => Position::starting(),
    };
    let resolver = TurnResolver::new(config.probability, StdRng::seed_from_u64(config.seed))?;
    let mut game = Game::new(start, resolver);
    let mut white = TreePlayer::new(
        config.search_config(config.white_think_ms)?,
        config.white_eval.function(),
    );
    let mut black = TreePlayer::new(
        config.search_config(config.black_think_ms)?,
        config.black_eval.function(),
    );

    let outcome = game.play(&mut white, &mut black, config.max_plies)?;

    print!("{}", game.record());
    println!("Final position: {}", game.position());
    match outcome {
        Some(outcome) => println!("Result: {outcome}"),
        None => println!("Result: unfinished after {} moves", game.plies()),
    }
    Ok(())
}
