//! Jeson Mor engine.
//!
//! ## Usage
//!
//! - `jeson-mor` - Show a demo
//! - `jeson-mor protocol` - Read commands from stdin for a front end
//! - `jeson-mor selfplay` - Let two random movers play each other
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jeson_mor::constants::{DEFAULT_SIZE, MAX_SELFPLAY_MOVES};
use jeson_mor::driver::{Driver, RandomPlayer};
use jeson_mor::game::Game;
use jeson_mor::position::Position;
use jeson_mor::protocol::ProtocolEngine;

/// Jeson Mor: the Mongolian knights game
#[derive(Parser)]
#[command(name = "jeson-mor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size (odd, at least 5)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the text protocol on stdin/stdout
    Protocol,
    /// Play a few scripted moves and print the board
    Demo,
    /// Two random movers play one game
    Selfplay {
        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves
        #[arg(long, default_value_t = MAX_SELFPLAY_MOVES)]
        max_moves: usize,
        /// Pause between steps, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let game = Game::new(cli.size)
        .with_context(|| format!("cannot start a game on size {}", cli.size))?;

    match cli.command {
        Some(Commands::Protocol) => {
            let mut engine = ProtocolEngine::with_game(game);
            engine
                .run(io::stdin().lock(), io::stdout().lock())
                .context("protocol loop failed")?;
        }
        Some(Commands::Selfplay {
            seed,
            max_moves,
            delay_ms,
        }) => run_selfplay(game, seed, max_moves, Duration::from_millis(delay_ms))?,
        Some(Commands::Demo) | None => run_demo(game)?,
    }
    Ok(())
}

fn run_demo(mut game: Game) -> Result<()> {
    println!("Jeson Mor on a {0}x{0} board\n", game.size());
    println!("{}", game.grid());

    let from = Position::new(1, 1);
    let to = Position::new(3, 2);
    game.select_position(from)
        .with_context(|| format!("selecting {from}"))?;
    let outcome = game.attempt_move(to).with_context(|| format!("moving to {to}"))?;
    println!("{} moved {} -> {}", outcome.side, outcome.from, outcome.to);
    println!("{}", game.grid());

    match game.attempt_move(to) {
        Ok(_) => println!("unexpected: move accepted without a selection"),
        Err(e) => println!("second move rejected ({}): {e}", e.code()),
    }
    println!("{} to move", game.current_turn());
    Ok(())
}

fn run_selfplay(
    mut game: Game,
    seed: Option<u64>,
    max_moves: usize,
    delay: Duration,
) -> Result<()> {
    let (white, black) = match seed {
        Some(s) => (
            RandomPlayer::with_seed(s),
            RandomPlayer::with_seed(s.wrapping_add(1)),
        ),
        None => (RandomPlayer::default(), RandomPlayer::default()),
    };
    let mut driver = Driver::new(Box::new(white), Box::new(black)).with_delay(delay);
    let report = driver.run(&mut game, max_moves).context("self-play stopped")?;

    println!("{}", game.grid());
    println!("moves: {}  captures: {}", report.moves, report.captures);
    match (report.winner, report.stalled) {
        (Some(winner), _) => println!("{winner} reached the center"),
        (None, Some(side)) => println!("{side} had no legal move"),
        (None, None) => println!("no winner after {max_moves} moves"),
    }
    Ok(())
}
