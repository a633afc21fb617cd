//! Automated play: drive a [`Game`] with two [`Player`]s.
//!
//! The driver goes through the same select-then-move protocol as an
//! interactive front end. An optional delay between the two steps paces the
//! game for display; the engine behaves the same with or without it.

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::board::Side;
use crate::error::MoveError;
use crate::game::{Game, MoveOutcome};
use crate::position::Position;

/// Something that picks a move for the side to move.
pub trait Player {
    /// `None` means the player has nothing to play.
    fn next_move(&mut self, game: &Game) -> Option<(Position, Position)>;
}

/// Replays a fixed list of moves, whether or not they are legal.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPlayer {
    moves: VecDeque<(Position, Position)>,
}

impl ScriptedPlayer {
    pub fn new(moves: impl IntoIterator<Item = (Position, Position)>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Player for ScriptedPlayer {
    fn next_move(&mut self, _game: &Game) -> Option<(Position, Position)> {
        self.moves.pop_front()
    }
}

/// Plays a uniformly random legal move.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl RandomPlayer {
    /// Deterministic player for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn next_move(&mut self, game: &Game) -> Option<(Position, Position)> {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.usize(..moves.len())])
    }
}

/// Result of a [`Driver::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverReport {
    /// Moves applied.
    pub moves: usize,
    pub captures: usize,
    /// Side that reached the center, if the game was decided.
    pub winner: Option<Side>,
    /// Side whose player had no move to offer.
    pub stalled: Option<Side>,
}

/// Alternates two players over a game.
pub struct Driver {
    white: Box<dyn Player>,
    black: Box<dyn Player>,
    delay: Duration,
}

impl Driver {
    pub fn new(white: Box<dyn Player>, black: Box<dyn Player>) -> Self {
        Self {
            white,
            black,
            delay: Duration::ZERO,
        }
    }

    /// Pause between selecting a piece and moving it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Ask the side to move for a move and submit it. Returns `Ok(None)` when
    /// that player has nothing to play.
    pub fn step(&mut self, game: &mut Game) -> Result<Option<MoveOutcome>, MoveError> {
        let player = match game.current_turn() {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        };
        let Some((from, to)) = player.next_move(game) else {
            return Ok(None);
        };

        game.select_position(from)?;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let outcome = game.attempt_move(to)?;
        debug!(side = %outcome.side, %from, %to, "driver move");
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(Some(outcome))
    }

    /// Play until someone wins, a player stalls, or `max_moves` moves have
    /// been applied.
    pub fn run(&mut self, game: &mut Game, max_moves: usize) -> Result<DriverReport, MoveError> {
        let mut report = DriverReport::default();
        while report.moves < max_moves {
            let side = game.current_turn();
            let Some(outcome) = self.step(game)? else {
                report.stalled = Some(side);
                break;
            };
            report.moves += 1;
            if outcome.captured.is_some() {
                report.captures += 1;
            }
            if let Some(winner) = outcome.winner {
                report.winner = Some(winner);
                break;
            }
        }
        info!(
            moves = report.moves,
            captures = report.captures,
            winner = ?report.winner,
            "driver finished"
        );
        Ok(report)
    }
}
