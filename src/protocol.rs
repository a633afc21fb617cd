//! Line-oriented text protocol for driving the engine from another process.
//!
//! The framing follows GTP: an optional numeric id, a command and its
//! arguments per line; `=` answers success and `?` failure, each answer
//! followed by a blank line. Coordinates are written `row:col`.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `boardsize <n>` - Start a new game on an `n`x`n` board
//! - `reset` - Back to the starting layout
//! - `select <r:c>` - Choose a piece of the side to move
//! - `move <r:c>` - Move the selected piece
//! - `click <r:c>` - `select` or `move` depending on the phase
//! - `play <r:c> <r:c>` - Move without a prior selection
//! - `cancel` - Drop the current selection
//! - `turn` - Side to move
//! - `situation` - Piece positions of both sides
//! - `legal_moves` - Every move the side to move could play
//! - `showboard` - Text rendering of the board
//!
//! ## Example
//!
//! ```
//! use jeson_mor::protocol::ProtocolEngine;
//!
//! let mut engine = ProtocolEngine::new();
//! let mut out = Vec::new();
//! engine.run("select 1:1\nmove 3:2\nturn\n".as_bytes(), &mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("= black"));
//! ```

use std::io::{self, BufRead, Write};

use crate::constants::{ENGINE_NAME, PROTOCOL_VERSION};
use crate::error::MoveError;
use crate::game::{Game, MoveOutcome};
use crate::position::{Position, parse_coord, str_coord};

/// The list of known protocol commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "cancel",
    "click",
    "known_command",
    "legal_moves",
    "list_commands",
    "move",
    "name",
    "play",
    "protocol_version",
    "quit",
    "reset",
    "select",
    "showboard",
    "situation",
    "turn",
    "version",
];

/// Protocol engine state.
#[derive(Default)]
pub struct ProtocolEngine {
    game: Game,
}

impl ProtocolEngine {
    /// Engine on the default 9x9 board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn coord_arg(args: &[&str], i: usize) -> Result<Position, String> {
        let arg = args.get(i).ok_or_else(|| "missing argument".to_string())?;
        parse_coord(arg).ok_or_else(|| format!("invalid coordinate {arg}"))
    }

    fn rejection(err: &MoveError) -> (bool, String) {
        (false, format!("{} {err}", err.code()))
    }

    fn format_outcome(outcome: &MoveOutcome) -> String {
        let mut s = format!("{} {}", str_coord(outcome.from), str_coord(outcome.to));
        if outcome.captured.is_some() {
            s.push_str(" capture");
        }
        if let Some(winner) = outcome.winner {
            s.push_str(&format!(" win {winner}"));
        }
        s
    }

    fn format_positions(positions: &[Position]) -> String {
        positions
            .iter()
            .map(|&p| str_coord(p))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, ENGINE_NAME.to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, PROTOCOL_VERSION.to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&arg.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                match Game::new(size) {
                    Ok(game) => {
                        self.game = game;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "reset" => {
                self.game.reset();
                (true, String::new())
            }

            "select" => match Self::coord_arg(args, 0) {
                Ok(pos) => match self.game.select_position(pos) {
                    Ok(pos) => (true, str_coord(pos)),
                    Err(e) => Self::rejection(&e),
                },
                Err(msg) => (false, msg),
            },

            "move" => match Self::coord_arg(args, 0) {
                Ok(pos) => match self.game.attempt_move(pos) {
                    Ok(outcome) => (true, Self::format_outcome(&outcome)),
                    Err(e) => Self::rejection(&e),
                },
                Err(msg) => (false, msg),
            },

            "click" => match Self::coord_arg(args, 0) {
                Ok(pos) => match self.game.click(pos) {
                    Ok(Some(outcome)) => (true, Self::format_outcome(&outcome)),
                    Ok(None) => (true, str_coord(pos)),
                    Err(e) => Self::rejection(&e),
                },
                Err(msg) => (false, msg),
            },

            "play" => {
                let coords = Self::coord_arg(args, 0).and_then(|from| {
                    Self::coord_arg(args, 1).map(|to| (from, to))
                });
                match coords {
                    Ok((from, to)) => match self.game.make_move(from, to) {
                        Ok(outcome) => (true, Self::format_outcome(&outcome)),
                        Err(e) => Self::rejection(&e),
                    },
                    Err(msg) => (false, msg),
                }
            }

            "cancel" => match self.game.cancel_selection() {
                Some(pos) => (true, str_coord(pos)),
                None => (true, String::new()),
            },

            "turn" => (true, self.game.current_turn().to_string()),

            "situation" => {
                let situation = self.game.situation();
                (
                    true,
                    format!(
                        "white {}\nblack {}",
                        Self::format_positions(&situation.white),
                        Self::format_positions(&situation.black)
                    ),
                )
            }

            "legal_moves" => {
                let moves = self
                    .game
                    .legal_moves()
                    .into_iter()
                    .map(|(from, to)| format!("{}-{}", str_coord(from), str_coord(to)))
                    .collect::<Vec<_>>();
                (true, moves.join(" "))
            }

            "showboard" => (true, format!("\n{}", self.game.grid())),

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
