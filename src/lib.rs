//! Jeson Mor: board and move logic for the Mongolian knights game.
//!
//! Each side starts with a row of horses on its home rank. Horses move like
//! chess knights and capture by landing on an opposing horse. The first
//! horse to land on the center cell wins the game, after which the board is
//! set up again.
//!
//! ## Modules
//!
//! - [`constants`] - Board size defaults and knight offsets
//! - [`position`] - Coordinates and horse geometry
//! - [`board`] - The cell grid, sides, and pieces
//! - [`error`] - Grid and move rejection errors
//! - [`game`] - The game engine (turns, selection, moves, win detection)
//! - [`driver`] - Automated players and the driver that alternates them
//! - [`protocol`] - Text protocol for external front ends
//!
//! ## Example
//!
//! ```
//! use jeson_mor::board::Side;
//! use jeson_mor::game::Game;
//! use jeson_mor::position::Position;
//!
//! let mut game = Game::new(9).unwrap();
//! game.select_position(Position::new(1, 1)).unwrap();
//! let outcome = game.attempt_move(Position::new(3, 2)).unwrap();
//! assert_eq!(outcome.captured, None);
//! assert_eq!(game.current_turn(), Side::Black);
//! ```

pub mod board;
pub mod constants;
pub mod driver;
pub mod error;
pub mod game;
pub mod position;
pub mod protocol;
