//! Error types for the grid and the game engine.
//!
//! [`GridError`] covers construction and cell-level misuse. [`MoveError`] is
//! the reason a selection or move was rejected; every variant maps to a
//! distinct [`MoveError::code`] so a front end can react to each one.

use thiserror::Error;

use crate::board::Side;
use crate::constants::{MAX_SIZE, MIN_SIZE};
use crate::position::Position;

/// Errors raised by [`Grid`](crate::board::Grid) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Board size is even or outside `[MIN_SIZE, MAX_SIZE]`.
    #[error(
        "invalid board size {0}: must be odd and between {min} and {max}",
        min = MIN_SIZE,
        max = MAX_SIZE
    )]
    InvalidSize(usize),

    /// Position falls outside `[1, size]` on either axis.
    #[error("position {position} is outside the {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    /// Placement onto a cell that already holds a piece.
    #[error("cell {0} is already occupied")]
    OccupiedCell(Position),
}

/// Why a selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFault {
    /// Nothing stands on the chosen cell.
    Empty,
    /// The chosen piece belongs to the side not on move.
    Opponent,
}

impl std::fmt::Display for SelectionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionFault::Empty => write!(f, "no piece there"),
            SelectionFault::Opponent => write!(f, "not your piece"),
        }
    }
}

/// Rejection of a selection or move. The engine state is left untouched apart
/// from dropping any pending selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position {position} is outside the {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    #[error("cannot select {position}: {reason}")]
    InvalidSelection {
        position: Position,
        reason: SelectionFault,
    },

    /// A move target was given while no piece was selected.
    #[error("no piece selected")]
    NoSelection,

    #[error("illegal move {from} -> {to}: a horse moves like a chess knight")]
    IllegalGeometry { from: Position, to: Position },

    #[error("no piece at {0}")]
    NoPiece(Position),

    #[error("piece at {position} belongs to {owner}")]
    WrongSide { position: Position, owner: Side },

    #[error("destination {0} is occupied by your own piece")]
    FriendlyFire(Position),

    /// Grid invariant violation; never produced by the engine's own move path.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl MoveError {
    /// Stable short reason code.
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::OutOfBounds { .. } => "out-of-bounds",
            MoveError::InvalidSelection {
                reason: SelectionFault::Empty,
                ..
            } => "empty-selection",
            MoveError::InvalidSelection {
                reason: SelectionFault::Opponent,
                ..
            } => "opponent-selection",
            MoveError::NoSelection => "no-selection",
            MoveError::IllegalGeometry { .. } => "illegal-geometry",
            MoveError::NoPiece(_) => "no-piece",
            MoveError::WrongSide { .. } => "wrong-side",
            MoveError::FriendlyFire(_) => "friendly-fire",
            MoveError::Grid(_) => "grid-invariant",
        }
    }
}
