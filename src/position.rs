//! Board coordinates and horse geometry.
//!
//! Coordinates are 1-based `(row, col)` pairs. Row 1 is White's home rank and
//! row `size` is Black's. The textual form is `row:col`, e.g. `3:2`.

use std::fmt;

use crate::constants::KNIGHT_OFFSETS;

/// A cell address on the board.
///
/// A `Position` carries no board size; whether it is on a given board is
/// answered by [`Grid::contains`](crate::board::Grid::contains).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Signed `(rows, cols)` displacement from `self` to `to`, or `None` if
    /// it does not fit in an `isize`.
    pub fn displacement(self, to: Position) -> Option<(isize, isize)> {
        let delta = |from: usize, to: usize| -> Option<isize> {
            isize::try_from(to)
                .ok()?
                .checked_sub(isize::try_from(from).ok()?)
        };
        Some((delta(self.row, to.row)?, delta(self.col, to.col)?))
    }

    /// Position reached by adding `(dr, dc)`, or `None` if a coordinate would
    /// drop below 1. The upper bound is left to the grid.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row == 0 || col == 0 {
            return None;
        }
        Some(Position { row, col })
    }

    /// True if a horse standing on `self` can jump to `to`.
    pub fn is_knight_move(self, to: Position) -> bool {
        self.displacement(to)
            .is_some_and(|d| KNIGHT_OFFSETS.contains(&d))
    }

    /// Positions a knight jump away, not yet clipped to any board.
    pub fn knight_targets(self) -> impl Iterator<Item = Position> {
        KNIGHT_OFFSETS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// Parse a coordinate string such as `"3:2"` (a comma is also accepted).
///
/// Returns `None` for malformed input or a zero coordinate.
pub fn parse_coord(s: &str) -> Option<Position> {
    let (row, col) = s.trim().split_once([':', ','])?;
    let row: usize = row.trim().parse().ok()?;
    let col: usize = col.trim().parse().ok()?;
    if row == 0 || col == 0 {
        return None;
    }
    Some(Position::new(row, col))
}

/// Convert a position to its coordinate string (e.g. `"3:2"`).
pub fn str_coord(pos: Position) -> String {
    pos.to_string()
}
