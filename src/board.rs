//! The cell grid: a square board of cells, each holding at most one horse.

use std::fmt;

use tracing::debug;

use crate::constants::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
use crate::error::GridError;
use crate::position::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row holding this side's pieces at the start of a game.
    pub fn home_row(self, size: usize) -> usize {
        match self {
            Side::White => 1,
            Side::Black => size,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// A horse. `home` is the column it started on, which together with `side`
/// identifies the piece for the whole game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub side: Side,
    pub home: usize,
    pub position: Position,
}

impl Piece {
    pub fn new(side: Side, home: usize, position: Position) -> Self {
        Self {
            side,
            home,
            position,
        }
    }
}

/// One addressable square. If occupied, the occupant's `position` equals
/// the cell's.
#[derive(Clone, Debug)]
pub struct Cell {
    position: Position,
    occupant: Option<Piece>,
}

impl Cell {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::build(DEFAULT_SIZE)
    }
}

impl Grid {
    /// Build an empty grid. Fails unless `size` is odd and within
    /// `[MIN_SIZE, MAX_SIZE]`.
    pub fn new(size: usize) -> Result<Self, GridError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) || size % 2 == 0 {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self::build(size))
    }

    fn build(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|k| Cell {
                position: Position::new(k / size + 1, k % size + 1),
                occupant: None,
            })
            .collect();
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The winning cell, `(ceil(size/2), ceil(size/2))`.
    pub fn center(&self) -> Position {
        let c = self.size.div_ceil(2);
        Position::new(c, c)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (1..=self.size).contains(&pos.row) && (1..=self.size).contains(&pos.col)
    }

    fn idx(&self, pos: Position) -> Result<usize, GridError> {
        if !self.contains(pos) {
            return Err(GridError::OutOfBounds {
                position: pos,
                size: self.size,
            });
        }
        Ok((pos.row - 1) * self.size + (pos.col - 1))
    }

    pub fn cell_at(&self, pos: Position) -> Result<&Cell, GridError> {
        let i = self.idx(pos)?;
        Ok(&self.cells[i])
    }

    /// Piece on `pos`; `None` when the cell is empty or off the board.
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        self.cell_at(pos).ok().and_then(Cell::piece)
    }

    /// Off-board positions count as unoccupied.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Put `piece` on `pos`, updating its recorded position.
    pub fn place_piece(&mut self, pos: Position, mut piece: Piece) -> Result<(), GridError> {
        let i = self.idx(pos)?;
        let cell = &mut self.cells[i];
        if cell.occupant.is_some() {
            return Err(GridError::OccupiedCell(pos));
        }
        piece.position = pos;
        cell.occupant = Some(piece);
        Ok(())
    }

    /// Take whatever stands on `pos`, leaving the cell empty.
    pub fn remove_piece(&mut self, pos: Position) -> Result<Option<Piece>, GridError> {
        let i = self.idx(pos)?;
        Ok(self.cells[i].occupant.take())
    }

    /// Pieces of `side` with their positions, in row-major order.
    /// Each call starts a fresh pass over the grid.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        self.cells.iter().filter_map(move |cell| match &cell.occupant {
            Some(piece) if piece.side == side => Some((cell.position, piece)),
            _ => None,
        })
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces(side).count()
    }

    /// Empty every cell. Dimensions are kept.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
    }

    /// Clear the board and set up the starting layout: one horse per column,
    /// White on row 1 and Black on row `size`.
    pub fn populate(&mut self) {
        self.clear();
        for side in [Side::White, Side::Black] {
            let row = side.home_row(self.size);
            for col in 1..=self.size {
                let pos = Position::new(row, col);
                let i = (row - 1) * self.size + (col - 1);
                self.cells[i].occupant = Some(Piece::new(side, col, pos));
            }
        }
        debug!(size = self.size, "board populated");
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size.to_string().len();
        write!(f, "{:width$} ", "")?;
        for col in 1..=self.size {
            write!(f, " {}", col % 10)?;
        }
        writeln!(f)?;
        for row in 1..=self.size {
            write!(f, "{row:>width$} ")?;
            for col in 1..=self.size {
                let ch = match self.get(Position::new(row, col)) {
                    Some(p) if p.side == Side::White => 'W',
                    Some(_) => 'B',
                    None if Position::new(row, col) == self.center() => '+',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
