//! The game engine: turn order, the select-then-move protocol, move
//! legality, capture, and the center-cell win.
//!
//! A turn has two phases. In [`Phase::Select`] the side to move picks one of
//! its horses; in [`Phase::Move`] the next position is taken as the target.
//! A rejected target abandons the selection rather than keeping it for a
//! retry. Landing on the center cell wins, after which the board is reset to
//! the starting layout.
//!
//! Every call runs to completion before returning. Listeners registered with
//! [`Game::add_listener`] are notified synchronously once state is updated.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::board::{Grid, Piece, Side};
use crate::error::{GridError, MoveError, SelectionFault};
use crate::position::Position;

/// Where the engine is within the current turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a piece of the side to move to be chosen.
    Select,
    /// A piece has been chosen; the next position is its target.
    Move(Position),
}

/// An applied move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub side: Side,
    pub from: Position,
    pub to: Position,
    /// Opposing piece removed from `to`, as it stood before the capture.
    pub captured: Option<Piece>,
    /// Set when the move reached the center. The board has already been
    /// reset by the time the caller sees this.
    pub winner: Option<Side>,
}

/// Current piece positions per side, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Situation {
    pub size: usize,
    pub white: Vec<Position>,
    pub black: Vec<Position>,
}

impl Situation {
    pub fn positions(&self, side: Side) -> &[Position] {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    pub fn remaining(&self, side: Side) -> usize {
        self.positions(side).len()
    }

    /// Pieces of `side` taken by the opponent so far this game. Zero for a
    /// custom layout holding more than `size` pieces of that side.
    pub fn captured(&self, side: Side) -> usize {
        self.size.saturating_sub(self.remaining(side))
    }
}

/// Hooks a front end implements to follow the game. All default to no-ops.
pub trait GameListener {
    fn on_selection_made(&mut self, _position: Position) {}
    fn on_selection_cancelled(&mut self) {}
    fn on_move_completed(&mut self, _next: Side) {}
    fn on_move_rejected(&mut self, _reason: &MoveError) {}
    /// Fired for the winning move in place of `on_move_completed`. The board
    /// has already been reset and White is to move.
    fn on_game_ended(&mut self, _winner: Side) {}
}

/// Handle returned by [`Game::add_listener`], used to unregister.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Notification as recorded by [`EventRecorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    SelectionMade(Position),
    SelectionCancelled,
    MoveCompleted(Side),
    MoveRejected(MoveError),
    GameEnded(Side),
}

/// Listener that appends every notification to a shared log. Clones share
/// the log, so keep one clone and register the other.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn push(&self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl GameListener for EventRecorder {
    fn on_selection_made(&mut self, position: Position) {
        self.push(GameEvent::SelectionMade(position));
    }

    fn on_selection_cancelled(&mut self) {
        self.push(GameEvent::SelectionCancelled);
    }

    fn on_move_completed(&mut self, next: Side) {
        self.push(GameEvent::MoveCompleted(next));
    }

    fn on_move_rejected(&mut self, reason: &MoveError) {
        self.push(GameEvent::MoveRejected(reason.clone()));
    }

    fn on_game_ended(&mut self, winner: Side) {
        self.push(GameEvent::GameEnded(winner));
    }
}

/// A Jeson Mor game.
pub struct Game {
    grid: Grid,
    turn: Side,
    selected: Option<Position>,
    /// Wins per side across resets: `[white, black]`.
    wins: [u32; 2],
    listeners: Vec<(ListenerId, Box<dyn GameListener>)>,
    next_listener: usize,
}

impl Default for Game {
    fn default() -> Self {
        let mut grid = Grid::default();
        grid.populate();
        Self::from_grid(grid, Side::White)
    }
}

impl Game {
    /// Build a board of `size` with both sides on their home ranks, White to
    /// move.
    pub fn new(size: usize) -> Result<Self, GridError> {
        let mut grid = Grid::new(size)?;
        grid.populate();
        Ok(Self::from_grid(grid, Side::White))
    }

    /// Start from an arbitrary layout. A later win still resets to the
    /// standard starting layout.
    pub fn from_grid(grid: Grid, turn: Side) -> Self {
        Self {
            grid,
            turn,
            selected: None,
            wins: [0, 0],
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn current_turn(&self) -> Side {
        self.turn
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        match self.selected {
            Some(pos) => Phase::Move(pos),
            None => Phase::Select,
        }
    }

    pub fn games_won(&self, side: Side) -> u32 {
        self.wins[side as usize]
    }

    pub fn situation(&self) -> Situation {
        let collect =
            |side| -> Vec<Position> { self.grid.pieces(side).map(|(pos, _)| pos).collect() };
        Situation {
            size: self.grid.size(),
            white: collect(Side::White),
            black: collect(Side::Black),
        }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    pub fn add_listener(&mut self, listener: Box<dyn GameListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, f: impl Fn(&mut dyn GameListener)) {
        for (_, listener) in &mut self.listeners {
            f(listener.as_mut());
        }
    }

    fn reject<T>(&mut self, err: MoveError) -> Result<T, MoveError> {
        debug!(code = err.code(), "{err}");
        self.notify(|l| l.on_move_rejected(&err));
        Err(err)
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Choose the piece to move. Only a piece of the side to move can be
    /// selected. A valid choice made while another selection is pending
    /// replaces it; an invalid one drops it.
    pub fn select_position(&mut self, pos: Position) -> Result<Position, MoveError> {
        if !self.grid.contains(pos) {
            self.selected = None;
            return self.reject(MoveError::OutOfBounds {
                position: pos,
                size: self.grid.size(),
            });
        }
        let fault = match self.grid.get(pos) {
            None => Some(SelectionFault::Empty),
            Some(piece) if piece.side != self.turn => Some(SelectionFault::Opponent),
            Some(_) => None,
        };
        if let Some(reason) = fault {
            self.selected = None;
            return self.reject(MoveError::InvalidSelection {
                position: pos,
                reason,
            });
        }

        self.selected = Some(pos);
        debug!(side = %self.turn, %pos, "piece selected");
        self.notify(|l| l.on_selection_made(pos));
        Ok(pos)
    }

    /// Abandon the pending selection, if any. The turn does not change.
    pub fn cancel_selection(&mut self) -> Option<Position> {
        let prev = self.selected.take()?;
        debug!(%prev, "selection cancelled");
        self.notify(|l| l.on_selection_cancelled());
        Some(prev)
    }

    /// Move the selected piece to `target`. The selection is consumed whether
    /// or not the move is accepted.
    pub fn attempt_move(&mut self, target: Position) -> Result<MoveOutcome, MoveError> {
        let Some(from) = self.selected.take() else {
            return self.reject(MoveError::NoSelection);
        };
        self.apply(from, target)
    }

    /// Single-input form of the protocol: selects in [`Phase::Select`] and
    /// moves in [`Phase::Move`]. Returns the outcome when a move was applied.
    pub fn click(&mut self, pos: Position) -> Result<Option<MoveOutcome>, MoveError> {
        match self.phase() {
            Phase::Select => self.select_position(pos).map(|_| None),
            Phase::Move(_) => self.attempt_move(pos).map(Some),
        }
    }

    /// Move directly from `from` to `to`, bypassing selection. Any pending
    /// selection is dropped.
    pub fn make_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        self.selected = None;
        self.apply(from, to)
    }

    /// Put both sides back on their home ranks with White to move.
    pub fn reset(&mut self) {
        self.grid.populate();
        self.turn = Side::White;
        self.selected = None;
        info!(size = self.grid.size(), "game reset");
    }

    // -------------------------------------------------------------------------
    // Rules
    // -------------------------------------------------------------------------

    /// Check a move against the current position without applying it.
    /// Returns the piece that would be captured, if any.
    pub fn check_move(&self, from: Position, to: Position) -> Result<Option<Piece>, MoveError> {
        let size = self.grid.size();
        for pos in [from, to] {
            if !self.grid.contains(pos) {
                return Err(MoveError::OutOfBounds {
                    position: pos,
                    size,
                });
            }
        }
        if !from.is_knight_move(to) {
            return Err(MoveError::IllegalGeometry { from, to });
        }
        match self.grid.get(from) {
            None => return Err(MoveError::NoPiece(from)),
            Some(piece) if piece.side != self.turn => {
                return Err(MoveError::WrongSide {
                    position: from,
                    owner: piece.side,
                });
            }
            Some(_) => {}
        }
        match self.grid.get(to) {
            Some(piece) if piece.side == self.turn => Err(MoveError::FriendlyFire(to)),
            other => Ok(other.copied()),
        }
    }

    /// Targets the piece on `from` could move to right now.
    pub fn legal_targets(&self, from: Position) -> Vec<Position> {
        from.knight_targets()
            .filter(|&to| self.check_move(from, to).is_ok())
            .collect()
    }

    /// Every `(from, to)` the side to move could play.
    pub fn legal_moves(&self) -> Vec<(Position, Position)> {
        self.grid
            .pieces(self.turn)
            .flat_map(|(from, _)| {
                self.legal_targets(from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    fn apply(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        let captured = match self.check_move(from, to) {
            Ok(captured) => captured,
            Err(err) => return self.reject(err),
        };

        // Legality is settled past this point.
        let side = self.turn;
        self.grid.remove_piece(to)?;
        let piece = self.grid.remove_piece(from)?.ok_or(MoveError::NoPiece(from))?;
        self.grid.place_piece(to, piece)?;
        debug!(%side, %from, %to, capture = captured.is_some(), "horse moved");

        if to == self.grid.center() {
            self.wins[side as usize] += 1;
            info!(winner = %side, "center reached");
            self.reset();
            self.notify(|l| l.on_game_ended(side));
            return Ok(MoveOutcome {
                side,
                from,
                to,
                captured,
                winner: Some(side),
            });
        }

        self.turn = side.opponent();
        let next = self.turn;
        self.notify(|l| l.on_move_completed(next));
        Ok(MoveOutcome {
            side,
            from,
            to,
            captured,
            winner: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: usize, pieces: &[(Side, usize, usize)], turn: Side) -> Game {
        let mut grid = Grid::new(size).unwrap();
        for (k, &(side, row, col)) in pieces.iter().enumerate() {
            let pos = Position::new(row, col);
            grid.place_piece(pos, Piece::new(side, k + 1, pos)).unwrap();
        }
        Game::from_grid(grid, turn)
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(9).unwrap();
        assert_eq!(game.current_turn(), Side::White);
        assert_eq!(game.phase(), Phase::Select);
        assert_eq!(game.situation().remaining(Side::White), 9);
        assert_eq!(game.situation().remaining(Side::Black), 9);
        assert_eq!(Game::new(8).err(), Some(GridError::InvalidSize(8)));
    }

    #[test]
    fn test_select_rules() {
        let mut game = Game::default();
        let err = game.select_position(Position::new(5, 5)).unwrap_err();
        assert_eq!(err.code(), "empty-selection");
        let err = game.select_position(Position::new(9, 1)).unwrap_err();
        assert_eq!(err.code(), "opponent-selection");
        let err = game.select_position(Position::new(10, 1)).unwrap_err();
        assert_eq!(err.code(), "out-of-bounds");
        assert_eq!(game.phase(), Phase::Select);

        game.select_position(Position::new(1, 1)).unwrap();
        assert_eq!(game.phase(), Phase::Move(Position::new(1, 1)));
        // Re-selecting another own piece replaces the selection.
        game.select_position(Position::new(1, 4)).unwrap();
        assert_eq!(game.selected(), Some(Position::new(1, 4)));
        // A bad re-selection drops it.
        assert!(game.select_position(Position::new(9, 4)).is_err());
        assert_eq!(game.phase(), Phase::Select);
    }

    #[test]
    fn test_check_move_order() {
        let game = layout(
            5,
            &[(Side::White, 1, 1), (Side::White, 2, 3), (Side::Black, 3, 2)],
            Side::White,
        );
        let p = Position::new;
        assert!(matches!(
            game.check_move(p(1, 1), p(6, 2)),
            Err(MoveError::OutOfBounds { .. })
        ));
        assert!(matches!(
            game.check_move(p(1, 1), p(1, 1)),
            Err(MoveError::IllegalGeometry { .. })
        ));
        assert!(matches!(
            game.check_move(p(1, 1), p(2, 2)),
            Err(MoveError::IllegalGeometry { .. })
        ));
        assert_eq!(game.check_move(p(4, 4), p(2, 3)), Err(MoveError::NoPiece(p(4, 4))));
        assert_eq!(
            game.check_move(p(3, 2), p(1, 1)),
            Err(MoveError::WrongSide {
                position: p(3, 2),
                owner: Side::Black
            })
        );
        assert_eq!(game.check_move(p(1, 1), p(2, 3)), Err(MoveError::FriendlyFire(p(2, 3))));
        let captured = game.check_move(p(1, 1), p(3, 2)).unwrap().unwrap();
        assert_eq!(captured.side, Side::Black);
    }

    #[test]
    fn test_rejected_move_consumes_selection() {
        let mut game = Game::default();
        game.select_position(Position::new(1, 1)).unwrap();
        let err = game.attempt_move(Position::new(2, 2)).unwrap_err();
        assert_eq!(err.code(), "illegal-geometry");
        assert_eq!(game.phase(), Phase::Select);
        assert_eq!(game.current_turn(), Side::White);
        assert_eq!(game.attempt_move(Position::new(3, 2)), Err(MoveError::NoSelection));
    }

    #[test]
    fn test_cancel_selection() {
        let mut game = Game::default();
        assert_eq!(game.cancel_selection(), None);
        game.select_position(Position::new(1, 3)).unwrap();
        assert_eq!(game.cancel_selection(), Some(Position::new(1, 3)));
        assert_eq!(game.phase(), Phase::Select);
        assert_eq!(game.current_turn(), Side::White);
    }

    #[test]
    fn test_click_protocol() {
        let mut game = Game::default();
        assert_eq!(game.click(Position::new(1, 2)), Ok(None));
        let outcome = game.click(Position::new(3, 1)).unwrap().unwrap();
        assert_eq!(outcome.to, Position::new(3, 1));
        assert_eq!(game.current_turn(), Side::Black);
    }

    #[test]
    fn test_win_resets_board() {
        let mut game = layout(5, &[(Side::White, 1, 2), (Side::Black, 5, 5)], Side::White);
        let outcome = game.make_move(Position::new(1, 2), Position::new(3, 3)).unwrap();
        assert_eq!(outcome.winner, Some(Side::White));
        assert_eq!(game.games_won(Side::White), 1);
        assert_eq!(game.games_won(Side::Black), 0);
        assert_eq!(game.current_turn(), Side::White);
        let situation = game.situation();
        assert_eq!(situation.remaining(Side::White), 5);
        assert_eq!(situation.remaining(Side::Black), 5);
        assert!(!game.grid().is_occupied(Position::new(3, 3)));
    }

    #[test]
    fn test_captured_with_overfull_layout() {
        // Ten white horses on a 5x5 board: more than a side starts with.
        let pieces: Vec<_> = (1..=2)
            .flat_map(|row| (1..=5).map(move |col| (Side::White, row, col)))
            .collect();
        let game = layout(5, &pieces, Side::White);
        let situation = game.situation();
        assert_eq!(situation.remaining(Side::White), 10);
        assert_eq!(situation.captured(Side::White), 0);
        assert_eq!(situation.captured(Side::Black), 5);
    }

    #[test]
    fn test_legal_moves_from_start() {
        let game = Game::new(5).unwrap();
        // Row 2 is empty, so every jump off row 1 that stays on the board is
        // legal: 2 + 3 + 4 + 3 + 2.
        let moves = game.legal_moves();
        assert_eq!(moves.len(), 14);
        assert!(moves.iter().all(|(from, to)| from.row == 1 && to.row <= 3));
        assert_eq!(
            game.legal_targets(Position::new(1, 1)),
            vec![Position::new(2, 3), Position::new(3, 2)]
        );
    }

    #[test]
    fn test_listener_registration() {
        let mut game = Game::default();
        let recorder = EventRecorder::new();
        let id = game.add_listener(Box::new(recorder.clone()));

        game.select_position(Position::new(1, 1)).unwrap();
        game.attempt_move(Position::new(3, 2)).unwrap();
        game.select_position(Position::new(1, 1)).unwrap_err();
        assert_eq!(
            recorder.take(),
            vec![
                GameEvent::SelectionMade(Position::new(1, 1)),
                GameEvent::MoveCompleted(Side::Black),
                GameEvent::MoveRejected(MoveError::InvalidSelection {
                    position: Position::new(1, 1),
                    reason: SelectionFault::Empty,
                }),
            ]
        );

        assert!(game.remove_listener(id));
        assert!(!game.remove_listener(id));
        game.select_position(Position::new(9, 1)).unwrap();
        assert!(recorder.events().is_empty());
    }
}
