//! Constants for board dimensions, piece movement, and the text protocol.
//!
//! Board size is a runtime parameter (any odd size from [`MIN_SIZE`] to [`MAX_SIZE`]),
//! so only the defaults and bounds live here.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when none is given. Jeson Mor is traditionally played on 9x9.
pub const DEFAULT_SIZE: usize = 9;

/// Smallest board that can be built.
pub const MIN_SIZE: usize = 5;

/// Largest board that can be built.
pub const MAX_SIZE: usize = 99;

// =============================================================================
// Piece Movement
// =============================================================================

/// Displacements `(rows, cols)` a horse may make, the eight chess-knight jumps.
/// Order: clockwise starting from two rows up, one column right.
pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

// =============================================================================
// Text Protocol
// =============================================================================

/// Engine name reported by the `name` command.
pub const ENGINE_NAME: &str = "jeson-mor";

/// Protocol version reported by `protocol_version`.
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Self-play
// =============================================================================

/// Move cap for a self-play run, so two random movers cannot loop forever.
pub const MAX_SELFPLAY_MOVES: usize = 500;
