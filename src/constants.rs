//! Constants for board geometry, string limits and reading budgets.
//!
//! The board uses a 1D array representation with padding for boundary detection.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board19x19` (default): 19x19 board
//! - `board13x13`: 13x13 board
//! - `board9x9`: 9x9 board
//!
//! To compile for a specific board size:
//! ```sh
//! cargo build                                              # 19x19 (default)
//! cargo build --no-default-features --features board9x9    # 9x9
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
#[cfg(feature = "board9x9")]
pub const N: usize = 9;

#[cfg(feature = "board13x13")]
pub const N: usize = 13;

#[cfg(feature = "board19x19")]
pub const N: usize = 19;

#[cfg(any(
    all(feature = "board9x9", feature = "board13x13"),
    all(feature = "board9x9", feature = "board19x19"),
    all(feature = "board13x13", feature = "board19x19"),
))]
compile_error!("Enable only one of 'board9x9', 'board13x13' and 'board19x19'");

#[cfg(not(any(feature = "board9x9", feature = "board13x13", feature = "board19x19")))]
compile_error!("Must enable exactly one board size feature: 'board9x9', 'board13x13' or 'board19x19'");

/// Row stride: N playable points plus one padding column shared by adjacent rows.
pub const NS: usize = N + 1;

/// Board width including left and right padding.
pub const W: usize = N + 2;

/// Total board array size including all padding.
pub const BOARDSIZE: usize = (N + 1) * W + 1;

/// First valid board index (skips top and left padding).
pub const BOARD_IMIN: usize = N + 2;

/// End of the board scan range (exclusive). Padding points inside the
/// range must be skipped by checking their color.
pub const BOARD_IMAX: usize = BOARDSIZE - N - 1;

/// Number of playable points.
pub const BOARD_AREA: usize = N * N;

/// Pass move marker (index 0 is padding, so safe to use).
pub const PASS_MOVE: usize = 0;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Offsets to neighboring points in the 1D board array.
///
/// Order: South, West, North, East, SW, NW, NE, SE. The four cardinal
/// directions are listed clockwise, so `DELTA[(k + 1) % 4]` is always
/// perpendicular to `DELTA[k]`. Scan order decides which liberties a
/// capped superstring query keeps.
pub const DELTA: [isize; 8] = [
    NS as isize,        // South (down one row)
    -1,                 // West
    -(NS as isize),     // North (up one row)
    1,                  // East
    NS as isize - 1,    // SW
    -(NS as isize) - 1, // NW
    -(NS as isize) + 1, // NE
    NS as isize + 1,    // SE
];

// =============================================================================
// String Limits
// =============================================================================

/// Practical number of liberties that matters to the reading code.
pub const MAX_LIBERTIES: usize = 8;

/// Upper bound on the number of strings adjacent to one string.
pub const MAX_CHAIN: usize = 160;

// =============================================================================
// Tactical Reading Depths (values at level 10)
// =============================================================================

pub const DEPTH: i32 = 16;
pub const BRANCH_DEPTH: i32 = 13;
pub const BACKFILL_DEPTH: i32 = 12;
pub const BACKFILL2_DEPTH: i32 = 5;
pub const BREAK_CHAIN_DEPTH: i32 = 7;
pub const SUPERSTRING_DEPTH: i32 = 7;
pub const FOURLIB_DEPTH: i32 = 7;
pub const KO_DEPTH: i32 = 8;

/// Atari-atari search depth.
pub const AA_DEPTH: i32 = 6;

// =============================================================================
// Pattern Based Reading
// =============================================================================

pub const OWL_DISTRUST_DEPTH: i32 = 6;
pub const OWL_BRANCH_DEPTH: i32 = 8;
pub const OWL_READING_DEPTH: i32 = 20;
pub const SEMEAI_BRANCH_DEPTH: i32 = 12;
pub const SEMEAI_BRANCH_DEPTH2: i32 = 6;

pub const OWL_NODE_LIMIT: i32 = 1000;
pub const SEMEAI_NODE_LIMIT: i32 = 500;

/// Owl node limits below level 10, indexed by `10 - level`.
pub const OWL_NODE_LIMITS: [i32; 12] = [500, 500, 450, 400, 400, 325, 275, 200, 150, 100, 75, 50];

// =============================================================================
// Connection Reading
// =============================================================================

pub const CONNECT_NODE_LIMIT: i32 = 2000;
pub const CONNECT_DEPTH: i32 = 64;
pub const CONNECT_DEPTH2: i32 = 20;

pub const BREAKIN_NODE_LIMIT: i32 = 400;
pub const BREAKIN_DEPTH: i32 = 14;

/// Skill level used when nothing else is configured.
pub const DEFAULT_LEVEL: i32 = 10;
