//! Go position representation and the string queries the reading code needs.
//!
//! This module provides the board layer for the reading engine:
//! - Board state representation using a 1D array with padding
//! - Stone placement, captures, suicide and ko detection
//! - String queries: stones, liberties, adjacent chains, origins
//! - Hypothetical move queries: approximate and accurate liberties,
//!   self-atari and ko-capture tests
//!
//! Colors are absolute (Black and White), since the superstring and
//! reading code ask questions about both sides.

use std::fmt;

use crate::constants::*;

/// A point on the board, represented as an index into the 1D board array.
pub type Point = usize;

/// Contents of a board point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Empty,
    Black,
    White,
    /// Padding outside the playable area.
    Out,
}

impl Color {
    /// The opposing color. Empty and Out map to themselves.
    #[inline]
    pub fn other(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            c => c,
        }
    }

    #[inline]
    pub fn is_stone(self) -> bool {
        matches!(self, Color::Black | Color::White)
    }
}

/// Result of attempting to play a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// Point is not empty
    #[error("illegal move: point not empty")]
    Occupied,
    /// Move violates ko rule
    #[error("illegal move: retakes ko")]
    Ko,
    /// Move would be suicide (no liberties after capture resolution)
    #[error("illegal move: suicide")]
    Suicide,
    /// Only Black and White can move
    #[error("illegal move: {0:?} is not a player")]
    NotAPlayer(Color),
}

/// Failure to read a coordinate such as "D4".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate '{0}'")]
pub struct ParseCoordError(pub String);

/// A Go position (board state).
///
/// The board is represented as a 1D array with padding around the edges.
#[derive(Clone)]
pub struct Position {
    /// Board state, `Color::Out` on the padding.
    pub color: [Color; BOARDSIZE],
    /// Point where an immediate ko recapture is forbidden (0 if no ko)
    pub ko: Point,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    pub fn new() -> Self {
        let mut p = Position {
            color: [Color::Out; BOARDSIZE],
            ko: 0,
        };
        empty_position(&mut p);
        p
    }

    /// Build a position by placing stones directly, without capture
    /// processing. Coordinates use the "D4" notation.
    pub fn with_stones(black: &[&str], white: &[&str]) -> Result<Self, ParseCoordError> {
        let mut pos = Position::new();
        for (stones, color) in [(black, Color::Black), (white, Color::White)] {
            for s in stones {
                let pt = parse_coord(s)?;
                if pt == PASS_MOVE {
                    return Err(ParseCoordError(s.to_string()));
                }
                place_stone(&mut pos, pt, color);
            }
        }
        Ok(pos)
    }

    /// Color at `pt`, treating anything outside the array as padding.
    #[inline]
    pub fn at(&self, pt: Point) -> Color {
        self.color.get(pt).copied().unwrap_or(Color::Out)
    }
}

/// Reset a position to the initial empty board state.
///
/// The board is laid out as a 1D array with padding:
/// - Index 0 to N: top padding (out of bounds)
/// - Each row: left padding + N playable points
/// - Bottom padding
pub fn empty_position(pos: &mut Position) {
    let mut k = 0;
    for _col in 0..=N {
        pos.color[k] = Color::Out;
        k += 1;
    }
    for _row in 1..=N {
        pos.color[k] = Color::Out;
        k += 1;
        for _col in 1..=N {
            pos.color[k] = Color::Empty;
            k += 1;
        }
    }
    for _col in 0..W {
        pos.color[k] = Color::Out;
        k += 1;
    }
    pos.ko = 0;
}

/// Offset a point by one of the `DELTA` entries (or a sum of them).
#[inline]
pub fn offset(pt: Point, d: isize) -> Point {
    pt.wrapping_add_signed(d)
}

/// Get the 4 orthogonal neighbors (S, W, N, E) of a point.
#[inline]
pub fn neighbors(pt: Point) -> [Point; 4] {
    std::array::from_fn(|i| offset(pt, DELTA[i]))
}

/// Get the 4 diagonal neighbors (SW, NW, NE, SE) of a point.
#[inline]
pub fn diagonal_neighbors(pt: Point) -> [Point; 4] {
    std::array::from_fn(|i| offset(pt, DELTA[i + 4]))
}

/// Get all 8 neighbors (4 orthogonal + 4 diagonal) of a point.
#[inline]
pub fn all_neighbors(pt: Point) -> [Point; 8] {
    std::array::from_fn(|i| offset(pt, DELTA[i]))
}

#[inline]
pub fn on_board(pos: &Position, pt: Point) -> bool {
    pos.at(pt) != Color::Out
}

/// Put a stone on the board without resolving captures (board setup).
pub fn place_stone(pos: &mut Position, pt: Point, color: Color) {
    assert!(on_board(pos, pt), "place_stone off board at {pt}");
    assert!(color.is_stone());
    pos.color[pt] = color;
}

/// Remove a stone without any further processing (board setup).
pub fn remove_stone(pos: &mut Position, pt: Point) {
    assert!(pos.color[pt].is_stone(), "no stone at {}", str_coord(pt));
    pos.color[pt] = Color::Empty;
}

/// Collect all stones of the string at `str`.
///
/// The seed comes first, the rest in breadth-first order.
pub fn find_stones(pos: &Position, str: Point) -> Vec<Point> {
    let color = pos.color[str];
    assert!(color.is_stone(), "find_stones on empty point {}", str_coord(str));
    let mut seen = [false; BOARDSIZE];
    let mut stones = vec![str];
    seen[str] = true;

    let mut i = 0;
    while i < stones.len() {
        let pt = stones[i];
        i += 1;
        for n in neighbors(pt) {
            if !seen[n] && pos.color[n] == color {
                seen[n] = true;
                stones.push(n);
            }
        }
    }
    stones
}

/// Collect the liberties of the string at `str` in discovery order.
pub fn find_liberties(pos: &Position, str: Point) -> Vec<Point> {
    let mut seen = [false; BOARDSIZE];
    let mut libs = Vec::with_capacity(MAX_LIBERTIES);
    for pt in find_stones(pos, str) {
        for n in neighbors(pt) {
            if pos.color[n] == Color::Empty && !seen[n] {
                seen[n] = true;
                libs.push(n);
            }
        }
    }
    libs
}

/// Count the liberties of the string at `str`.
pub fn count_liberties(pos: &Position, str: Point) -> usize {
    find_liberties(pos, str).len()
}

/// The origin of a string: its smallest point. Used as the string id.
pub fn find_origin(pos: &Position, str: Point) -> Point {
    find_stones(pos, str)
        .into_iter()
        .min()
        .unwrap_or(str)
}

/// Strings of the opposite color directly adjacent to the string at
/// `str`, reported by origin in discovery order.
pub fn chain_links(pos: &Position, str: Point) -> Vec<Point> {
    let other = pos.color[str].other();
    let mut seen = [false; BOARDSIZE];
    let mut chains = Vec::with_capacity(MAX_CHAIN);
    for pt in find_stones(pos, str) {
        for n in neighbors(pt) {
            if pos.color[n] == other && !seen[n] {
                let chain = find_stones(pos, n);
                for &s in &chain {
                    seen[s] = true;
                }
                chains.push(chain.into_iter().min().unwrap_or(n));
            }
        }
    }
    chains
}

/// Liberties a stone of `color` would get if played at the empty point
/// `pt`, ignoring captures. Counting stops at `maxlib`.
pub fn approx_liberties(pos: &Position, pt: Point, color: Color, maxlib: usize) -> usize {
    let mut seen = [false; BOARDSIZE];
    seen[pt] = true;
    let mut libs = 0;
    for n in neighbors(pt) {
        match pos.color[n] {
            Color::Empty if !seen[n] => {
                seen[n] = true;
                libs += 1;
            }
            c if c == color && !seen[n] => {
                for s in find_stones(pos, n) {
                    seen[s] = true;
                }
                for lib in find_liberties(pos, n) {
                    if !seen[lib] {
                        seen[lib] = true;
                        libs += 1;
                    }
                }
            }
            _ => {}
        }
        if libs >= maxlib {
            return maxlib;
        }
    }
    libs
}

/// Liberties a stone of `color` would get if played at the empty point
/// `pt`, with captures resolved. Counting stops at `maxlib`.
pub fn accurate_liberties(pos: &Position, pt: Point, color: Color, maxlib: usize) -> usize {
    let mut test = pos.clone();
    test.color[pt] = color;
    remove_dead_neighbors(&mut test, pt);
    count_liberties(&test, pt).min(maxlib)
}

/// True if a move by `color` at `pt` would leave the new string with at
/// most one liberty. Suicide counts as self-atari.
pub fn is_self_atari(pos: &Position, pt: Point, color: Color) -> bool {
    let empty = neighbors(pt)
        .iter()
        .filter(|&&n| pos.color[n] == Color::Empty)
        .count();
    if empty >= 2 {
        return false;
    }
    accurate_liberties(pos, pt, color, 2) <= 1
}

/// True if a move by `color` at `pt` is a ko capture: every neighbor is
/// an opposing stone or off board, and exactly one stone gets captured.
/// Whether the capture is currently legal does not matter.
pub fn is_ko(pos: &Position, pt: Point, color: Color) -> bool {
    let other = color.other();
    let mut captures = 0;
    for n in neighbors(pt) {
        match pos.color[n] {
            Color::Out => {}
            c if c == other => {
                if count_liberties(pos, n) == 1 {
                    captures += find_stones(pos, n).len();
                }
            }
            _ => return false,
        }
    }
    captures == 1
}

/// True if `color` may play at `pt` now.
pub fn is_legal(pos: &Position, pt: Point, color: Color) -> bool {
    let mut test = pos.clone();
    play_move(&mut test, pt, color).is_ok()
}

/// Remove opposing strings next to `pt` that have no liberties left.
/// Returns the number of stones removed and the last capture point.
fn remove_dead_neighbors(pos: &mut Position, pt: Point) -> (usize, Point) {
    let other = pos.color[pt].other();
    let mut captured = 0;
    let mut capture_point = 0;
    for n in neighbors(pt) {
        if pos.color[n] == other && count_liberties(pos, n) == 0 {
            for s in find_stones(pos, n) {
                pos.color[s] = Color::Empty;
                captured += 1;
            }
            capture_point = n;
        }
    }
    (captured, capture_point)
}

/// Play a move for `color` at `pt`.
///
/// Handles pass moves, legality checking, captures and ko detection.
/// Returns the number of captured stones.
pub fn play_move(pos: &mut Position, pt: Point, color: Color) -> Result<usize, MoveError> {
    if !color.is_stone() {
        return Err(MoveError::NotAPlayer(color));
    }
    if pt == PASS_MOVE {
        pos.ko = 0;
        return Ok(0);
    }
    if pos.at(pt) != Color::Empty {
        return Err(MoveError::Occupied);
    }
    if pt == pos.ko && is_ko(pos, pt, color) {
        return Err(MoveError::Ko);
    }

    pos.color[pt] = color;
    let (captured, capture_point) = remove_dead_neighbors(pos, pt);

    if captured == 0 && count_liberties(pos, pt) == 0 {
        pos.color[pt] = Color::Empty;
        return Err(MoveError::Suicide);
    }

    // A single stone capturing a single stone, left with one liberty, is a ko.
    pos.ko = if captured == 1
        && find_stones(pos, pt).len() == 1
        && find_liberties(pos, pt) == [capture_point]
    {
        capture_point
    } else {
        0
    };
    Ok(captured)
}

/// Parse a coordinate string (e.g., "D4", "pass") into a Point.
///
/// Go coordinates use letters A-T (skipping I) for columns and 1-19 for rows.
pub fn parse_coord(s: &str) -> Result<Point, ParseCoordError> {
    if s.eq_ignore_ascii_case("pass") {
        return Ok(PASS_MOVE);
    }
    let err = || ParseCoordError(s.to_string());

    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return Err(err());
    }

    let col_char = bytes[0].to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() || col_char == b'I' {
        return Err(err());
    }
    let mut col = (col_char - b'A' + 1) as usize;
    // Skip 'I' column (Go convention to avoid confusion with 'J')
    if col_char > b'I' {
        col -= 1;
    }

    let row: usize = s[1..].parse().map_err(|_| err())?;
    if col > N || row == 0 || row > N {
        return Err(err());
    }

    Ok((N - row + 1) * NS + col)
}

/// Convert a Point to a coordinate string (e.g., "D4").
///
/// Returns "pass" for `PASS_MOVE`.
pub fn str_coord(pt: Point) -> String {
    if pt == PASS_MOVE {
        return "pass".into();
    }

    let row = pt / NS;
    let col = pt % NS;

    // Convert column to letter, skipping 'I'
    let mut c = (b'@' + col as u8) as char;
    if c >= 'I' {
        c = (c as u8 + 1) as char;
    }

    format!("{c}{}", N + 1 - row)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=N {
            write!(f, "{:>2} ", N + 1 - row)?;
            for col in 1..=N {
                let ch = match self.color[row * NS + col] {
                    Color::Black => 'X',
                    Color::White => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 1..=N {
            write!(f, "{} ", str_coord(NS + col).chars().next().unwrap_or('?'))?;
        }
        writeln!(f)
    }
}
