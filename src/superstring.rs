//! Superstrings: strings extended through tactical connections.
//!
//! A superstring starts from one string and grows through the following
//! kinds of connections:
//!
//! 1. Solid connections (just like an ordinary string).
//!
//!    ```text
//!    OO
//!    ```
//!
//! 2. Diagonal connection or one space jump through an intersection where
//!    an opponent move would be suicide or self-atari.
//!
//!    ```text
//!    ...
//!    O.O
//!    XOX
//!    X.X
//!    ```
//!
//! 3. Bamboo joint.
//!
//!    ```text
//!    OO
//!    ..
//!    OO
//!    ```
//!
//! 4. Diagonal connection where both adjacent intersections are empty.
//!
//!    ```text
//!    .O
//!    O.
//!    ```
//!
//! 5. Connection through adjacent or diagonal tactically captured stones.
//!    Only [`Connection::Full`] follows these; it needs a [`TacticalOracle`].
//!
//! The tactical reader uses the conservative and chain-adjacency forms,
//! life-and-death code uses the full one.

use crate::constants::{BOARD_AREA, BOARDSIZE, DELTA};
use crate::position::{
    Color, Point, Position, all_neighbors, approx_liberties, chain_links, count_liberties,
    find_liberties, find_origin, find_stones, is_ko, is_self_atari, offset, on_board, str_coord,
};
use crate::reading::TacticalOracle;

/// Which connections a superstring follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Connection {
    /// Rules 1-5. An opponent ko capture does not count as an unsafe cut.
    Full,
    /// Rules 1-4, with the same ko handling as `Full`.
    Conservative,
    /// Rules 1-4, judging cut points by approximate liberties and ignoring
    /// ko. Used when collecting adjacent chains.
    ChainAdjacency,
}

/// What to collect and how.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub connection: Connection,
    /// Leave the seed string's own stones, liberties and chains out of the result.
    pub proper: bool,
    /// Zero means no limit. Otherwise substrings and adjacent chains with
    /// more liberties are skipped, and collection of liberties stops once
    /// this many have been found.
    pub liberty_cap: usize,
    pub stones: bool,
    pub liberties: bool,
    pub chains: bool,
}

impl Query {
    /// All stones of the superstring, following all five connection kinds.
    pub fn full() -> Self {
        Query {
            connection: Connection::Full,
            proper: false,
            liberty_cap: 0,
            stones: true,
            liberties: false,
            chains: false,
        }
    }

    /// All stones, without connections through captured stones.
    pub fn conservative() -> Self {
        Query {
            connection: Connection::Conservative,
            ..Self::full()
        }
    }

    pub fn liberties(liberty_cap: usize, proper: bool) -> Self {
        Query {
            connection: Connection::Conservative,
            proper,
            liberty_cap,
            stones: false,
            liberties: true,
            chains: false,
        }
    }

    pub fn stones_and_liberties(liberty_cap: usize) -> Self {
        Query {
            stones: true,
            ..Self::liberties(liberty_cap, false)
        }
    }

    pub fn chainlinks(liberty_cap: usize, proper: bool) -> Self {
        Query {
            connection: Connection::ChainAdjacency,
            proper,
            liberty_cap,
            stones: false,
            liberties: false,
            chains: true,
        }
    }
}

/// Result of a superstring query. Collections that were not asked for
/// stay empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Superstring {
    pub stones: Vec<Point>,
    pub liberties: Vec<Point>,
    /// Adjacent opposing strings, by origin.
    pub chains: Vec<Point>,
}

/// Board-sized marks cleared in O(1) by bumping a generation counter.
struct Marks {
    stamp: Vec<u32>,
    generation: u32,
}

impl Marks {
    fn new() -> Self {
        Marks {
            stamp: vec![0; BOARDSIZE],
            generation: 0,
        }
    }

    fn begin(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamp.fill(0);
            self.generation = 1;
        }
    }

    #[inline]
    fn is_set(&self, pt: Point) -> bool {
        self.stamp[pt] == self.generation
    }

    #[inline]
    fn set(&mut self, pt: Point) {
        self.stamp[pt] = self.generation;
    }
}

/// Reusable scratch space for superstring queries.
///
/// Each builder call sees fresh marks, so one builder serves any number of
/// sequential queries. Concurrent readers need one builder each.
pub struct SuperstringBuilder {
    stones: Marks,
    liberties: Marks,
    chains: Marks,
    lunches: Marks,
}

impl Default for SuperstringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SuperstringBuilder {
    pub fn new() -> Self {
        SuperstringBuilder {
            stones: Marks::new(),
            liberties: Marks::new(),
            chains: Marks::new(),
            lunches: Marks::new(),
        }
    }

    /// Build the superstring of the string at `seed`.
    ///
    /// # Panics
    /// If `seed` is not a stone, or a full query comes without an oracle.
    pub fn build(
        &mut self,
        pos: &Position,
        seed: Point,
        query: &Query,
        oracle: Option<&mut dyn TacticalOracle>,
    ) -> Superstring {
        let color = pos.at(seed);
        assert!(color.is_stone(), "superstring seed {} is not a stone", str_coord(seed));
        assert!(
            query.connection != Connection::Full || oracle.is_some(),
            "full superstring needs a tactical oracle"
        );

        self.stones.begin();
        self.liberties.begin();
        self.chains.begin();
        self.lunches.begin();

        let mut expansion = Expansion {
            marks: self,
            pos,
            query,
            oracle,
            color,
            other: color.other(),
            work: Vec::with_capacity(BOARD_AREA),
            out: Superstring::default(),
        };
        expansion.add_string(seed, !query.proper);
        expansion.run();
        expansion.out
    }
}

/// State of one builder invocation.
struct Expansion<'a, 'o> {
    marks: &'a mut SuperstringBuilder,
    pos: &'a Position,
    query: &'a Query,
    oracle: Option<&'o mut dyn TacticalOracle>,
    color: Color,
    other: Color,
    /// Stones whose neighbourhood still has to be examined, in order.
    work: Vec<Point>,
    out: Superstring,
}

impl Expansion<'_, '_> {
    fn liberty_limit_reached(&self) -> bool {
        self.query.liberties
            && self.query.liberty_cap > 0
            && self.out.liberties.len() >= self.query.liberty_cap
    }

    /// Loop over all found stones, looking for more strings to include.
    /// The loop automatically extends over stones found later.
    fn run(&mut self) {
        let mut r = 0;
        while r < self.work.len() {
            let pt = self.work[r];
            r += 1;

            for k in 0..4 {
                // Relative coordinates, pt marked by *:
                //
                //  ef.
                //  gb.
                //  *ac
                //  .d.
                let right = DELTA[k];
                let up = DELTA[(k + 1) % 4];

                let apos = offset(pt, right);
                let bpos = offset(apos, up);
                let cpos = offset(apos, right);
                let dpos = offset(apos, -up);
                let gpos = offset(pt, up);
                let epos = offset(gpos, up);
                let fpos = offset(bpos, up);

                if !on_board(self.pos, apos) {
                    continue;
                }

                // Rule 1 needs nothing: strings are added whole.

                // Rule 2.
                if self.pos.at(apos) == Color::Empty && self.is_unsafe_cut(apos) {
                    self.admit(bpos);
                    self.admit(cpos);
                    self.admit(dpos);
                }

                // Rule 3. f belongs to the string added through e.
                if self.pos.at(apos) == self.color
                    && self.pos.at(bpos) == Color::Empty
                    && self.pos.at(fpos) == self.color
                    && self.pos.at(gpos) == Color::Empty
                {
                    self.admit(epos);
                }

                // Rule 4.
                if self.pos.at(apos) == Color::Empty && self.pos.at(gpos) == Color::Empty {
                    self.admit(bpos);
                }

                // Rule 5: adjacent lunch, then diagonal lunch.
                if self.query.connection == Connection::Full {
                    self.try_lunch(apos);
                    self.try_lunch(bpos);
                }

                if self.liberty_limit_reached() {
                    return;
                }
            }
        }
    }

    /// Whether an opponent stone at the empty point `pt` would be
    /// effectively forbidden, so the point cannot cut.
    fn is_unsafe_cut(&self, pt: Point) -> bool {
        match self.query.connection {
            Connection::ChainAdjacency => approx_liberties(self.pos, pt, self.other, 2) < 2,
            // A ko capture is a real threat to cut.
            Connection::Full | Connection::Conservative => {
                is_self_atari(self.pos, pt, self.other) && !is_ko(self.pos, pt, self.other)
            }
        }
    }

    /// Add the string at `pt` if it is ours and not yet included.
    fn admit(&mut self, pt: Point) {
        if self.pos.at(pt) == self.color && !self.marks.stones.is_set(pt) {
            self.add_string(pt, true);
        }
    }

    fn try_lunch(&mut self, pt: Point) {
        if self.pos.at(pt) != self.other {
            return;
        }
        let origin = find_origin(self.pos, pt);
        // Only do the reading once.
        if self.marks.lunches.is_set(origin) {
            return;
        }
        self.marks.lunches.set(origin);

        let Some(oracle) = self.oracle.as_deref_mut() else {
            return;
        };
        let captured = oracle.attack(self.pos, origin) && !oracle.find_defense(self.pos, origin);
        log::debug!("superstring lunch {}: captured={captured}", str_coord(origin));
        if !captured {
            return;
        }

        for stone in find_stones(self.pos, origin) {
            for v in all_neighbors(stone) {
                self.admit(v);
            }
        }
    }

    /// Add a new string to the superstring, recording stones, liberties
    /// and adjacent chains as the query asks. With `do_add` unset the
    /// string is marked but not reported.
    fn add_string(&mut self, str: Point, do_add: bool) {
        assert!(
            !self.marks.stones.is_set(str),
            "string at {} already in superstring",
            str_coord(str)
        );

        let new_stones = find_stones(self.pos, str);
        for &s in &new_stones {
            self.marks.stones.set(s);
        }
        if self.query.stones && do_add {
            self.out.stones.extend_from_slice(&new_stones);
        }
        self.work.extend_from_slice(&new_stones);

        let cap = self.query.liberty_cap;

        if self.query.liberties {
            let libs = find_liberties(self.pos, str);
            let within_cap = cap == 0 || libs.len() <= cap;

            // Too many liberties: do not search onwards from this string.
            if !within_cap {
                self.work.truncate(self.work.len() - new_stones.len());
            }

            for lib in libs {
                if self.liberty_limit_reached() {
                    break;
                }
                if self.marks.liberties.is_set(lib) {
                    continue;
                }
                self.marks.liberties.set(lib);
                if do_add && within_cap {
                    self.out.liberties.push(lib);
                }
            }
        }

        if self.query.chains {
            for adj in chain_links(self.pos, str) {
                if cap > 0 && count_liberties(self.pos, adj) > cap {
                    continue;
                }
                if self.marks.chains.is_set(adj) {
                    continue;
                }
                self.marks.chains.set(adj);
                if do_add {
                    self.out.chains.push(adj);
                }
            }
        }
    }
}

/// Stones of the superstring at `str`, following all connection kinds.
pub fn find_superstring(pos: &Position, str: Point, oracle: &mut dyn TacticalOracle) -> Vec<Point> {
    SuperstringBuilder::new()
        .build(pos, str, &Query::full(), Some(oracle))
        .stones
}

/// Same as [`find_superstring`] without connections through captured
/// stones. Used in semeai analysis.
pub fn find_superstring_conservative(pos: &Position, str: Point) -> Vec<Point> {
    SuperstringBuilder::new()
        .build(pos, str, &Query::conservative(), None)
        .stones
}

/// Liberties of the conservative superstring at `str`.
///
/// If `liberty_cap` is nonzero, only liberties of substrings with at most
/// `liberty_cap` liberties are generated, and at most `liberty_cap` in total.
pub fn find_superstring_liberties(pos: &Position, str: Point, liberty_cap: usize) -> Vec<Point> {
    SuperstringBuilder::new()
        .build(pos, str, &Query::liberties(liberty_cap, false), None)
        .liberties
}

/// Same as [`find_superstring_liberties`], but omits the liberties of the
/// string at `str` itself, presumably since those are treated elsewhere.
pub fn find_proper_superstring_liberties(
    pos: &Position,
    str: Point,
    liberty_cap: usize,
) -> Vec<Point> {
    SuperstringBuilder::new()
        .build(pos, str, &Query::liberties(liberty_cap, true), None)
        .liberties
}

/// Stones and liberties of the conservative superstring at `str`.
pub fn find_superstring_stones_and_liberties(
    pos: &Position,
    str: Point,
    liberty_cap: usize,
) -> (Vec<Point>, Vec<Point>) {
    let s = SuperstringBuilder::new().build(pos, str, &Query::stones_and_liberties(liberty_cap), None);
    (s.stones, s.liberties)
}

/// Analogous to [`chain_links`]: boundary chains of the superstring at
/// `str`, including those of the string itself. If `liberty_cap` is
/// nonzero, only chains with at most that many liberties are reported.
pub fn superstring_chainlinks(pos: &Position, str: Point, liberty_cap: usize) -> Vec<Point> {
    SuperstringBuilder::new()
        .build(pos, str, &Query::chainlinks(liberty_cap, false), None)
        .chains
}

/// Same as [`superstring_chainlinks`], omitting the boundary chains of
/// the string at `str` itself.
pub fn proper_superstring_chainlinks(pos: &Position, str: Point, liberty_cap: usize) -> Vec<Point> {
    SuperstringBuilder::new()
        .build(pos, str, &Query::chainlinks(liberty_cap, true), None)
        .chains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::parse_coord;

    /// Oracle with a fixed verdict for every string.
    struct Verdict {
        capturable: bool,
        defensible: bool,
        calls: usize,
    }

    impl TacticalOracle for Verdict {
        fn attack(&mut self, _pos: &Position, _str: Point) -> bool {
            self.calls += 1;
            self.capturable
        }

        fn find_defense(&mut self, _pos: &Position, _str: Point) -> bool {
            self.defensible
        }
    }

    fn pt(s: &str) -> Point {
        parse_coord(s).unwrap()
    }

    fn sorted(mut v: Vec<Point>) -> Vec<Point> {
        v.sort_unstable();
        v
    }

    fn pts(coords: &[&str]) -> Vec<Point> {
        sorted(coords.iter().map(|c| pt(c)).collect())
    }

    #[test]
    fn test_lone_stone() {
        let pos = Position::with_stones(&["D4"], &[]).unwrap();
        assert_eq!(find_superstring_conservative(&pos, pt("D4")), vec![pt("D4")]);
        assert_eq!(find_superstring_liberties(&pos, pt("D4"), 0).len(), 4);
        assert!(find_proper_superstring_liberties(&pos, pt("D4"), 0).is_empty());
    }

    #[test]
    fn test_bamboo_joint() {
        let pos = Position::with_stones(&["D4", "E4", "D6", "E6"], &[]).unwrap();
        let stones = find_superstring_conservative(&pos, pt("D4"));
        assert_eq!(sorted(stones), pts(&["D4", "E4", "D6", "E6"]));
    }

    #[test]
    fn test_tiger_mouth() {
        let pos = Position::with_stones(&["C4", "D5", "E4"], &[]).unwrap();
        let stones = find_superstring_conservative(&pos, pt("C4"));
        assert_eq!(sorted(stones), pts(&["C4", "D5", "E4"]));
    }

    #[test]
    fn test_ko_cut_breaks_stone_connection() {
        // White capturing D3 at D4 is a ko, so D4 is a real cutting point
        // for both stone-gathering forms.
        let pos =
            Position::with_stones(&["C4", "E4", "D5", "D3"], &["C3", "E3", "D2"]).unwrap();
        let mut never = Verdict {
            capturable: false,
            defensible: true,
            calls: 0,
        };
        let full = sorted(find_superstring(&pos, pt("C4"), &mut never));
        assert_eq!(full, pts(&["C4", "D5", "E4"]));
        let conservative = sorted(find_superstring_conservative(&pos, pt("C4")));
        assert_eq!(conservative, full);
        // Chain adjacency ignores ko: D4 still links D3, whose chain D2 is reported.
        let chains = proper_superstring_chainlinks(&pos, pt("C4"), 0);
        assert!(chains.contains(&pt("D2")));
        assert!(!chains.contains(&pt("C3")));
    }

    #[test]
    fn test_lunch_next_to_seed_in_atari() {
        // Black D4 has one liberty at D5 and touches the white stone E4.
        // Capturing E4 links the seed to F3, which only touches E4 diagonally.
        let pos = Position::with_stones(&["D4", "F3"], &["C4", "D3", "E4"]).unwrap();
        assert_eq!(find_liberties(&pos, pt("D4")), vec![pt("D5")]);
        let mut oracle = Verdict {
            capturable: true,
            defensible: false,
            calls: 0,
        };
        let full = sorted(find_superstring(&pos, pt("D4"), &mut oracle));
        assert_eq!(full, pts(&["D4", "F3"]));
        assert_eq!(find_superstring_conservative(&pos, pt("D4")), vec![pt("D4")]);
    }

    #[test]
    fn test_lunch_read_once_per_string() {
        let pos = Position::with_stones(&["D5", "E6", "E4"], &["E5"]).unwrap();
        let mut oracle = Verdict {
            capturable: true,
            defensible: false,
            calls: 0,
        };
        let stones = find_superstring(&pos, pt("D5"), &mut oracle);
        assert_eq!(sorted(stones), pts(&["D5", "E6", "E4"]));
        assert_eq!(oracle.calls, 1);
    }

    #[test]
    fn test_defended_lunch_connects_nothing() {
        let pos = Position::with_stones(&["D5", "E6", "E4"], &["E5"]).unwrap();
        let mut oracle = Verdict {
            capturable: true,
            defensible: true,
            calls: 0,
        };
        let stones = find_superstring(&pos, pt("D5"), &mut oracle);
        assert_eq!(stones, vec![pt("D5")]);
    }

    #[test]
    fn test_builder_reuse_gives_same_answer() {
        let pos = Position::with_stones(&["C4", "D5", "E4", "G4", "G6"], &["F5"]).unwrap();
        let mut builder = SuperstringBuilder::new();
        let first = builder.build(&pos, pt("C4"), &Query::conservative(), None);
        let second = builder.build(&pos, pt("C4"), &Query::conservative(), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_liberty_cap_limits_count() {
        let pos = Position::with_stones(&["D4", "E5", "F4", "E3"], &[]).unwrap();
        let libs = find_superstring_liberties(&pos, pt("D4"), 4);
        assert_eq!(libs.len(), 4);
        // Every stone is a lone stone with four liberties.
        // The empty center point is shared by all four.
        let all = find_superstring_liberties(&pos, pt("D4"), 0);
        assert_eq!(all.len(), 9);
    }

    #[test]
    fn test_capped_seed_is_not_expanded() {
        let pos = Position::with_stones(&["D4", "E5"], &[]).unwrap();
        let (stones, libs) = find_superstring_stones_and_liberties(&pos, pt("D4"), 3);
        assert_eq!(stones, vec![pt("D4")]);
        assert!(libs.is_empty());
    }

    #[test]
    #[should_panic(expected = "not a stone")]
    fn test_empty_seed_panics() {
        let pos = Position::new();
        find_superstring_conservative(&pos, pt("D4"));
    }
}
