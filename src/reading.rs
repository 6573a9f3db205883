//! Tactical reading: can a string be captured, and can it be saved?
//!
//! [`TacticalOracle`] is the interface the superstring code uses to decide
//! whether an opposing string is a lunch. [`Reader`] is a compact
//! implementation driven by the budgets in [`DepthParams`]:
//!
//! - a string with one liberty is captured if the capture is legal
//! - a string with two liberties is read out move by move while the
//!   reading stack is below `depth`
//! - a string with three or more liberties is treated as safe
//!
//! Defenses consider the string's liberties and captures of adjacent
//! strings in atari. While the stack is within `superstring_depth`, the
//! defender also tries to capture strings in atari around the whole
//! superstring.

use crate::depth::DepthParams;
use crate::position::{
    Color, Point, Position, chain_links, find_liberties, is_legal, play_move, str_coord,
};
use crate::superstring::{Query, SuperstringBuilder};

/// Answers capture questions about strings.
pub trait TacticalOracle {
    /// True if the string at `str` can be captured.
    fn attack(&mut self, pos: &Position, str: Point) -> bool;

    /// True if the string at `str` is safe or has a move that saves it.
    fn find_defense(&mut self, pos: &Position, str: Point) -> bool;
}

/// Depth-limited tactical reader.
pub struct Reader<'a> {
    params: &'a DepthParams,
    builder: SuperstringBuilder,
    nodes: u64,
}

impl<'a> Reader<'a> {
    pub fn new(params: &'a DepthParams) -> Self {
        Reader {
            params,
            builder: SuperstringBuilder::new(),
            nodes: 0,
        }
    }

    /// Moves played while reading since creation or the last `clear_stats`.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn clear_stats(&mut self) {
        self.nodes = 0;
    }

    fn do_attack(&mut self, pos: &Position, str: Point, stackp: i32) -> bool {
        let color = pos.color[str];
        let attacker = color.other();
        let libs = find_liberties(pos, str);

        match libs.len() {
            0 => true,
            1 => is_legal(pos, libs[0], attacker),
            2 if stackp < self.params.depth => {
                for lib in libs {
                    let mut next = pos.clone();
                    if play_move(&mut next, lib, attacker).is_err() {
                        continue;
                    }
                    self.nodes += 1;
                    if !self.do_defend(&next, str, stackp + 1) {
                        return true;
                    }
                }
                false
            }
            _ => false,
        }
    }

    fn do_defend(&mut self, pos: &Position, str: Point, stackp: i32) -> bool {
        let color = pos.color[str];
        for mv in self.defense_moves(pos, str, stackp) {
            let mut next = pos.clone();
            if play_move(&mut next, mv, color).is_err() {
                continue;
            }
            self.nodes += 1;
            if !self.do_attack(&next, str, stackp + 1) {
                return true;
            }
        }
        false
    }

    /// Liberties first, then captures of adjacent strings in atari, then
    /// captures around the superstring.
    fn defense_moves(&mut self, pos: &Position, str: Point, stackp: i32) -> Vec<Point> {
        let mut moves = find_liberties(pos, str);
        let add = |moves: &mut Vec<Point>, pt: Point| {
            if !moves.contains(&pt) {
                moves.push(pt);
            }
        };

        for chain in chain_links(pos, str) {
            if let [lib] = find_liberties(pos, chain)[..] {
                add(&mut moves, lib);
            }
        }

        if stackp <= self.params.superstring_depth {
            let query = Query::chainlinks(1, true);
            for chain in self.builder.build(pos, str, &query, None).chains {
                if let [lib] = find_liberties(pos, chain)[..] {
                    add(&mut moves, lib);
                }
            }
        }
        moves
    }
}

impl TacticalOracle for Reader<'_> {
    fn attack(&mut self, pos: &Position, str: Point) -> bool {
        assert!(pos.color[str] != Color::Empty, "attack on empty point");
        let result = self.do_attack(pos, str, 0);
        log::debug!("attack {} -> {result} ({} nodes)", str_coord(str), self.nodes);
        result
    }

    fn find_defense(&mut self, pos: &Position, str: Point) -> bool {
        assert!(pos.color[str] != Color::Empty, "defense of empty point");
        let result = !self.do_attack(pos, str, 0) || self.do_defend(pos, str, 0);
        log::debug!("defend {} -> {result} ({} nodes)", str_coord(str), self.nodes);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthBudget;
    use crate::position::parse_coord;

    fn pt(s: &str) -> Point {
        parse_coord(s).unwrap()
    }

    #[test]
    fn test_atari_is_capturable() {
        let pos = Position::with_stones(&["D5", "E6", "E4"], &["E5"]).unwrap();
        let budget = DepthBudget::default();
        let mut reader = Reader::new(budget.params());
        assert!(reader.attack(&pos, pt("E5")));
        // Extending to F5 leaves three liberties.
        assert!(reader.find_defense(&pos, pt("E5")));
    }

    #[test]
    fn test_trapped_stone_has_no_defense() {
        let pos =
            Position::with_stones(&["D5", "E6", "F6", "E4", "F4", "G5"], &["E5"]).unwrap();
        let budget = DepthBudget::default();
        let mut reader = Reader::new(budget.params());
        assert!(reader.attack(&pos, pt("E5")));
        assert!(!reader.find_defense(&pos, pt("E5")));
    }

    #[test]
    fn test_open_stone_is_safe() {
        let pos = Position::with_stones(&[], &["E5"]).unwrap();
        let budget = DepthBudget::default();
        let mut reader = Reader::new(budget.params());
        assert!(!reader.attack(&pos, pt("E5")));
        assert!(reader.find_defense(&pos, pt("E5")));
        assert_eq!(reader.nodes(), 0);
    }

    #[test]
    fn test_two_liberties_in_open_escape() {
        let pos = Position::with_stones(&["D5", "E6"], &["E5"]).unwrap();
        let budget = DepthBudget::default();
        let mut reader = Reader::new(budget.params());
        assert!(!reader.attack(&pos, pt("E5")));
        assert!(reader.nodes() > 0);
        reader.clear_stats();
        assert_eq!(reader.nodes(), 0);
    }

    #[test]
    fn test_escape_by_capturing() {
        // Extending to F5 is suicide; capturing D5 at C5 is the only save.
        let pos = Position::with_stones(
            &["D5", "E6", "E4", "G5", "F6", "F4"],
            &["E5", "D6", "D4"],
        )
        .unwrap();
        let budget = DepthBudget::default();
        let mut reader = Reader::new(budget.params());
        assert!(reader.attack(&pos, pt("E5")));
        assert!(reader.find_defense(&pos, pt("E5")));
    }
}
