//! Integration tests for superstring construction.
//!
//! Hand-made positions check the individual connection rules; random
//! legal positions check the structural guarantees of every query
//! variant. All coordinates fit on a 9x9 board.

use go_reading::constants::{N, NS};
use go_reading::depth::DepthBudget;
use go_reading::position::{
    Color, Point, Position, find_liberties, find_stones, parse_coord, play_move,
};
use go_reading::reading::Reader;
use go_reading::superstring::{
    Query, SuperstringBuilder, find_proper_superstring_liberties, find_superstring,
    find_superstring_conservative, find_superstring_liberties,
    find_superstring_stones_and_liberties, proper_superstring_chainlinks, superstring_chainlinks,
};

// =============================================================================
// Helper functions
// =============================================================================

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

fn has_duplicates(v: &[Point]) -> bool {
    let s = sorted(v.to_vec());
    s.windows(2).any(|w| w[0] == w[1])
}

/// Play `moves` random moves, alternating colors and skipping illegal ones.
fn random_position(rng: &mut fastrand::Rng, moves: usize) -> Position {
    let mut pos = Position::new();
    let mut color = Color::Black;
    for _ in 0..moves {
        let pt = rng.usize(1..=N) * NS + rng.usize(1..=N);
        if play_move(&mut pos, pt, color).is_ok() {
            color = color.other();
        }
    }
    pos
}

fn stones_of(pos: &Position) -> Vec<Point> {
    (0..pos.color.len())
        .filter(|&pt| pos.color[pt].is_stone())
        .collect()
}

// =============================================================================
// Connection rules
// =============================================================================

#[test]
fn test_diagonal_diamond() {
    // Rule 4 links the centre to all four diagonal stones.
    let pos = Position::with_stones(&["E5", "D6", "F6", "D4", "F4"], &[]).unwrap();
    let expected = pts(&["E5", "D6", "F6", "D4", "F4"]);

    let budget = DepthBudget::default();
    let mut reader = Reader::new(budget.params());
    assert_eq!(sorted(find_superstring(&pos, pt("E5"), &mut reader)), expected);
    assert_eq!(sorted(find_superstring_conservative(&pos, pt("E5"))), expected);
    // Every member yields the same superstring.
    assert_eq!(sorted(find_superstring_conservative(&pos, pt("F4"))), expected);
}

#[test]
fn test_diagonal_cut_by_opponent() {
    // E4 blocks one side of the D4-E5 diagonal and D5 is safe for white
    // (two liberties after playing there), so the stones stay apart.
    let pos = Position::with_stones(&["D4", "E5"], &["E4"]).unwrap();
    assert_eq!(find_superstring_conservative(&pos, pt("D4")), vec![pt("D4")]);
}

#[test]
fn test_connection_through_captured_stone() {
    let pos = Position::with_stones(&["D5", "E6", "F6", "E4", "F4", "G5"], &["E5"]).unwrap();
    let budget = DepthBudget::default();
    let mut reader = Reader::new(budget.params());

    let full = sorted(find_superstring(&pos, pt("D5"), &mut reader));
    assert_eq!(full, pts(&["D5", "E6", "F6", "E4", "F4", "G5"]));

    assert_eq!(find_superstring_conservative(&pos, pt("D5")), vec![pt("D5")]);
}

#[test]
fn test_ko_point_cuts_both_stone_forms() {
    // White D4 would capture D3 as a ko.
    let pos = Position::with_stones(&["C4", "E4", "D5", "D3"], &["C3", "E3", "D2"]).unwrap();
    let budget = DepthBudget::default();
    let mut reader = Reader::new(budget.params());

    for seed in ["C4", "D5", "E4", "D3"] {
        let full = find_superstring(&pos, pt(seed), &mut reader);
        for stone in find_superstring_conservative(&pos, pt(seed)) {
            assert!(full.contains(&stone), "seed {seed}: conservative stone outside full");
        }
    }
    assert_eq!(find_superstring_conservative(&pos, pt("D3")), vec![pt("D3")]);
}

#[test]
fn test_stones_and_liberties_agree_with_separate_queries() {
    let pos = Position::with_stones(&["C3", "D4", "F4", "D6"], &["E4"]).unwrap();
    let (stones, libs) = find_superstring_stones_and_liberties(&pos, pt("D4"), 0);
    assert_eq!(sorted(stones), sorted(find_superstring_conservative(&pos, pt("D4"))));
    assert_eq!(sorted(libs), sorted(find_superstring_liberties(&pos, pt("D4"), 0)));
}

#[test]
fn test_chainlinks_report_origins() {
    // White stones touching a black tiger's mouth.
    let pos = Position::with_stones(&["C4", "D5", "E4"], &["C5", "E5", "F4"]).unwrap();
    let chains = superstring_chainlinks(&pos, pt("C4"), 0);
    assert!(!has_duplicates(&chains));
    for &c in &chains {
        assert_eq!(pos.color[c], Color::White);
        assert_eq!(find_stones(&pos, c).into_iter().min(), Some(c));
    }
    let proper = proper_superstring_chainlinks(&pos, pt("C4"), 0);
    assert!(proper.iter().all(|c| chains.contains(c)));
}

// =============================================================================
// Properties on random positions
// =============================================================================

const SEEDS: u64 = 40;

#[test]
fn test_random_superstrings_contain_seed_string() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let pos = random_position(&mut rng, 40);
        let budget = DepthBudget::new(0);
        let mut reader = Reader::new(budget.params());

        for s in stones_of(&pos) {
            let full = find_superstring(&pos, s, &mut reader);
            let conservative = find_superstring_conservative(&pos, s);
            for stone in find_stones(&pos, s) {
                assert!(full.contains(&stone), "seed {seed}: full misses own stone");
                assert!(conservative.contains(&stone), "seed {seed}: conservative misses own stone");
            }
            assert!(full.iter().all(|&p| pos.color[p] == pos.color[s]));
            assert!(!has_duplicates(&full));
            assert!(!has_duplicates(&conservative));
        }
    }
}

#[test]
fn test_random_conservative_within_full() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(1000 + seed);
        let pos = random_position(&mut rng, 40);
        let budget = DepthBudget::new(0);
        let mut reader = Reader::new(budget.params());

        for s in stones_of(&pos) {
            let full = find_superstring(&pos, s, &mut reader);
            for stone in find_superstring_conservative(&pos, s) {
                assert!(full.contains(&stone), "seed {seed}: conservative stone outside full");
            }
        }
    }
}

#[test]
fn test_random_liberties() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(2000 + seed);
        let pos = random_position(&mut rng, 50);

        for s in stones_of(&pos) {
            let libs = find_superstring_liberties(&pos, s, 0);
            assert!(libs.iter().all(|&l| pos.color[l] == Color::Empty));
            assert!(!has_duplicates(&libs));

            // The proper variant is exactly the rest after the seed's own liberties.
            let own = find_liberties(&pos, s);
            let proper = find_proper_superstring_liberties(&pos, s, 0);
            assert!(proper.iter().all(|l| !own.contains(l)));
            let mut union = proper.clone();
            union.extend_from_slice(&own);
            assert_eq!(sorted(union), sorted(libs.clone()), "seed {seed}");

            for cap in 1..=4 {
                let capped = find_superstring_liberties(&pos, s, cap);
                assert!(capped.len() <= cap, "seed {seed}: cap {cap} exceeded");
                assert!(!has_duplicates(&capped));
                assert!(capped.iter().all(|&l| pos.color[l] == Color::Empty));
            }
        }
    }
}

#[test]
fn test_random_chainlinks() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(3000 + seed);
        let pos = random_position(&mut rng, 50);

        for s in stones_of(&pos) {
            let chains = superstring_chainlinks(&pos, s, 0);
            assert!(!has_duplicates(&chains));
            assert!(chains.iter().all(|&c| pos.color[c] == pos.color[s].other()));

            let capped = superstring_chainlinks(&pos, s, 2);
            assert!(capped.iter().all(|&c| find_liberties(&pos, c).len() <= 2));
            assert!(capped.iter().all(|c| chains.contains(c)));
        }
    }
}

#[test]
fn test_builder_reuse_matches_fresh_builder() {
    let mut rng = fastrand::Rng::with_seed(7);
    let pos = random_position(&mut rng, 50);
    let mut builder = SuperstringBuilder::new();
    let query = Query::stones_and_liberties(3);

    for s in stones_of(&pos) {
        let reused = builder.build(&pos, s, &query, None);
        let fresh = SuperstringBuilder::new().build(&pos, s, &query, None);
        assert_eq!(reused, fresh);
    }
}
