//! Go-Reading: superstring analysis and reading budgets for a Go engine.
//!
//! Tactical reading often needs to look past a single string to the group
//! of strings that are practically connected. This crate builds such
//! superstrings and derives the depth and node budgets that govern how
//! deep the reading code is allowed to go at a given skill level.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and default reading budgets
//! - [`position`] - Board state, strings, liberties and move legality
//! - [`superstring`] - Superstring construction and its query variants
//! - [`reading`] - Tactical oracle used to detect capturable strings
//! - [`depth`] - Level-dependent depth parameters and overrides
//!
//! ## Example
//!
//! ```
//! use go_reading::depth::DepthBudget;
//! use go_reading::position::{Position, parse_coord};
//! use go_reading::reading::Reader;
//! use go_reading::superstring::{find_superstring, find_superstring_conservative};
//!
//! // Two black stones in a diagonal connection with both cutting points empty.
//! let pos = Position::with_stones(&["D4", "E5"], &[]).unwrap();
//! let d4 = parse_coord("D4").unwrap();
//!
//! let budget = DepthBudget::new(10);
//! let mut reader = Reader::new(budget.params());
//! assert_eq!(find_superstring(&pos, d4, &mut reader).len(), 2);
//! assert_eq!(find_superstring_conservative(&pos, d4).len(), 2);
//! ```

pub mod constants;
pub mod depth;
pub mod position;
pub mod reading;
pub mod superstring;
