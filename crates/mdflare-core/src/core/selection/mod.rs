//! A small, static atom-selection language.
//!
//! Selections name subsets of atoms by chain, residue, atom name, element or role and are
//! used to scope contact detection to (or between) parts of a system. Queries are parsed
//! once when a run is configured; evaluation is a pure predicate over atom attributes.

pub mod query;

pub use query::{AtomContext, SelectionParseError, SelectionQuery};
