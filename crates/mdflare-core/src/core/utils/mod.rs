//! Shared helpers: atom-name classification tables and small geometry routines.

pub mod geometry;
pub mod identifiers;
