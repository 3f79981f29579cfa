//! # Core Module
//!
//! Fundamental building blocks shared by the detection engine and the aggregation
//! workflows.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atom labels, residue keys, atoms, residues
//!   and the in-memory multi-frame `Trajectory`
//! - **Contact Records** ([`contacts`]) - Interaction types, per-frame contact records and
//!   the plain-text contact file format
//! - **Flare Graphs** ([`flare`]) - Flare-label tables, the graph model and its builder
//! - **Atom Selections** ([`selection`]) - A small static selection language
//! - **File I/O** ([`io`]) - Reading topologies and trajectories from PDB files
//! - **Utilities** ([`utils`]) - Atom-name classification tables and geometry helpers

pub mod contacts;
pub mod flare;
pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
