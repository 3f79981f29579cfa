//! # Workflows Module
//!
//! The two end-to-end pipelines of mdflare.
//!
//! - **Detection** ([`detect`]) - Runs the configured interaction detectors over a trajectory
//!   and returns the merged, frame-ordered contact records with their file header.
//! - **Flare aggregation** ([`flare`]) - Reads a contact stream and collapses it into a
//!   residue-level flare graph, optionally filtered and renamed through a label table.
//!
//! Both report progress and log phase boundaries; neither writes anything until its output
//! is fully assembled in memory.

pub mod detect;
pub mod flare;
