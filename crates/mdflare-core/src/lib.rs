//! # mdflare Core Library
//!
//! Detection of non-covalent contacts (salt bridges, hydrogen bonds, pi-stacking, water
//! bridges and friends) across the frames of a molecular dynamics trajectory, and
//! aggregation of the per-frame observations into a temporal "flare" graph over residues.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomLabel`, `ResidueKey`,
//!   `Trajectory`), contact records and their text format, the flare graph model and its
//!   builder, the selection language and PDB I/O.
//!
//! - **[`engine`]: The Logic Core.** The `StructureProvider` capability interface, the
//!   selection-scope filter, the interaction detectors and the frame scheduler that runs
//!   them in parallel over a trajectory.
//!
//! - **[`workflows`]: The Public API.** The two pipeline entry points: contact detection
//!   over a trajectory and flare graph aggregation over a contact stream.

pub mod core;
pub mod engine;
pub mod workflows;
