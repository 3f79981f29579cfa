//! # Core Models Module
//!
//! Data structures describing a simulated molecular system: the static topology (atoms
//! grouped into residues) and the per-frame coordinates that make it a trajectory.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom attributes and their structural role
//! - [`residue`] - Residues and amino-acid classification
//! - [`label`] - Textual atom labels (`chain:resname:resnum:atom`) and residue keys
//! - [`trajectory`] - The topology plus an ordered list of coordinate frames
//! - [`ids`] - Slot-map keys for atoms and residues
//!
//! ## Usage
//!
//! ```ignore
//! use mdflare::core::models::trajectory::TrajectoryBuilder;
//!
//! let mut builder = TrajectoryBuilder::new();
//! builder.start_residue('A', 4, "ARG");
//! builder.add_atom("NH1", None, Point3::new(0.0, 0.0, 0.0))?;
//! let trajectory = builder.build();
//! ```

pub mod atom;
pub mod ids;
pub mod label;
pub mod residue;
pub mod trajectory;
