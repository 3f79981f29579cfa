//! Provides input functionality for molecular structure and trajectory files.
//!
//! Readers implement [`traits::TrajectoryFile`], which turns a topology file into an
//! in-memory [`Trajectory`](crate::core::models::trajectory::Trajectory) and matches the
//! models of a coordinate file against it frame by frame.

pub mod pdb;
pub mod traits;
