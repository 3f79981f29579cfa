use crate::core::models::trajectory::{Frame, Trajectory};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading topology and coordinate files.
///
/// A topology read yields a [`Trajectory`] whose first frame holds the coordinates found in
/// the topology file itself. Coordinate reads are matched against an existing topology and
/// replace those frames when a separate trajectory file is supplied.
pub trait TrajectoryFile {
    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads the topology (and its coordinates as frame 0) from a buffered reader.
    fn read_topology(reader: &mut impl BufRead) -> Result<Trajectory, Self::Error>;

    /// Reads every frame of a coordinate file, matching atoms against `topology`.
    fn read_frames(
        reader: &mut impl BufRead,
        topology: &Trajectory,
    ) -> Result<Vec<Frame>, Self::Error>;

    fn read_topology_from_path<P: AsRef<Path>>(path: P) -> Result<Trajectory, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_topology(&mut reader)
    }

    fn read_frames_from_path<P: AsRef<Path>>(
        path: P,
        topology: &Trajectory,
    ) -> Result<Vec<Frame>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_frames(&mut reader, topology)
    }

    /// Loads a topology file and replaces its frames with those of a trajectory file.
    fn read_trajectory_from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        topology_path: P,
        trajectory_path: Q,
    ) -> Result<Trajectory, Self::Error> {
        let mut trajectory = Self::read_topology_from_path(topology_path)?;
        let frames = Self::read_frames_from_path(trajectory_path, &trajectory)?;
        trajectory.replace_frames(frames);
        Ok(trajectory)
    }
}
