use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::label::AtomLabel;

/// A geometry query the provider could not answer for one atom pair or group.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryQueryError {
    #[error("Unknown atom '{0}'")]
    UnknownAtom(AtomLabel),
    #[error("Atom '{atom}' has no coordinates in frame {frame}")]
    MissingCoordinates { atom: AtomLabel, frame: usize },
    #[error("Frame {frame} is out of range (trajectory has {frame_count} frames)")]
    FrameOutOfRange { frame: usize, frame_count: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Frame {frame} is out of range (trajectory has {frame_count} frames)")]
    FrameOutOfRange { frame: usize, frame_count: usize },
    #[error("Selection '{query}' could not be evaluated: {reason}")]
    Selection { query: String, reason: String },
    #[error(transparent)]
    Geometry(#[from] GeometryQueryError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to prepare '{detector}' detector: {source}")]
    Preparation {
        detector: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("Frame range [{begin}, {end}) selects no frames of a {frame_count}-frame trajectory")]
    EmptyRange {
        begin: usize,
        end: usize,
        frame_count: usize,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}
