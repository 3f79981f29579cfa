use super::detectors::DetectorKind;
use crate::core::selection::{SelectionParseError, SelectionQuery};
use thiserror::Error;

pub const DEFAULT_SOLVENT: &str = "TIP3";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Cutoff '{name}' must be finite and positive (got {value})")]
    InvalidCutoff { name: &'static str, value: f64 },
    #[error("Angle '{name}' must lie in (0, 180] degrees (got {value})")]
    InvalidAngle { name: &'static str, value: f64 },
    #[error("Stride must be at least 1")]
    InvalidStride,
    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,
    #[error("Frame range begin ({begin}) is after its end ({end})")]
    InvalidFrameRange { begin: usize, end: usize },
    #[error("Invalid {which} selection: {source}")]
    InvalidSelection {
        which: &'static str,
        #[source]
        source: SelectionParseError,
    },
    #[error("A second selection was given without a first one")]
    SecondSelectionWithoutFirst,
    #[error("Ligand hydrogen bond detection requires a ligand residue name")]
    MissingLigand,
    #[error("At least one interaction type must be requested")]
    NoInteractionTypes,
}

/// Geometric thresholds used by the detectors. Distances in Angstroms, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryCutoffs {
    pub salt_bridge: f64,
    pub pi_cation_distance: f64,
    pub pi_cation_angle: f64,
    pub pi_stack_distance: f64,
    pub pi_stack_angle: f64,
    pub t_stack_distance: f64,
    pub t_stack_min_angle: f64,
    pub hbond_distance: f64,
    pub hbond_angle: f64,
    pub vdw_epsilon: f64,
    /// Maximum donor–hydrogen distance for a hydrogen to count as attached.
    pub hydrogen_bond_length: f64,
}

impl Default for GeometryCutoffs {
    fn default() -> Self {
        Self {
            salt_bridge: 4.0,
            pi_cation_distance: 6.0,
            pi_cation_angle: 60.0,
            pi_stack_distance: 7.0,
            pi_stack_angle: 45.0,
            t_stack_distance: 5.0,
            t_stack_min_angle: 60.0,
            hbond_distance: 3.5,
            hbond_angle: 70.0,
            vdw_epsilon: 0.5,
            hydrogen_bond_length: 1.3,
        }
    }
}

impl GeometryCutoffs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("salt_bridge", self.salt_bridge),
            ("pi_cation_distance", self.pi_cation_distance),
            ("pi_stack_distance", self.pi_stack_distance),
            ("t_stack_distance", self.t_stack_distance),
            ("hbond_distance", self.hbond_distance),
            ("hydrogen_bond_length", self.hydrogen_bond_length),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidCutoff { name, value });
            }
        }
        // Epsilon widens or narrows the radius sum; zero is a valid choice.
        if !self.vdw_epsilon.is_finite() || self.vdw_epsilon < 0.0 {
            return Err(ConfigError::InvalidCutoff {
                name: "vdw_epsilon",
                value: self.vdw_epsilon,
            });
        }

        let angles = [
            ("pi_cation_angle", self.pi_cation_angle),
            ("pi_stack_angle", self.pi_stack_angle),
            ("t_stack_min_angle", self.t_stack_min_angle),
            ("hbond_angle", self.hbond_angle),
        ];
        for (name, value) in angles {
            if !value.is_finite() || value <= 0.0 || value > 180.0 {
                return Err(ConfigError::InvalidAngle { name, value });
            }
        }
        Ok(())
    }
}

/// Frames `[begin, end)` visited every `stride` frames. `end = None` means "to the last frame".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub begin: usize,
    pub end: Option<usize>,
    pub stride: usize,
}

impl Default for FrameRange {
    fn default() -> Self {
        Self {
            begin: 0,
            end: None,
            stride: 1,
        }
    }
}

impl FrameRange {
    /// The exclusive end of the range once clamped to the trajectory length.
    pub fn resolved_end(&self, frame_count: usize) -> usize {
        self.end.map_or(frame_count, |end| end.min(frame_count))
    }

    pub fn frames(&self, frame_count: usize) -> Vec<usize> {
        let end = self.resolved_end(frame_count);
        (self.begin..end).step_by(self.stride.max(1)).collect()
    }
}

/// Validated, immutable settings for one detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub detectors: Vec<DetectorKind>,
    pub range: FrameRange,
    pub workers: usize,
    pub solvent: String,
    pub ligand: Option<String>,
    pub selection: Option<SelectionQuery>,
    pub selection2: Option<SelectionQuery>,
    pub cutoffs: GeometryCutoffs,
}

#[derive(Default)]
pub struct DetectionConfigBuilder {
    detectors: Option<Vec<DetectorKind>>,
    begin: Option<usize>,
    end: Option<usize>,
    stride: Option<usize>,
    workers: Option<usize>,
    solvent: Option<String>,
    ligand: Option<String>,
    selection: Option<String>,
    selection2: Option<String>,
    cutoffs: Option<GeometryCutoffs>,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detectors(mut self, detectors: Vec<DetectorKind>) -> Self {
        self.detectors = Some(detectors);
        self
    }
    pub fn begin(mut self, frame: usize) -> Self {
        self.begin = Some(frame);
        self
    }
    pub fn end(mut self, frame: usize) -> Self {
        self.end = Some(frame);
        self
    }
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
    pub fn solvent(mut self, residue_name: impl Into<String>) -> Self {
        self.solvent = Some(residue_name.into());
        self
    }
    pub fn ligand(mut self, residue_name: impl Into<String>) -> Self {
        self.ligand = Some(residue_name.into());
        self
    }
    pub fn selection(mut self, query: impl Into<String>) -> Self {
        self.selection = Some(query.into());
        self
    }
    pub fn selection2(mut self, query: impl Into<String>) -> Self {
        self.selection2 = Some(query.into());
        self
    }
    pub fn cutoffs(mut self, cutoffs: GeometryCutoffs) -> Self {
        self.cutoffs = Some(cutoffs);
        self
    }

    pub fn build(self) -> Result<DetectionConfig, ConfigError> {
        let mut detectors = self
            .detectors
            .ok_or(ConfigError::MissingParameter("detectors"))?;
        let mut seen = std::collections::HashSet::new();
        detectors.retain(|kind| seen.insert(*kind));
        if detectors.is_empty() {
            return Err(ConfigError::NoInteractionTypes);
        }

        let range = FrameRange {
            begin: self.begin.unwrap_or(0),
            end: self.end,
            stride: self.stride.unwrap_or(1),
        };
        if range.stride == 0 {
            return Err(ConfigError::InvalidStride);
        }
        if let Some(end) = range.end {
            if range.begin > end {
                return Err(ConfigError::InvalidFrameRange {
                    begin: range.begin,
                    end,
                });
            }
        }

        let workers = self.workers.unwrap_or(1);
        if workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }

        let cutoffs = self.cutoffs.unwrap_or_default();
        cutoffs.validate()?;

        let ligand = self.ligand.filter(|name| !name.trim().is_empty());
        if detectors.contains(&DetectorKind::LigandHydrogenBond) && ligand.is_none() {
            return Err(ConfigError::MissingLigand);
        }

        let selection = parse_selection(self.selection, "first")?;
        let selection2 = parse_selection(self.selection2, "second")?;
        if selection.is_none() && selection2.is_some() {
            return Err(ConfigError::SecondSelectionWithoutFirst);
        }

        Ok(DetectionConfig {
            detectors,
            range,
            workers,
            solvent: self
                .solvent
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOLVENT.to_string()),
            ligand,
            selection,
            selection2,
            cutoffs,
        })
    }
}

fn parse_selection(
    query: Option<String>,
    which: &'static str,
) -> Result<Option<SelectionQuery>, ConfigError> {
    query
        .map(|q| SelectionQuery::parse(&q))
        .transpose()
        .map_err(|source| ConfigError::InvalidSelection { which, source })
}
