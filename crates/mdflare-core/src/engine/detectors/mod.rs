//! Per-frame interaction detectors.
//!
//! Each [`DetectorKind`] is prepared once per run: candidate atoms are collected from the
//! first frame of the processed range, then [`Detector::detect`] is called for every frame.
//! Detectors only read the trajectory through [`StructureProvider`] and report geometry
//! failures by skipping the affected pair.

mod hbond;
mod ligand;
mod pi_cation;
mod rings;
mod salt_bridge;
mod stacking;
mod vdw;

use super::config::DetectionConfig;
use super::error::{GeometryQueryError, ProviderError};
use super::provider::StructureProvider;
use super::scope::SelectionScope;
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::engine::config::GeometryCutoffs;
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub use hbond::HydrogenBondDetector;
pub use ligand::LigandHydrogenBondDetector;
pub use pi_cation::PiCationDetector;
pub use salt_bridge::SaltBridgeDetector;
pub use stacking::{StackingDetector, StackingMode};
pub use vdw::VanDerWaalsDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetectorKind {
    SaltBridge,
    PiCation,
    PiStacking,
    TStacking,
    VanDerWaals,
    HydrogenBond,
    LigandHydrogenBond,
}

static DETECTOR_TAGS: Map<&'static str, DetectorKind> = phf_map! {
    "sb" => DetectorKind::SaltBridge,
    "pc" => DetectorKind::PiCation,
    "ps" => DetectorKind::PiStacking,
    "ts" => DetectorKind::TStacking,
    "vdw" => DetectorKind::VanDerWaals,
    "hb" => DetectorKind::HydrogenBond,
    "lhb" => DetectorKind::LigandHydrogenBond,
    "hlb" => DetectorKind::LigandHydrogenBond,
};

impl DetectorKind {
    pub const ALL: [DetectorKind; 7] = [
        DetectorKind::SaltBridge,
        DetectorKind::PiCation,
        DetectorKind::PiStacking,
        DetectorKind::TStacking,
        DetectorKind::VanDerWaals,
        DetectorKind::HydrogenBond,
        DetectorKind::LigandHydrogenBond,
    ];

    /// Looks up a detector by interaction tag; `hlb` is accepted as a synonym of `lhb`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        DETECTOR_TAGS.get(tag).copied()
    }

    pub fn interaction_type(&self) -> InteractionType {
        match self {
            DetectorKind::SaltBridge => InteractionType::SaltBridge,
            DetectorKind::PiCation => InteractionType::PiCation,
            DetectorKind::PiStacking => InteractionType::PiStacking,
            DetectorKind::TStacking => InteractionType::TStacking,
            DetectorKind::VanDerWaals => InteractionType::VanDerWaals,
            DetectorKind::HydrogenBond => InteractionType::HydrogenBond,
            DetectorKind::LigandHydrogenBond => InteractionType::LigandHydrogenBond,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.interaction_type().tag()
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown interaction detector '{0}'")]
pub struct UnknownDetector(pub String);

impl FromStr for DetectorKind {
    type Err = UnknownDetector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().trim_start_matches('-');
        Self::from_tag(tag).ok_or_else(|| UnknownDetector(s.trim().to_string()))
    }
}

/// Everything a detector may consult while processing one frame.
pub struct FrameContext<'a> {
    pub provider: &'a dyn StructureProvider,
    pub frame: usize,
    pub scope: &'a SelectionScope,
    pub cutoffs: &'a GeometryCutoffs,
}

/// Records and skip counts accumulated for one frame.
#[derive(Debug, Default)]
pub struct FrameOutput {
    pub records: Vec<ContactRecord>,
    pub skipped_pairs: usize,
}

impl FrameOutput {
    pub fn push(&mut self, record: ContactRecord) {
        self.records.push(record);
    }

    pub fn skip(&mut self, detector: DetectorKind, error: &GeometryQueryError) {
        self.skipped_pairs += 1;
        debug!(%detector, %error, "Skipping candidate pair");
    }
}

pub trait Detector: Send + Sync {
    fn kind(&self) -> DetectorKind;

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput);
}

/// Collects candidates for `kind` from `frame` and returns a ready detector.
pub fn prepare(
    kind: DetectorKind,
    provider: &dyn StructureProvider,
    frame: usize,
    config: &DetectionConfig,
) -> Result<Box<dyn Detector>, ProviderError> {
    Ok(match kind {
        DetectorKind::SaltBridge => Box::new(SaltBridgeDetector::prepare(provider, frame)?),
        DetectorKind::PiCation => Box::new(PiCationDetector::prepare(provider, frame)?),
        DetectorKind::PiStacking => Box::new(StackingDetector::prepare(
            provider,
            frame,
            StackingMode::Parallel,
        )?),
        DetectorKind::TStacking => Box::new(StackingDetector::prepare(
            provider,
            frame,
            StackingMode::TShaped,
        )?),
        DetectorKind::VanDerWaals => {
            Box::new(VanDerWaalsDetector::prepare(provider, frame, &config.solvent)?)
        }
        DetectorKind::HydrogenBond => Box::new(HydrogenBondDetector::prepare(
            provider,
            frame,
            &config.solvent,
            config.cutoffs.hydrogen_bond_length,
        )?),
        DetectorKind::LigandHydrogenBond => Box::new(LigandHydrogenBondDetector::prepare(
            provider,
            frame,
            config.ligand.as_deref().unwrap_or_default(),
            &config.solvent,
            config.cutoffs.hydrogen_bond_length,
        )?),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::models::trajectory::{Trajectory, TrajectoryBuilder};
    use nalgebra::Point3;

    /// Builds a one-frame trajectory from `(chain, resnum, resname, atom, [x, y, z])` tuples.
    pub fn trajectory(atoms: &[(char, isize, &str, &str, [f64; 3])]) -> Trajectory {
        let mut builder = TrajectoryBuilder::new();
        for &(chain, number, resname, name, [x, y, z]) in atoms {
            builder.start_residue(chain, number, resname);
            builder.add_atom(name, None, Point3::new(x, y, z)).unwrap();
        }
        builder.build()
    }

    pub fn run(detector: &dyn Detector, provider: &dyn StructureProvider) -> FrameOutput {
        run_scoped(detector, provider, &SelectionScope::Unrestricted)
    }

    pub fn run_scoped(
        detector: &dyn Detector,
        provider: &dyn StructureProvider,
        scope: &SelectionScope,
    ) -> FrameOutput {
        let cutoffs = GeometryCutoffs::default();
        let ctx = FrameContext {
            provider,
            frame: 0,
            scope,
            cutoffs: &cutoffs,
        };
        let mut out = FrameOutput::default();
        detector.detect(&ctx, &mut out);
        out
    }

    pub fn lines(out: &FrameOutput) -> Vec<String> {
        out.records.iter().map(|r| r.to_string()).collect()
    }
}
