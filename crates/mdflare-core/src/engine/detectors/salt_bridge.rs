use super::{Detector, DetectorKind, FrameContext, FrameOutput};
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::core::models::label::AtomLabel;
use crate::engine::error::ProviderError;
use crate::engine::provider::{CandidateKind, StructureProvider};

/// Anion–cation pairs closer than the salt-bridge cutoff.
pub struct SaltBridgeDetector {
    anions: Vec<AtomLabel>,
    cations: Vec<AtomLabel>,
}

impl SaltBridgeDetector {
    pub fn prepare(provider: &dyn StructureProvider, frame: usize) -> Result<Self, ProviderError> {
        Ok(Self {
            anions: provider.candidate_atoms(frame, &CandidateKind::Anion)?,
            cations: provider.candidate_atoms(frame, &CandidateKind::Cation)?,
        })
    }
}

impl Detector for SaltBridgeDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::SaltBridge
    }

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput) {
        for anion in &self.anions {
            for cation in &self.cations {
                if !ctx.scope.admits(anion, cation) {
                    continue;
                }
                match ctx.provider.distance(ctx.frame, anion, cation) {
                    Ok(distance) if distance < ctx.cutoffs.salt_bridge => out.push(
                        ContactRecord::pair(
                            ctx.frame,
                            InteractionType::SaltBridge,
                            anion.clone(),
                            cation.clone(),
                        ),
                    ),
                    Ok(_) => {}
                    Err(error) => out.skip(self.kind(), &error),
                }
            }
        }
    }
}
