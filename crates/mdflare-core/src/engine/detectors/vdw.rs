use super::{Detector, DetectorKind, FrameContext, FrameOutput};
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::core::models::label::{AtomLabel, ResidueKey};
use crate::core::utils::identifiers::vdw_radius;
use crate::engine::error::ProviderError;
use crate::engine::provider::{CandidateKind, StructureProvider};

struct VdwAtom {
    label: AtomLabel,
    residue: ResidueKey,
    radius: f64,
}

/// Heavy atoms of different, non-adjacent residues within touching distance.
pub struct VanDerWaalsDetector {
    atoms: Vec<VdwAtom>,
}

impl VanDerWaalsDetector {
    pub fn prepare(
        provider: &dyn StructureProvider,
        frame: usize,
        solvent: &str,
    ) -> Result<Self, ProviderError> {
        let kind = CandidateKind::HeavyAtom {
            solvent: solvent.to_string(),
        };
        let atoms = provider
            .candidate_atoms(frame, &kind)?
            .into_iter()
            .map(|label| VdwAtom {
                residue: label.residue_key(),
                radius: provider.element(&label).map_or(vdw_radius(""), vdw_radius),
                label,
            })
            .collect();
        Ok(Self { atoms })
    }
}

impl Detector for VanDerWaalsDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::VanDerWaals
    }

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput) {
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[i + 1..] {
                if a.residue == b.residue || a.residue.is_sequence_neighbor(&b.residue) {
                    continue;
                }
                if !ctx.scope.admits(&a.label, &b.label) {
                    continue;
                }
                let limit = a.radius + b.radius + ctx.cutoffs.vdw_epsilon;
                match ctx.provider.distance(ctx.frame, &a.label, &b.label) {
                    Ok(distance) if distance < limit => out.push(ContactRecord::pair(
                        ctx.frame,
                        InteractionType::VanDerWaals,
                        a.label.clone(),
                        b.label.clone(),
                    )),
                    Ok(_) => {}
                    Err(error) => out.skip(self.kind(), &error),
                }
            }
        }
    }
}
