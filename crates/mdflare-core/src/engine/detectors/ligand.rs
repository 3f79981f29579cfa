use super::hbond::{BridgeTypes, PolarAtom, collect_polar, detect_water_bridges, is_hbond};
use super::{Detector, DetectorKind, FrameContext, FrameOutput};
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::core::models::atom::AtomRole;
use crate::engine::error::ProviderError;
use crate::engine::provider::{CandidateKind, StructureProvider};

/// Hydrogen bonds between a named ligand and the protein, direct or through water.
///
/// The ligand atom is always the first participant of a record.
pub struct LigandHydrogenBondDetector {
    ligand: Vec<PolarAtom>,
    protein: Vec<PolarAtom>,
    waters: Vec<PolarAtom>,
}

impl LigandHydrogenBondDetector {
    pub fn prepare(
        provider: &dyn StructureProvider,
        frame: usize,
        ligand: &str,
        solvent: &str,
        hydrogen_bond_length: f64,
    ) -> Result<Self, ProviderError> {
        let ligand = provider.candidate_atoms(
            frame,
            &CandidateKind::LigandPolar {
                ligand: ligand.to_string(),
            },
        )?;
        let protein = provider.candidate_atoms(frame, &CandidateKind::PolarProtein)?;
        let waters = provider.candidate_atoms(
            frame,
            &CandidateKind::SolventOxygen {
                solvent: solvent.to_string(),
            },
        )?;
        Ok(Self {
            ligand: collect_polar(provider, frame, ligand, hydrogen_bond_length),
            protein: collect_polar(provider, frame, protein, hydrogen_bond_length),
            waters: collect_polar(provider, frame, waters, hydrogen_bond_length),
        })
    }
}

impl Detector for LigandHydrogenBondDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::LigandHydrogenBond
    }

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput) {
        for ligand_atom in &self.ligand {
            for protein_atom in &self.protein {
                if !ctx.scope.admits(&ligand_atom.label, &protein_atom.label) {
                    continue;
                }
                match is_hbond(ctx, ligand_atom, protein_atom) {
                    Ok(true) => {
                        let itype = if protein_atom.role == AtomRole::Backbone {
                            InteractionType::LigandBackboneHydrogenBond
                        } else {
                            InteractionType::LigandSidechainHydrogenBond
                        };
                        out.push(ContactRecord::pair(
                            ctx.frame,
                            itype,
                            ligand_atom.label.clone(),
                            protein_atom.label.clone(),
                        ));
                    }
                    Ok(false) => {}
                    Err(error) => out.skip(self.kind(), &error),
                }
            }
        }

        detect_water_bridges(
            ctx,
            self.kind(),
            &self.ligand,
            Some(&self.protein),
            &self.waters,
            BridgeTypes {
                single: InteractionType::LigandWaterBridge,
                extended: InteractionType::ExtendedLigandWaterBridge,
            },
            out,
        );
    }
}
