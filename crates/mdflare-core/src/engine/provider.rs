use super::error::{GeometryQueryError, ProviderError};
use crate::core::models::atom::{Atom, AtomRole};
use crate::core::models::label::AtomLabel;
use crate::core::models::residue::Residue;
use crate::core::models::trajectory::Trajectory;
use crate::core::selection::SelectionQuery;
use crate::core::utils::identifiers::{
    anion_atom_names, aromatic_ring_atom_names, cation_atom_names,
};
use nalgebra::Point3;
use std::collections::HashSet;

/// The families of candidate atoms detectors ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// Carboxylate oxygens of ASP and GLU.
    Anion,
    /// Charged nitrogens of LYS, ARG and HIS.
    Cation,
    /// Aromatic ring atoms of PHE, TYR, TRP and HIS, in topology order.
    AromaticRing,
    /// Nitrogen and oxygen atoms of amino-acid residues.
    PolarProtein,
    /// Non-hydrogen atoms outside the solvent.
    HeavyAtom { solvent: String },
    /// Oxygens of the named solvent residue.
    SolventOxygen { solvent: String },
    /// Nitrogen and oxygen atoms of the named ligand residue.
    LigandPolar { ligand: String },
}

/// Read-only access to topology, coordinates and selections of a trajectory.
///
/// Detectors only see this trait, so any trajectory backend that can answer these queries
/// can drive contact detection. Implementations must be shareable across worker threads.
pub trait StructureProvider: Sync {
    fn frame_count(&self) -> usize;

    fn selection_atoms(
        &self,
        frame: usize,
        query: &SelectionQuery,
    ) -> Result<HashSet<AtomLabel>, ProviderError>;

    fn candidate_atoms(
        &self,
        frame: usize,
        kind: &CandidateKind,
    ) -> Result<Vec<AtomLabel>, ProviderError>;

    fn position(&self, frame: usize, atom: &AtomLabel) -> Result<Point3<f64>, GeometryQueryError>;

    fn distance(
        &self,
        frame: usize,
        a: &AtomLabel,
        b: &AtomLabel,
    ) -> Result<f64, GeometryQueryError> {
        let pa = self.position(frame, a)?;
        let pb = self.position(frame, b)?;
        Ok((pb - pa).norm())
    }

    /// Hydrogens of `atom`'s residue lying within `max_length` of it in `frame`.
    fn bonded_hydrogens(
        &self,
        frame: usize,
        atom: &AtomLabel,
        max_length: f64,
    ) -> Result<Vec<AtomLabel>, GeometryQueryError>;

    fn atom_role(&self, atom: &AtomLabel) -> Option<AtomRole>;

    fn element(&self, atom: &AtomLabel) -> Option<&str>;
}

fn matches_kind(kind: &CandidateKind, atom: &Atom, residue: &Residue) -> bool {
    let name = atom.name.as_str();
    match kind {
        CandidateKind::Anion => anion_atom_names(&residue.name).contains(&name),
        CandidateKind::Cation => cation_atom_names(&residue.name).contains(&name),
        CandidateKind::AromaticRing => aromatic_ring_atom_names(&residue.name).contains(&name),
        CandidateKind::PolarProtein => atom.role.is_protein() && atom.is_polar(),
        CandidateKind::HeavyAtom { solvent } => {
            !atom.is_hydrogen() && residue.name != *solvent && atom.role != AtomRole::Water
        }
        CandidateKind::SolventOxygen { solvent } => residue.name == *solvent && atom.element == "O",
        CandidateKind::LigandPolar { ligand } => residue.name == *ligand && atom.is_polar(),
    }
}

impl Trajectory {
    fn check_frame(&self, frame: usize) -> Result<(), ProviderError> {
        if frame >= self.frame_count() {
            return Err(ProviderError::FrameOutOfRange {
                frame,
                frame_count: self.frame_count(),
            });
        }
        Ok(())
    }
}

impl StructureProvider for Trajectory {
    fn frame_count(&self) -> usize {
        Trajectory::frame_count(self)
    }

    fn selection_atoms(
        &self,
        frame: usize,
        query: &SelectionQuery,
    ) -> Result<HashSet<AtomLabel>, ProviderError> {
        self.check_frame(frame)?;
        Ok(self
            .select(query)
            .into_iter()
            .filter_map(|id| self.label(id).cloned())
            .collect())
    }

    fn candidate_atoms(
        &self,
        frame: usize,
        kind: &CandidateKind,
    ) -> Result<Vec<AtomLabel>, ProviderError> {
        self.check_frame(frame)?;
        Ok(self
            .atoms_iter()
            .filter(|(_, atom)| {
                self.residue(atom.residue_id)
                    .is_some_and(|residue| matches_kind(kind, atom, residue))
            })
            .filter_map(|(id, _)| self.label(id).cloned())
            .collect())
    }

    fn position(&self, frame: usize, atom: &AtomLabel) -> Result<Point3<f64>, GeometryQueryError> {
        let id = self
            .atom_id(atom.as_str())
            .ok_or_else(|| GeometryQueryError::UnknownAtom(atom.clone()))?;
        let frame_data = self
            .frame(frame)
            .ok_or(GeometryQueryError::FrameOutOfRange {
                frame,
                frame_count: Trajectory::frame_count(self),
            })?;
        frame_data
            .position(id)
            .copied()
            .ok_or_else(|| GeometryQueryError::MissingCoordinates {
                atom: atom.clone(),
                frame,
            })
    }

    fn bonded_hydrogens(
        &self,
        frame: usize,
        atom: &AtomLabel,
        max_length: f64,
    ) -> Result<Vec<AtomLabel>, GeometryQueryError> {
        // Resolves the atom and its coordinates first so failures surface as errors.
        self.position(frame, atom)?;
        let id = self
            .atom_id(atom.as_str())
            .ok_or_else(|| GeometryQueryError::UnknownAtom(atom.clone()))?;
        Ok(self
            .hydrogens_near(frame, id, max_length)
            .into_iter()
            .filter_map(|h| self.label(h).cloned())
            .collect())
    }

    fn atom_role(&self, atom: &AtomLabel) -> Option<AtomRole> {
        self.atom_id(atom.as_str())
            .and_then(|id| self.atom(id))
            .map(|a| a.role)
    }

    fn element(&self, atom: &AtomLabel) -> Option<&str> {
        self.atom_id(atom.as_str())
            .and_then(|id| self.atom(id))
            .map(|a| a.element.as_str())
    }
}
