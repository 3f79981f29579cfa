use super::ids::ResidueId;
use std::str::FromStr;

/// Represents the role or classification of an atom within a molecular structure.
///
/// Hydrogen-bond subtypes (backbone–backbone, backbone–sidechain, ...) and the ligand
/// detectors are driven by this classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Backbone atom of an amino-acid residue (e.g., N, CA, C, O).
    Backbone,
    /// Sidechain atom of an amino-acid residue.
    Sidechain,
    /// Atom of a non-polymer, non-solvent residue.
    Ligand,
    /// Solvent water atom.
    Water,
    /// Unknown or unclassified atom role.
    #[default]
    Other,
}

impl AtomRole {
    pub fn is_protein(&self) -> bool {
        matches!(self, AtomRole::Backbone | AtomRole::Sidechain)
    }
}

/// An atom of the topology. Coordinates are stored per frame, not on the atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "NZ", "OD1").
    pub name: String,
    /// The chemical element symbol, upper case (e.g., "C", "CL").
    pub element: String,
    /// The serial number from the source file, if any.
    pub serial: Option<usize>,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The role or classification of the atom in the molecular structure.
    pub role: AtomRole,
}

impl Atom {
    pub fn new(name: &str, element: &str, residue_id: ResidueId) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_ascii_uppercase(),
            serial: None,
            residue_id,
            role: AtomRole::default(),
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.as_str(), "H" | "D")
    }

    pub fn is_polar(&self) -> bool {
        matches!(self.element.as_str(), "N" | "O")
    }
}

impl FromStr for AtomRole {
    type Err = ();

    /// Parses a role name case-insensitively ("side-chain" and "side_chain" are accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backbone" => Ok(AtomRole::Backbone),
            "sidechain" | "side-chain" | "side_chain" => Ok(AtomRole::Sidechain),
            "ligand" => Ok(AtomRole::Ligand),
            "water" => Ok(AtomRole::Water),
            "other" | "unknown" => Ok(AtomRole::Other),
            _ => Err(()),
        }
    }
}
