use super::ids::AtomId;
use super::label::ResidueKey;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA)
    Glycine,    // Glycine (GLY)
    Isoleucine, // Isoleucine (ILE)
    Leucine,    // Leucine (LEU)
    Proline,    // Proline (PRO)
    Valine,     // Valine (VAL)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE)
    Tryptophan,    // Tryptophan (TRP)
    Tyrosine,      // Tyrosine (TYR)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN)
    Cysteine,   // Cysteine (CYS)
    Glutamine,  // Glutamine (GLN)
    Serine,     // Serine (SER)
    Threonine,  // Threonine (THR)
    Methionine, // Methionine (MET)

    // --- Positively Charged (Basic) ---
    Arginine, // Arginine (ARG)
    Lysine,   // Lysine (LYS)

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // Aspartic Acid (ASP)
    GlutamicAcid, // Glutamic Acid (GLU)

    // --- Histidine, all protonation states (HIS, HSD, HSE, HSP, HID, HIE, HIP) ---
    Histidine,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown amino acid residue name: '{0}'")]
pub struct ParseAminoAcidError(pub String);

impl FromStr for AminoAcidType {
    type Err = ParseAminoAcidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALA" => Ok(Self::Alanine),
            "GLY" => Ok(Self::Glycine),
            "ILE" => Ok(Self::Isoleucine),
            "LEU" => Ok(Self::Leucine),
            "PRO" => Ok(Self::Proline),
            "VAL" => Ok(Self::Valine),
            "PHE" => Ok(Self::Phenylalanine),
            "TRP" => Ok(Self::Tryptophan),
            "TYR" => Ok(Self::Tyrosine),
            "ASN" => Ok(Self::Asparagine),
            "CYS" | "CYX" => Ok(Self::Cysteine),
            "GLN" => Ok(Self::Glutamine),
            "SER" => Ok(Self::Serine),
            "THR" => Ok(Self::Threonine),
            "MET" => Ok(Self::Methionine),
            "ARG" => Ok(Self::Arginine),
            "LYS" => Ok(Self::Lysine),
            "ASP" => Ok(Self::AsparticAcid),
            "GLU" => Ok(Self::GlutamicAcid),
            "HIS" | "HSD" | "HSE" | "HSP" | "HID" | "HIE" | "HIP" => Ok(Self::Histidine),
            other => Err(ParseAminoAcidError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                      // Residue sequence number from source file
    pub name: String,                       // Name of the residue (e.g., "ARG", "TIP3")
    pub chain_id: char,                     // Chain identifier (e.g., 'A')
    pub(crate) atoms: Vec<AtomId>,          // Atoms in insertion order
}

impl Residue {
    pub(crate) fn new(chain_id: char, number: isize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_id: AtomId) {
        self.atoms.push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn amino_acid(&self) -> Option<AminoAcidType> {
        self.name.parse().ok()
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey::new(format!("{}:{}:{}", self.chain_id, self.name, self.number))
    }
}
