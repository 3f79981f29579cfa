use phf::{Map, Set, phf_map, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "C", "O", "OXT", "H1", "H2", "H3", "NT",
    "HT1", "HT2", "HT3", "OT1", "OT2", "HC", "HOXT", "HA1", "HA2", "1HA", "2HA",
};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "TIP3", "TIP3P", "TIP4", "TIP4P", "TIP5", "SPC", "SOL", "H2O",
};

static ANION_ATOMS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "ASP" => &["OD1", "OD2"],
    "GLU" => &["OE1", "OE2"],
};

static CATION_ATOMS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "LYS" => &["NZ"],
    "ARG" => &["NE", "NH1", "NH2"],
    "HIS" => &["ND1", "NE2"],
    "HSD" => &["ND1", "NE2"],
    "HSE" => &["ND1", "NE2"],
    "HSP" => &["ND1", "NE2"],
    "HID" => &["ND1", "NE2"],
    "HIE" => &["ND1", "NE2"],
    "HIP" => &["ND1", "NE2"],
};

static AROMATIC_RING_ATOMS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "PHE" => &["CG", "CD1", "CD2", "CE1", "CE2", "CZ"],
    "TYR" => &["CG", "CD1", "CD2", "CE1", "CE2", "CZ"],
    "TRP" => &["CD2", "CE2", "CE3", "CZ2", "CZ3", "CH2"],
    "HIS" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "HSD" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "HSE" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "HSP" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "HID" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "HIE" => &["CG", "ND1", "CD2", "CE1", "NE2"],
    "HIP" => &["CG", "ND1", "CD2", "CE1", "NE2"],
};

// Bondi radii in Angstroms.
static VDW_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.10, "D" => 1.10,
    "C" => 1.70, "N" => 1.55, "O" => 1.52,
    "F" => 1.47, "P" => 1.80, "S" => 1.80,
    "CL" => 1.75, "BR" => 1.85, "I" => 1.98,
    "SE" => 1.90, "NA" => 2.27, "K" => 2.75, "MG" => 1.73,
};

const DEFAULT_VDW_RADIUS: f64 = 1.70;

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn anion_atom_names(residue_name: &str) -> &'static [&'static str] {
    ANION_ATOMS.get(residue_name.trim()).copied().unwrap_or(&[])
}

pub fn cation_atom_names(residue_name: &str) -> &'static [&'static str] {
    CATION_ATOMS.get(residue_name.trim()).copied().unwrap_or(&[])
}

pub fn aromatic_ring_atom_names(residue_name: &str) -> &'static [&'static str] {
    AROMATIC_RING_ATOMS
        .get(residue_name.trim())
        .copied()
        .unwrap_or(&[])
}

pub fn vdw_radius(element: &str) -> f64 {
    VDW_RADII
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_VDW_RADIUS)
}

/// Guesses the element of an atom from its name when the source file carries none.
///
/// Leading digits are skipped ("1HB" is a hydrogen) and the first letter is taken, which
/// matches PDB naming for every element occurring in proteins and water.
pub fn infer_element(atom_name: &str) -> String {
    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_backbone_atom_recognizes_standard_backbone_atoms() {
        assert!(is_backbone_atom("N"));
        assert!(is_backbone_atom("CA"));
        assert!(is_backbone_atom("C"));
        assert!(is_backbone_atom("O"));
        assert!(is_backbone_atom("OXT"));
    }

    #[test]
    fn is_backbone_atom_is_case_sensitive_and_trims_whitespace() {
        assert!(!is_backbone_atom("ca"));
        assert!(is_backbone_atom(" CA "));
        assert!(!is_backbone_atom("CB"));
    }

    #[test]
    fn water_residue_names_cover_common_models() {
        assert!(is_water_residue("TIP3"));
        assert!(is_water_residue("HOH"));
        assert!(is_water_residue(" WAT "));
        assert!(!is_water_residue("ALA"));
    }

    #[test]
    fn charged_atom_tables_cover_acidic_and_basic_residues() {
        assert_eq!(anion_atom_names("ASP"), &["OD1", "OD2"]);
        assert_eq!(anion_atom_names("GLU"), &["OE1", "OE2"]);
        assert!(anion_atom_names("LYS").is_empty());
        assert_eq!(cation_atom_names("LYS"), &["NZ"]);
        assert_eq!(cation_atom_names("ARG"), &["NE", "NH1", "NH2"]);
        assert_eq!(cation_atom_names("HSP"), &["ND1", "NE2"]);
        assert!(cation_atom_names("ASP").is_empty());
    }

    #[test]
    fn aromatic_ring_table_uses_six_membered_ring_of_tryptophan() {
        assert_eq!(aromatic_ring_atom_names("TRP").len(), 6);
        assert!(!aromatic_ring_atom_names("TRP").contains(&"CG"));
        assert_eq!(aromatic_ring_atom_names("PHE")[0], "CG");
        assert!(aromatic_ring_atom_names("ALA").is_empty());
    }

    #[test]
    fn vdw_radius_falls_back_to_carbon() {
        assert_eq!(vdw_radius("O"), 1.52);
        assert_eq!(vdw_radius("cl"), 1.75);
        assert_eq!(vdw_radius("XX"), DEFAULT_VDW_RADIUS);
    }

    #[test]
    fn infer_element_takes_first_letter() {
        assert_eq!(infer_element("CA"), "C");
        assert_eq!(infer_element("1HB"), "H");
        assert_eq!(infer_element(" OD1"), "O");
        assert_eq!(infer_element("123"), "");
    }
}
