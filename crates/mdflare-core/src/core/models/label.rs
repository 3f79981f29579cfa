use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

const FIELD_SEPARATOR: char = ':';
const RESIDUE_KEY_FIELDS: usize = 3;

/// Identifies a single atom as `chain:residue_name:residue_number:atom_name`.
///
/// Labels are unique within a frame and are compared, hashed and ordered as whole
/// strings. The only structure the library relies on is the residue prefix exposed by
/// [`AtomLabel::residue_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtomLabel(String);

impl AtomLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn from_parts(
        chain_id: char,
        residue_name: &str,
        residue_number: isize,
        atom_name: &str,
    ) -> Self {
        Self(format!(
            "{chain_id}{sep}{residue_name}{sep}{residue_number}{sep}{atom_name}",
            sep = FIELD_SEPARATOR
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `chain:residue_name:residue_number` prefix of this label.
    ///
    /// Labels with fewer than three fields yield every field they have, so a bare residue
    /// identifier maps onto itself.
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey(
            self.0
                .split(FIELD_SEPARATOR)
                .take(RESIDUE_KEY_FIELDS)
                .join(&FIELD_SEPARATOR.to_string()),
        )
    }
}

impl fmt::Display for AtomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AtomLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AtomLabel {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AtomLabel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity of a residue (`chain:residue_name:residue_number`), the node unit of flare graphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidueKey(String);

impl ResidueKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn chain(&self) -> Option<&str> {
        self.0.split(FIELD_SEPARATOR).next()
    }

    pub fn residue_number(&self) -> Option<isize> {
        self.0.split(FIELD_SEPARATOR).nth(2)?.trim().parse().ok()
    }

    /// Whether `other` is the preceding or following residue on the same chain.
    pub fn is_sequence_neighbor(&self, other: &ResidueKey) -> bool {
        if self.chain() != other.chain() {
            return false;
        }
        match (self.residue_number(), other.residue_number()) {
            (Some(a), Some(b)) => a.abs_diff(b) == 1,
            _ => false,
        }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResidueKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResidueKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn from_parts_joins_fields_with_colons() {
        let label = AtomLabel::from_parts('A', "ARG", 4, "NH1");
        assert_eq!(label.as_str(), "A:ARG:4:NH1");
        assert_eq!(label.to_string(), "A:ARG:4:NH1");
    }

    #[test]
    fn residue_key_drops_atom_name() {
        let label = AtomLabel::new("A:GLU:17:OE2");
        assert_eq!(label.residue_key(), ResidueKey::new("A:GLU:17"));
    }

    #[test]
    fn residue_key_of_short_label_keeps_all_fields() {
        assert_eq!(AtomLabel::new("A:LIG").residue_key().as_str(), "A:LIG");
        assert_eq!(AtomLabel::new("X").residue_key().as_str(), "X");
    }

    #[test]
    fn atoms_of_same_residue_share_a_key() {
        let a = AtomLabel::new("B:ASP:30:OD1");
        let b = AtomLabel::new("B:ASP:30:OD2");
        assert_eq!(a.residue_key(), b.residue_key());
    }

    #[test]
    fn labels_are_ordered_lexicographically() {
        let mut labels = vec![
            AtomLabel::new("B:ALA:1:CA"),
            AtomLabel::new("A:LYS:9:NZ"),
            AtomLabel::new("A:ASP:10:OD1"),
        ];
        labels.sort();
        let sorted: Vec<_> = labels.iter().map(AtomLabel::as_str).collect();
        assert_eq!(sorted, ["A:ASP:10:OD1", "A:LYS:9:NZ", "B:ALA:1:CA"]);
    }

    #[test]
    fn label_sets_can_be_queried_by_str() {
        let set: HashSet<AtomLabel> = [AtomLabel::new("A:ARG:4:NE")].into_iter().collect();
        assert!(set.contains("A:ARG:4:NE"));
        assert!(!set.contains("A:ARG:4:NH1"));
    }

    #[test]
    fn residue_key_exposes_chain_and_number() {
        let key = ResidueKey::new("C:TYR:-3");
        assert_eq!(key.chain(), Some("C"));
        assert_eq!(key.residue_number(), Some(-3));
        assert_eq!(ResidueKey::new("C:TYR").residue_number(), None);
    }

    #[test]
    fn sequence_neighbors_require_same_chain_and_adjacent_numbers() {
        let a = ResidueKey::new("A:ALA:10");
        assert!(a.is_sequence_neighbor(&ResidueKey::new("A:GLY:11")));
        assert!(a.is_sequence_neighbor(&ResidueKey::new("A:SER:9")));
        assert!(!a.is_sequence_neighbor(&ResidueKey::new("A:SER:12")));
        assert!(!a.is_sequence_neighbor(&ResidueKey::new("B:GLY:11")));
        assert!(!a.is_sequence_neighbor(&a.clone()));
    }
}
