use super::itype::InteractionType;
use crate::core::models::label::AtomLabel;
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Interaction type '{itype}' requires {expected} participants, got {actual}")]
pub struct ParticipantCountError {
    pub itype: InteractionType,
    pub expected: usize,
    pub actual: usize,
}

/// One observation of an interaction in one frame.
///
/// Water-mediated types list the two solute atoms first, then the bridging water(s).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactRecord {
    frame: usize,
    interaction_type: InteractionType,
    participants: Vec<AtomLabel>,
}

impl ContactRecord {
    pub fn try_new(
        frame: usize,
        interaction_type: InteractionType,
        participants: Vec<AtomLabel>,
    ) -> Result<Self, ParticipantCountError> {
        let expected = interaction_type.participant_count();
        if participants.len() != expected {
            return Err(ParticipantCountError {
                itype: interaction_type,
                expected,
                actual: participants.len(),
            });
        }
        Ok(Self {
            frame,
            interaction_type,
            participants,
        })
    }

    pub(crate) fn pair(
        frame: usize,
        interaction_type: InteractionType,
        a: AtomLabel,
        b: AtomLabel,
    ) -> Self {
        Self {
            frame,
            interaction_type,
            participants: vec![a, b],
        }
    }

    pub(crate) fn bridge(
        frame: usize,
        interaction_type: InteractionType,
        a: AtomLabel,
        b: AtomLabel,
        waters: &[AtomLabel],
    ) -> Self {
        let mut participants = Vec::with_capacity(2 + waters.len());
        participants.push(a);
        participants.push(b);
        participants.extend(waters.iter().cloned());
        Self {
            frame,
            interaction_type,
            participants,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn interaction_type(&self) -> InteractionType {
        self.interaction_type
    }

    pub fn participants(&self) -> &[AtomLabel] {
        &self.participants
    }

    /// The two atoms whose residues define the aggregated edge.
    pub fn primary_pair(&self) -> (&AtomLabel, &AtomLabel) {
        (&self.participants[0], &self.participants[1])
    }
}

/// Renders the record as a contact-file line: `frame itype atom1 atom2 [...]`.
impl fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.frame,
            self.interaction_type,
            self.participants.iter().join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_validates_arity() {
        let ok = ContactRecord::try_new(
            0,
            InteractionType::SaltBridge,
            vec!["A:ASP:1:OD1".into(), "A:LYS:2:NZ".into()],
        );
        assert!(ok.is_ok());

        let err = ContactRecord::try_new(
            0,
            InteractionType::WaterBridge,
            vec!["A:ASP:1:OD1".into(), "A:LYS:2:NZ".into()],
        )
        .unwrap_err();
        assert_eq!(err.expected, 3);
        assert_eq!(err.actual, 2);
    }

    #[test]
    fn display_matches_contact_file_line() {
        let record = ContactRecord::bridge(
            12,
            InteractionType::WaterBridge,
            "A:SER:3:OG".into(),
            "A:THR:9:OG1".into(),
            &["W:TIP3:40:OH2".into()],
        );
        assert_eq!(record.to_string(), "12 wb A:SER:3:OG A:THR:9:OG1 W:TIP3:40:OH2");
        let (a, b) = record.primary_pair();
        assert_eq!((a.as_str(), b.as_str()), ("A:SER:3:OG", "A:THR:9:OG1"));
    }
}
