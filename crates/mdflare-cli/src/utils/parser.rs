use mdflare::engine::detectors::DetectorKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Unknown interaction type '{0}'. Expected one of: sb, pc, ps, ts, vdw, hb, lhb."
    )]
    UnknownInteractionType(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },
}

/// Parses interaction tags into detectors, keeping the first occurrence of each.
///
/// Blank entries are ignored so that `"sb,,hb"` and trailing commas are accepted.
pub fn parse_detectors<S: AsRef<str>>(tags: &[S]) -> Result<Vec<DetectorKind>, ParseError> {
    let mut kinds = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(AsRef::as_ref) {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let kind: DetectorKind = tag
            .parse()
            .map_err(|_| ParseError::UnknownInteractionType(tag.to_string()))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Every detector; ligand hydrogen bonds only when a ligand residue is known.
pub fn all_detectors(has_ligand: bool) -> Vec<DetectorKind> {
    DetectorKind::ALL
        .into_iter()
        .filter(|kind| has_ligand || *kind != DetectorKind::LigandHydrogenBond)
        .collect()
}

pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidKeyValue(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            input: pair.to_string(),
        });
    }
    Ok((key, value.trim()))
}
