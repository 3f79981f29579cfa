use phf::{Map, phf_map};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of interaction types a contact record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionType {
    SaltBridge,
    PiCation,
    PiStacking,
    TStacking,
    VanDerWaals,
    HydrogenBond,
    LigandHydrogenBond,
    BackboneBackboneHydrogenBond,
    BackboneSidechainHydrogenBond,
    SidechainSidechainHydrogenBond,
    WaterBridge,
    ExtendedWaterBridge,
    LigandSidechainHydrogenBond,
    LigandBackboneHydrogenBond,
    LigandWaterBridge,
    ExtendedLigandWaterBridge,
}

static TAGS: Map<&'static str, InteractionType> = phf_map! {
    "sb" => InteractionType::SaltBridge,
    "pc" => InteractionType::PiCation,
    "ps" => InteractionType::PiStacking,
    "ts" => InteractionType::TStacking,
    "vdw" => InteractionType::VanDerWaals,
    "hb" => InteractionType::HydrogenBond,
    "lhb" => InteractionType::LigandHydrogenBond,
    "hbbb" => InteractionType::BackboneBackboneHydrogenBond,
    "hbsb" => InteractionType::BackboneSidechainHydrogenBond,
    "hbss" => InteractionType::SidechainSidechainHydrogenBond,
    "wb" => InteractionType::WaterBridge,
    "wb2" => InteractionType::ExtendedWaterBridge,
    "hls" => InteractionType::LigandSidechainHydrogenBond,
    "hlb" => InteractionType::LigandBackboneHydrogenBond,
    "lwb" => InteractionType::LigandWaterBridge,
    "lwb2" => InteractionType::ExtendedLigandWaterBridge,
};

impl InteractionType {
    pub const ALL: [InteractionType; 16] = [
        InteractionType::SaltBridge,
        InteractionType::PiCation,
        InteractionType::PiStacking,
        InteractionType::TStacking,
        InteractionType::VanDerWaals,
        InteractionType::HydrogenBond,
        InteractionType::LigandHydrogenBond,
        InteractionType::BackboneBackboneHydrogenBond,
        InteractionType::BackboneSidechainHydrogenBond,
        InteractionType::SidechainSidechainHydrogenBond,
        InteractionType::WaterBridge,
        InteractionType::ExtendedWaterBridge,
        InteractionType::LigandSidechainHydrogenBond,
        InteractionType::LigandBackboneHydrogenBond,
        InteractionType::LigandWaterBridge,
        InteractionType::ExtendedLigandWaterBridge,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.get(tag).copied()
    }

    pub fn tag(&self) -> &'static str {
        match self {
            InteractionType::SaltBridge => "sb",
            InteractionType::PiCation => "pc",
            InteractionType::PiStacking => "ps",
            InteractionType::TStacking => "ts",
            InteractionType::VanDerWaals => "vdw",
            InteractionType::HydrogenBond => "hb",
            InteractionType::LigandHydrogenBond => "lhb",
            InteractionType::BackboneBackboneHydrogenBond => "hbbb",
            InteractionType::BackboneSidechainHydrogenBond => "hbsb",
            InteractionType::SidechainSidechainHydrogenBond => "hbss",
            InteractionType::WaterBridge => "wb",
            InteractionType::ExtendedWaterBridge => "wb2",
            InteractionType::LigandSidechainHydrogenBond => "hls",
            InteractionType::LigandBackboneHydrogenBond => "hlb",
            InteractionType::LigandWaterBridge => "lwb",
            InteractionType::ExtendedLigandWaterBridge => "lwb2",
        }
    }

    /// Number of atoms a record of this type carries.
    pub fn participant_count(&self) -> usize {
        match self {
            InteractionType::WaterBridge | InteractionType::LigandWaterBridge => 3,
            InteractionType::ExtendedWaterBridge | InteractionType::ExtendedLigandWaterBridge => 4,
            _ => 2,
        }
    }

    /// The types selected when this tag is named in a filter.
    pub fn expansion(&self) -> Vec<InteractionType> {
        match self {
            InteractionType::HydrogenBond => vec![
                InteractionType::HydrogenBond,
                InteractionType::BackboneBackboneHydrogenBond,
                InteractionType::BackboneSidechainHydrogenBond,
                InteractionType::SidechainSidechainHydrogenBond,
            ],
            InteractionType::LigandHydrogenBond => vec![
                InteractionType::LigandHydrogenBond,
                InteractionType::LigandSidechainHydrogenBond,
                InteractionType::LigandBackboneHydrogenBond,
            ],
            other => vec![*other],
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown interaction type '{0}'")]
pub struct UnknownInteractionType(pub String);

impl FromStr for InteractionType {
    type Err = UnknownInteractionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| UnknownInteractionType(s.trim().to_string()))
    }
}

/// A set of interaction types used to keep or drop contact records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionFilter {
    #[default]
    All,
    Only(BTreeSet<InteractionType>),
}

impl InteractionFilter {
    /// Builds a filter from tags, expanding the `hb` and `lhb` aliases.
    pub fn from_types(types: impl IntoIterator<Item = InteractionType>) -> Self {
        let selected = types
            .into_iter()
            .flat_map(|t| t.expansion())
            .collect();
        InteractionFilter::Only(selected)
    }

    /// Parses `"all"` or a comma-separated list of tags.
    pub fn parse(tags: &str) -> Result<Self, UnknownInteractionType> {
        let tags = tags.trim();
        if tags.is_empty() || tags.eq_ignore_ascii_case("all") {
            return Ok(InteractionFilter::All);
        }
        let types = tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(InteractionType::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_types(types))
    }

    pub fn allows(&self, itype: InteractionType) -> bool {
        match self {
            InteractionFilter::All => true,
            InteractionFilter::Only(types) => types.contains(&itype),
        }
    }
}

impl FromStr for InteractionFilter {
    type Err = UnknownInteractionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
