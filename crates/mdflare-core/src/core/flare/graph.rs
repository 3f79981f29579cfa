use crate::core::models::label::ResidueKey;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TREE_LABEL: &str = "DefaultTree";
pub const DEFAULT_TRACK_LABEL: &str = "DefaultTrack";
pub const DEFAULT_NODE_SIZE: f64 = 1.0;

/// An undirected, frame-annotated edge between two residues.
///
/// The residue keys are stored in canonical order (`residue_key_1 < residue_key_2`) and are
/// only used for merging; the serialized form carries the display names and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlareEdge {
    #[serde(skip)]
    pub residue_key_1: ResidueKey,
    #[serde(skip)]
    pub residue_key_2: ResidueKey,
    pub name1: String,
    pub name2: String,
    pub frames: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlareTree {
    pub tree_label: String,
    pub tree_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackProperty {
    pub node_name: String,
    pub color: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlareTrack {
    pub track_label: String,
    pub track_properties: Vec<TrackProperty>,
}

/// The JSON document consumed by flareplot viewers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlareGraph {
    pub edges: Vec<FlareEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trees: Option<Vec<FlareTree>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<FlareTrack>>,
}

impl FlareGraph {
    pub fn edge(&self, name1: &str, name2: &str) -> Option<&FlareEdge> {
        self.edges.iter().find(|e| {
            (e.name1 == name1 && e.name2 == name2) || (e.name1 == name2 && e.name2 == name1)
        })
    }
}
