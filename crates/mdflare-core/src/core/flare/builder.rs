use super::graph::{
    DEFAULT_NODE_SIZE, DEFAULT_TRACK_LABEL, DEFAULT_TREE_LABEL, FlareEdge, FlareGraph, FlareTrack,
    FlareTree, TrackProperty,
};
use super::labels::LabelTable;
use crate::core::contacts::itype::InteractionFilter;
use crate::core::contacts::record::ContactRecord;
use crate::core::models::label::ResidueKey;
use std::collections::HashMap;
use tracing::warn;

/// Counters describing what the builder did with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlareDiagnostics {
    pub records_seen: usize,
    pub records_filtered: usize,
    pub self_contacts: usize,
    pub label_misses: usize,
}

/// Collapses contact records into residue-level flare edges.
///
/// Edges appear in the order their residue pair was first seen. With a label table,
/// contacts touching a residue absent from the table are dropped and edge endpoints are
/// renamed to the table's display labels.
pub struct FlareGraphBuilder<'a> {
    labels: Option<&'a LabelTable>,
    filter: InteractionFilter,
    edges: Vec<FlareEdge>,
    index: HashMap<(ResidueKey, ResidueKey), usize>,
    diagnostics: FlareDiagnostics,
}

impl Default for FlareGraphBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FlareGraphBuilder<'a> {
    pub fn new() -> Self {
        Self {
            labels: None,
            filter: InteractionFilter::All,
            edges: Vec::new(),
            index: HashMap::new(),
            diagnostics: FlareDiagnostics::default(),
        }
    }

    pub fn labels(mut self, labels: &'a LabelTable) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn filter(mut self, filter: InteractionFilter) -> Self {
        self.filter = filter;
        self
    }

    fn display_name(&self, key: &ResidueKey) -> String {
        self.labels
            .and_then(|table| table.get(key.as_str()))
            .map(|entry| entry.display_label.clone())
            .unwrap_or_else(|| key.as_str().to_string())
    }

    pub fn add(&mut self, record: &ContactRecord) {
        self.diagnostics.records_seen += 1;
        if !self.filter.allows(record.interaction_type()) {
            self.diagnostics.records_filtered += 1;
            return;
        }

        let (a, b) = record.primary_pair();
        let (mut key1, mut key2) = (a.residue_key(), b.residue_key());
        if key1 == key2 {
            self.diagnostics.self_contacts += 1;
            return;
        }

        if let Some(table) = self.labels {
            if !table.contains(key1.as_str()) || !table.contains(key2.as_str()) {
                self.diagnostics.label_misses += 1;
                warn!(
                    residue1 = %key1,
                    residue2 = %key2,
                    "Omitting contact: residue not present in the label table"
                );
                return;
            }
        }

        if key1 > key2 {
            std::mem::swap(&mut key1, &mut key2);
        }

        match self.index.get(&(key1.clone(), key2.clone())) {
            Some(&position) => self.edges[position].frames.push(record.frame()),
            None => {
                let edge = FlareEdge {
                    name1: self.display_name(&key1),
                    name2: self.display_name(&key2),
                    frames: vec![record.frame()],
                    residue_key_1: key1.clone(),
                    residue_key_2: key2.clone(),
                };
                self.index.insert((key1, key2), self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    pub fn extend<'r>(&mut self, records: impl IntoIterator<Item = &'r ContactRecord>) {
        for record in records {
            self.add(record);
        }
    }

    pub fn diagnostics(&self) -> FlareDiagnostics {
        self.diagnostics
    }

    /// Sorts and deduplicates frames and attaches trees and tracks when labels were given.
    pub fn build(self) -> (FlareGraph, FlareDiagnostics) {
        let mut edges = self.edges;
        for edge in &mut edges {
            edge.frames.sort_unstable();
            edge.frames.dedup();
        }

        let (trees, tracks) = match self.labels {
            Some(table) => {
                let tree = FlareTree {
                    tree_label: DEFAULT_TREE_LABEL.to_string(),
                    tree_paths: table.entries().iter().map(|e| e.tree_path.clone()).collect(),
                };
                let track = FlareTrack {
                    track_label: DEFAULT_TRACK_LABEL.to_string(),
                    track_properties: table
                        .entries()
                        .iter()
                        .map(|e| TrackProperty {
                            node_name: e.display_label.clone(),
                            color: e.color.clone(),
                            size: DEFAULT_NODE_SIZE,
                        })
                        .collect(),
                };
                (Some(vec![tree]), Some(vec![track]))
            }
            None => (None, None),
        };

        (
            FlareGraph {
                edges,
                trees,
                tracks,
            },
            self.diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contacts::itype::InteractionType;

    fn sb(frame: usize, a: &str, b: &str) -> ContactRecord {
        ContactRecord::pair(frame, InteractionType::SaltBridge, a.into(), b.into())
    }

    fn hb(frame: usize, a: &str, b: &str) -> ContactRecord {
        ContactRecord::pair(frame, InteractionType::SidechainSidechainHydrogenBond, a.into(), b.into())
    }

    fn build(records: &[ContactRecord]) -> (FlareGraph, FlareDiagnostics) {
        let mut builder = FlareGraphBuilder::new();
        builder.extend(records);
        builder.build()
    }

    #[test]
    fn three_record_scenario_produces_one_merged_edge() {
        let records = [
            sb(0, "A:ARG:4:NH1", "A:GLU:7:OE1"),
            sb(0, "A:ARG:4:NH2", "A:GLU:7:OE2"),
            sb(3, "A:GLU:7:OE1", "A:ARG:4:NH1"),
        ];
        let (graph, diagnostics) = build(&records);
        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.name1, "A:ARG:4");
        assert_eq!(edge.name2, "A:GLU:7");
        assert_eq!(edge.frames, vec![0, 3]);
        assert!(graph.trees.is_none());
        assert!(graph.tracks.is_none());
        assert_eq!(diagnostics.records_seen, 3);
    }

    #[test]
    fn reversed_pairs_merge_into_canonical_edge() {
        let (graph, _) = build(&[sb(2, "B:LYS:1:NZ", "A:ASP:9:OD1"), sb(1, "A:ASP:9:OD2", "B:LYS:1:NZ")]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].residue_key_1.as_str(), "A:ASP:9");
        assert_eq!(graph.edges[0].residue_key_2.as_str(), "B:LYS:1");
        assert_eq!(graph.edges[0].frames, vec![1, 2]);
    }

    #[test]
    fn self_contacts_never_create_edges() {
        let (graph, diagnostics) = build(&[hb(0, "A:SER:3:OG", "A:SER:3:O")]);
        assert!(graph.edges.is_empty());
        assert_eq!(diagnostics.self_contacts, 1);
    }

    #[test]
    fn aggregation_is_idempotent_under_duplication() {
        let records = vec![
            sb(5, "A:ARG:4:NH1", "A:GLU:7:OE1"),
            hb(2, "A:SER:3:OG", "A:THR:9:OG1"),
            sb(1, "A:ARG:4:NH1", "A:GLU:7:OE1"),
        ];
        let doubled: Vec<_> = records.iter().chain(records.iter()).cloned().collect();
        assert_eq!(build(&records).0, build(&doubled).0);
    }

    #[test]
    fn edges_keep_first_seen_order() {
        let (graph, _) = build(&[
            hb(0, "A:THR:9:OG1", "A:SER:3:OG"),
            sb(0, "A:ARG:4:NH1", "A:GLU:7:OE1"),
            hb(1, "A:SER:3:OG", "A:THR:9:OG1"),
        ]);
        let names: Vec<_> = graph.edges.iter().map(|e| e.name1.as_str()).collect();
        assert_eq!(names, ["A:SER:3", "A:ARG:4"]);
    }

    #[test]
    fn type_filter_drops_records_before_aggregation() {
        let mut builder = FlareGraphBuilder::new().filter(InteractionFilter::parse("hb").unwrap());
        builder.extend(&[sb(0, "A:ARG:4:NH1", "A:GLU:7:OE1"), hb(0, "A:SER:3:OG", "A:THR:9:OG1")]);
        let (graph, diagnostics) = builder.build();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].name1, "A:SER:3");
        assert_eq!(diagnostics.records_filtered, 1);
    }

    #[test]
    fn label_table_filters_renames_and_adds_trees_and_tracks() {
        let table = LabelTable::from_reader(
            "A:GLU:7\tHelix.E7\tred\nA:ARG:4\tHelix.R4\n".as_bytes(),
        )
        .unwrap();
        let mut builder = FlareGraphBuilder::new().labels(&table);
        builder.extend(&[
            sb(0, "A:ARG:4:NH1", "A:GLU:7:OE1"),
            sb(1, "A:ARG:4:NH1", "A:ASP:9:OD1"),
        ]);
        let (graph, diagnostics) = builder.build();

        assert_eq!(diagnostics.label_misses, 1);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].name1, "R4");
        assert_eq!(graph.edges[0].name2, "E7");
        assert!(graph.edge("R4", "E7").is_some());

        let trees = graph.trees.unwrap();
        assert_eq!(trees[0].tree_paths, vec!["Helix.E7", "Helix.R4"]);
        let tracks = graph.tracks.unwrap();
        let nodes: Vec<_> = tracks[0]
            .track_properties
            .iter()
            .map(|p| (p.node_name.as_str(), p.color.as_str()))
            .collect();
        assert_eq!(nodes, [("E7", "red"), ("R4", "white")]);
    }
}
