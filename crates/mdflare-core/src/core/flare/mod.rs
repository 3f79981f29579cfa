//! Flare graphs: residue-level, frame-annotated interaction networks.
//!
//! Contact records are collapsed by residue pair into undirected edges that list the
//! frames in which the pair interacted. An optional label table renames residues, restricts
//! the graph to the residues it lists and supplies the hierarchy and colors of the plot.

pub mod builder;
pub mod graph;
pub mod labels;

pub use builder::{FlareDiagnostics, FlareGraphBuilder};
pub use graph::{FlareEdge, FlareGraph, FlareTrack, FlareTree, TrackProperty};
pub use labels::{LabelEntry, LabelLoadError, LabelTable};
