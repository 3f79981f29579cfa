use crate::core::contacts::header::ContactFileHeader;
use crate::core::contacts::itype::InteractionFilter;
use crate::core::contacts::parser::{LineError, read_contacts};
use crate::core::contacts::record::ContactRecord;
use crate::core::flare::builder::{FlareDiagnostics, FlareGraphBuilder};
use crate::core::flare::graph::FlareGraph;
use crate::core::flare::labels::LabelTable;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct FlareResult {
    pub graph: FlareGraph,
    pub diagnostics: FlareDiagnostics,
    /// Run metadata, when the contact stream starts with a detection header.
    pub header: Option<ContactFileHeader>,
    pub parse_errors: Vec<LineError>,
}

/// Aggregates already-parsed records into a flare graph.
pub fn build_graph<'r>(
    records: impl IntoIterator<Item = &'r ContactRecord>,
    filter: &InteractionFilter,
    labels: Option<&LabelTable>,
) -> (FlareGraph, FlareDiagnostics) {
    let mut builder = FlareGraphBuilder::new().filter(filter.clone());
    if let Some(table) = labels {
        builder = builder.labels(table);
    }
    builder.extend(records);
    builder.build()
}

/// Reads a contact stream and aggregates it into a flare graph.
///
/// Malformed lines are skipped and returned in [`FlareResult::parse_errors`].
#[instrument(skip_all, name = "flare_workflow")]
pub fn run(
    reader: impl BufRead,
    filter: &InteractionFilter,
    labels: Option<&LabelTable>,
) -> Result<FlareResult, io::Error> {
    let contacts = read_contacts(reader, &InteractionFilter::All)?;
    if !contacts.errors.is_empty() {
        warn!(
            count = contacts.errors.len(),
            "Skipped malformed lines in contact input"
        );
    }

    let (graph, diagnostics) = build_graph(&contacts.records, filter, labels);
    info!(
        edges = graph.edges.len(),
        records = diagnostics.records_seen,
        filtered = diagnostics.records_filtered,
        self_contacts = diagnostics.self_contacts,
        label_misses = diagnostics.label_misses,
        "Flare graph assembled."
    );

    Ok(FlareResult {
        graph,
        diagnostics,
        header: contacts.header,
        parse_errors: contacts.errors,
    })
}

pub fn run_from_path<P: AsRef<Path>>(
    path: P,
    filter: &InteractionFilter,
    labels: Option<&LabelTable>,
) -> Result<FlareResult, io::Error> {
    let file = File::open(path)?;
    run(BufReader::new(file), filter, labels)
}
