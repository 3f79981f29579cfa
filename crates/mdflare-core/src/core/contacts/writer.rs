use super::header::ContactFileHeader;
use super::record::ContactRecord;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Renders a complete contact file in memory: header line, then one record per line.
pub fn render_contacts<'a>(
    header: &ContactFileHeader,
    records: impl IntoIterator<Item = &'a ContactRecord>,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{header}");
    for record in records {
        let _ = writeln!(out, "{record}");
    }
    out
}

pub fn write_contacts_to_path<'a, P: AsRef<Path>>(
    path: P,
    header: &ContactFileHeader,
    records: impl IntoIterator<Item = &'a ContactRecord>,
) -> Result<(), io::Error> {
    fs::write(path, render_contacts(header, records))
}
