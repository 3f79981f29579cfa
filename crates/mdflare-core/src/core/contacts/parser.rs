use super::header::ContactFileHeader;
use super::itype::{InteractionFilter, InteractionType};
use super::record::ContactRecord;
use crate::core::models::label::AtomLabel;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactParseError {
    #[error("expected at least 4 fields (frame, type, two atoms), found {found}")]
    MissingFields { found: usize },
    #[error("invalid frame index '{0}'")]
    InvalidFrame(String),
    #[error("unknown interaction type '{0}'")]
    UnknownInteractionType(String),
    #[error("interaction type '{itype}' requires {expected} participants, got {actual}")]
    WrongParticipantCount {
        itype: InteractionType,
        expected: usize,
        actual: usize,
    },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub error: ContactParseError,
}

/// The recoverable outcome of reading a contact file.
#[derive(Debug, Clone, Default)]
pub struct ContactFile {
    pub header: Option<ContactFileHeader>,
    pub records: Vec<ContactRecord>,
    pub errors: Vec<LineError>,
}

/// Parses a single non-comment contact line.
pub fn parse_line(line: &str) -> Result<ContactRecord, ContactParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(ContactParseError::MissingFields {
            found: fields.len(),
        });
    }

    let frame: usize = fields[0]
        .parse()
        .map_err(|_| ContactParseError::InvalidFrame(fields[0].to_string()))?;
    let itype = InteractionType::from_tag(fields[1])
        .ok_or_else(|| ContactParseError::UnknownInteractionType(fields[1].to_string()))?;
    let participants: Vec<AtomLabel> = fields[2..].iter().map(|&f| AtomLabel::from(f)).collect();

    ContactRecord::try_new(frame, itype, participants).map_err(|e| {
        ContactParseError::WrongParticipantCount {
            itype: e.itype,
            expected: e.expected,
            actual: e.actual,
        }
    })
}

/// Reads every record from `reader`, keeping those allowed by `filter`.
///
/// Malformed lines are logged, collected in [`ContactFile::errors`] and skipped; only I/O
/// failures abort the read.
pub fn read_contacts(
    reader: impl BufRead,
    filter: &InteractionFilter,
) -> Result<ContactFile, io::Error> {
    let mut result = ContactFile::default();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line_num = index + 1;
        let Ok(line) = std::str::from_utf8(&bytes) else {
            let error = ContactParseError::InvalidUtf8;
            warn!(line = line_num, %error, "Skipping malformed contact line");
            result.errors.push(LineError {
                line: line_num,
                error,
            });
            continue;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            if result.header.is_none() {
                result.header = ContactFileHeader::parse(trimmed);
            }
            continue;
        }

        match parse_line(trimmed) {
            Ok(record) if filter.allows(record.interaction_type()) => result.records.push(record),
            Ok(_) => {}
            Err(error) => {
                warn!(line = line_num, %error, "Skipping malformed contact line");
                result.errors.push(LineError {
                    line: line_num,
                    error,
                });
            }
        }
    }

    Ok(result)
}

pub fn read_contacts_from_path<P: AsRef<Path>>(
    path: P,
    filter: &InteractionFilter,
) -> Result<ContactFile, io::Error> {
    let file = File::open(path)?;
    read_contacts(BufReader::new(file), filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# total_frames:3 beg:0 end:2 stride:1 interaction_types:sb,hb
0 sb A:ASP:1:OD1 A:LYS:2:NZ

# a free-form comment
1 hbss A:SER:3:OG A:THR:9:OG1
2 wb A:SER:3:OG A:THR:9:OG1 W:TIP3:40:OH2
";

    #[test]
    fn reads_records_and_header() {
        let parsed = read_contacts(Cursor::new(SAMPLE), &InteractionFilter::All).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert!(parsed.errors.is_empty());
        let header = parsed.header.unwrap();
        assert_eq!(header.total_frames, 3);
        assert_eq!(parsed.records[2].participants().len(), 3);
    }

    #[test]
    fn filter_drops_unselected_types() {
        let filter = InteractionFilter::parse("hb").unwrap();
        let parsed = read_contacts(Cursor::new(SAMPLE), &filter).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(
            parsed.records[0].interaction_type(),
            InteractionType::SidechainSidechainHydrogenBond
        );
    }

    #[test]
    fn malformed_lines_are_skipped_and_reported() {
        let input = "\
0 sb A:ASP:1:OD1
x sb A:ASP:1:OD1 A:LYS:2:NZ
0 zz A:ASP:1:OD1 A:LYS:2:NZ
0 wb A:ASP:1:OD1 A:LYS:2:NZ
5 sb A:ASP:1:OD1 A:LYS:2:NZ
";
        let parsed = read_contacts(Cursor::new(input), &InteractionFilter::All).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].frame(), 5);
        let errors: Vec<_> = parsed.errors.iter().map(|e| (e.line, e.error.clone())).collect();
        assert_eq!(
            errors,
            vec![
                (1, ContactParseError::MissingFields { found: 3 }),
                (2, ContactParseError::InvalidFrame("x".into())),
                (3, ContactParseError::UnknownInteractionType("zz".into())),
                (
                    4,
                    ContactParseError::WrongParticipantCount {
                        itype: InteractionType::WaterBridge,
                        expected: 3,
                        actual: 2
                    }
                ),
            ]
        );
    }

    #[test]
    fn non_utf8_line_is_reported_and_reading_continues() {
        let mut input = b"0 sb A:ASP:1:OD1 A:LYS:2:NZ\n1 sb A:ASP:1:".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b" A:LYS:2:NZ\r\n2 sb A:ASP:1:OD1 A:LYS:2:NZ\n");

        let parsed = read_contacts(Cursor::new(input), &InteractionFilter::All).unwrap();
        let frames: Vec<_> = parsed.records.iter().map(|r| r.frame()).collect();
        assert_eq!(frames, vec![0, 2]);
        assert_eq!(
            parsed.errors,
            vec![LineError {
                line: 2,
                error: ContactParseError::InvalidUtf8
            }]
        );
    }

    #[test]
    fn negative_frame_is_invalid() {
        assert_eq!(
            parse_line("-1 sb a b"),
            Err(ContactParseError::InvalidFrame("-1".into()))
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_contacts_from_path(dir.path().join("absent.tsv"), &InteractionFilter::All);
        assert!(result.is_err());
    }
}
