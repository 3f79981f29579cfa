use crate::core::io::traits::TrajectoryFile;
use crate::core::models::label::AtomLabel;
use crate::core::models::trajectory::{Frame, TopologyError, Trajectory, TrajectoryBuilder};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Topology error on line {line}: {source}")]
    Topology {
        line: usize,
        #[source]
        source: TopologyError,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

/// Chain assigned to records with neither a chain identifier nor a segment ID.
pub const UNNAMED_CHAIN: char = '_';

/// Offset added to `resSeq` each time a chain's four-column residue numbers wrap around.
const RESIDUE_NUMBER_WRAP: isize = 10_000;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

/// One parsed `ATOM`/`HETATM` record.
#[derive(Debug, Clone, PartialEq)]
struct AtomRecord {
    serial: Option<usize>,
    name: String,
    residue_name: String,
    chain_id: char,
    residue_number: isize,
    position: Point3<f64>,
    element: Option<String>,
}

impl AtomRecord {
    fn label(&self) -> AtomLabel {
        AtomLabel::from_parts(
            self.chain_id,
            &self.residue_name,
            self.residue_number,
            &self.name,
        )
    }
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Parses an `ATOM`/`HETATM` line. Returns `None` for alternate locations other than the first.
fn parse_atom_line(line: &str, line_num: usize) -> Result<Option<AtomRecord>, PdbError> {
    if line.len() < 54 {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }

    let alt_loc = slice_and_trim(line, 16, 17);
    if !alt_loc.is_empty() && alt_loc != "A" && alt_loc != "1" {
        return Ok(None);
    }

    let serial_str = slice_and_trim(line, 6, 11);
    let name = slice_and_trim(line, 12, 16);
    let residue_name = slice_and_trim(line, 17, 21);
    let chain_str = slice_and_trim(line, 21, 22);
    let res_seq_str = slice_and_trim(line, 22, 26);
    let segment_id = slice_and_trim(line, 72, 76);
    let element = slice_and_trim(line, 76, 78);

    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "13-16".into(),
            },
        });
    }
    if residue_name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "18-21".into(),
            },
        });
    }

    // Serial numbers overflow the five-column field in large systems; keep them optional.
    let serial = serial_str.parse().ok();
    let residue_number: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "23-26".into(),
            value: res_seq_str.into(),
        },
    })?;
    let x = parse_float(line, line_num, 30, 38)?;
    let y = parse_float(line, line_num, 38, 46)?;
    let z = parse_float(line, line_num, 46, 54)?;

    Ok(Some(AtomRecord {
        serial,
        name: name.to_string(),
        residue_name: residue_name.to_string(),
        chain_id: chain_str
            .chars()
            .next()
            .or_else(|| segment_id.chars().last())
            .unwrap_or(UNNAMED_CHAIN),
        residue_number,
        position: Point3::new(x, y, z),
        element: (!element.is_empty()).then(|| element.to_string()),
    }))
}

/// Splits a PDB stream into models. Files without `MODEL` records form a single model.
fn read_models(reader: &mut impl BufRead) -> Result<Vec<Vec<(usize, AtomRecord)>>, PdbError> {
    let mut models = Vec::new();
    let mut current: Vec<(usize, AtomRecord)> = Vec::new();
    let mut in_model = false;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        match slice_and_trim(&line, 0, 6) {
            "MODEL" => {
                if !current.is_empty() {
                    models.push(std::mem::take(&mut current));
                }
                in_model = true;
            }
            "ENDMDL" => {
                models.push(std::mem::take(&mut current));
                in_model = false;
            }
            "ATOM" | "HETATM" => {
                if let Some(record) = parse_atom_line(&line, line_num)? {
                    current.push((line_num, record));
                }
            }
            "END" if !in_model => {
                if !current.is_empty() {
                    models.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        models.push(current);
    }
    for model in &mut models {
        unwrap_residue_numbers(model);
    }
    Ok(models)
}

/// Renumbers residues so every residue of a model has a distinct `(chain, resSeq, resName)`.
///
/// A new residue starts whenever that tuple changes between consecutive records or an atom
/// name repeats inside the current residue. A residue whose tuple was already used earlier in
/// its chain is shifted by [`RESIDUE_NUMBER_WRAP`], and the shift carries over to the rest of
/// the chain. Models share atom order, so the same pass yields the same labels for every frame.
fn unwrap_residue_numbers(model: &mut [(usize, AtomRecord)]) {
    let mut used: HashSet<(char, isize, String)> = HashSet::new();
    let mut offsets: HashMap<char, isize> = HashMap::new();
    let mut current: Option<(char, isize, String)> = None;
    let mut current_atoms: HashSet<String> = HashSet::new();
    let mut assigned = 0;

    for (_, record) in model.iter_mut() {
        let original = (record.chain_id, record.residue_number, record.residue_name.clone());
        let continues = current.as_ref() == Some(&original) && !current_atoms.contains(&record.name);
        if !continues {
            let offset = offsets.entry(record.chain_id).or_insert(0);
            while used.contains(&(
                record.chain_id,
                record.residue_number + *offset,
                record.residue_name.clone(),
            )) {
                *offset += RESIDUE_NUMBER_WRAP;
            }
            assigned = record.residue_number + *offset;
            used.insert((record.chain_id, assigned, record.residue_name.clone()));
            current = Some(original);
            current_atoms.clear();
        }
        current_atoms.insert(record.name.clone());
        record.residue_number = assigned;
    }
}

fn frame_from_model(model: &[(usize, AtomRecord)], topology: &Trajectory) -> Frame {
    let mut frame = Frame::new();
    let mut unknown = 0usize;
    for (_, record) in model {
        match topology.atom_id(record.label().as_str()) {
            Some(id) => frame.set_position(id, record.position),
            None => unknown += 1,
        }
    }
    if unknown > 0 {
        debug!(unknown, "Ignored atoms not present in the topology");
    }
    frame
}

/// Reader for (multi-model) Protein Data Bank files.
pub struct PdbFile;

impl TrajectoryFile for PdbFile {
    type Error = PdbError;

    fn read_topology(reader: &mut impl BufRead) -> Result<Trajectory, Self::Error> {
        let mut models = read_models(reader)?.into_iter();
        let first = models
            .next()
            .ok_or_else(|| PdbError::MissingRecord("ATOM/HETATM".to_string()))?;

        let mut builder = TrajectoryBuilder::new();
        let mut current_residue: Option<(char, isize, String)> = None;
        for (line, record) in &first {
            let residue = (record.chain_id, record.residue_number, record.residue_name.clone());
            if current_residue.as_ref() != Some(&residue) {
                builder.start_residue(record.chain_id, record.residue_number, &record.residue_name);
                current_residue = Some(residue);
            }
            let id = builder
                .add_atom(&record.name, record.element.as_deref(), record.position)
                .map_err(|source| PdbError::Topology {
                    line: *line,
                    source,
                })?;
            if let Some(serial) = record.serial {
                builder.set_serial(id, serial);
            }
        }

        let mut trajectory = builder.build();
        for model in models {
            let frame = frame_from_model(&model, &trajectory);
            trajectory.push_frame(frame);
        }
        Ok(trajectory)
    }

    fn read_frames(
        reader: &mut impl BufRead,
        topology: &Trajectory,
    ) -> Result<Vec<Frame>, Self::Error> {
        let models = read_models(reader)?;
        if models.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM".to_string()));
        }
        Ok(models
            .iter()
            .map(|model| frame_from_model(model, topology))
            .collect())
    }
}
