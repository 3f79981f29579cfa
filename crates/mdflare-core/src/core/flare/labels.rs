use crate::core::models::label::ResidueKey;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const DEFAULT_COLOR: &str = "white";

#[derive(Debug, Error)]
pub enum LabelLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Label file parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub residue_key: ResidueKey,
    pub display_label: String,
    pub tree_path: String,
    pub color: String,
}

impl LabelEntry {
    fn from_fields(key: &str, tree_path: Option<&str>, color: Option<&str>) -> Self {
        let tree_path = tree_path
            .filter(|p| !p.is_empty())
            .unwrap_or(key)
            .to_string();
        let display_label = tree_path
            .rsplit('.')
            .next()
            .unwrap_or(&tree_path)
            .to_string();
        let color = color
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COLOR)
            .to_string();
        Self {
            residue_key: ResidueKey::new(key),
            display_label,
            tree_path,
            color,
        }
    }
}

/// Residue renaming table and whitelist loaded from a tab-separated flare-label file.
///
/// Each line is `residue_key<TAB>tree_path[<TAB>color]`. Entries keep file order; a key
/// listed twice keeps its first position and takes the values of its last occurrence.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
    index: HashMap<ResidueKey, usize>,
}

impl LabelTable {
    pub fn load(path: &Path) -> Result<Self, LabelLoadError> {
        let file = File::open(path).map_err(|e| LabelLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_reader(file).map_err(|e| LabelLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for result in reader.records() {
            let record = result?;
            let Some(key) = record.get(0).filter(|k| !k.is_empty()) else {
                continue;
            };
            table.insert(LabelEntry::from_fields(key, record.get(1), record.get(2)));
        }
        Ok(table)
    }

    pub fn insert(&mut self, entry: LabelEntry) {
        match self.index.get(&entry.residue_key) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index.insert(entry.residue_key.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&LabelEntry> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
