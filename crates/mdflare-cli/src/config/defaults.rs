use mdflare::engine::config::{DEFAULT_SOLVENT, GeometryCutoffs};

pub const CONTACTS_FILE_NAME: &str = "contacts.tsv";

pub struct DefaultsConfig {
    pub begin: usize,
    pub stride: usize,
    pub cores: usize,
    pub solvent: String,
    pub cutoffs: GeometryCutoffs,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            begin: 0,
            stride: 1,
            cores: 6,
            solvent: DEFAULT_SOLVENT.to_string(),
            cutoffs: GeometryCutoffs::default(),
        }
    }
}
