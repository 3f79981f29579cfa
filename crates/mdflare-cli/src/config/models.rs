use super::defaults::CONTACTS_FILE_NAME;
use mdflare::engine::config::DetectionConfig;
use std::path::PathBuf;

/// Fully resolved settings for one `contacts` invocation.
#[derive(Debug, Clone)]
pub struct ContactsConfig {
    pub topology: PathBuf,
    pub trajectory: PathBuf,
    pub output_dir: PathBuf,
    pub detection: DetectionConfig,
}

impl ContactsConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(CONTACTS_FILE_NAME)
    }
}
