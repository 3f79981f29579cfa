use crate::error::{CliError, Result};
use mdflare::engine::config::GeometryCutoffs;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFramesConfig {
    pub begin: Option<usize>,
    pub end: Option<usize>,
    pub stride: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSelectionConfig {
    pub first: Option<String>,
    pub second: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileCutoffsConfig {
    pub salt_bridge: Option<f64>,
    pub pi_cation_distance: Option<f64>,
    pub pi_cation_angle: Option<f64>,
    pub pi_stack_distance: Option<f64>,
    pub pi_stack_angle: Option<f64>,
    pub t_stack_distance: Option<f64>,
    pub t_stack_min_angle: Option<f64>,
    pub hbond_distance: Option<f64>,
    pub hbond_angle: Option<f64>,
    pub vdw_epsilon: Option<f64>,
    pub hydrogen_bond_length: Option<f64>,
}

impl FileCutoffsConfig {
    /// Overlays the values present in the file on top of `base`.
    pub fn apply(&self, base: GeometryCutoffs) -> GeometryCutoffs {
        GeometryCutoffs {
            salt_bridge: self.salt_bridge.unwrap_or(base.salt_bridge),
            pi_cation_distance: self.pi_cation_distance.unwrap_or(base.pi_cation_distance),
            pi_cation_angle: self.pi_cation_angle.unwrap_or(base.pi_cation_angle),
            pi_stack_distance: self.pi_stack_distance.unwrap_or(base.pi_stack_distance),
            pi_stack_angle: self.pi_stack_angle.unwrap_or(base.pi_stack_angle),
            t_stack_distance: self.t_stack_distance.unwrap_or(base.t_stack_distance),
            t_stack_min_angle: self.t_stack_min_angle.unwrap_or(base.t_stack_min_angle),
            hbond_distance: self.hbond_distance.unwrap_or(base.hbond_distance),
            hbond_angle: self.hbond_angle.unwrap_or(base.hbond_angle),
            vdw_epsilon: self.vdw_epsilon.unwrap_or(base.vdw_epsilon),
            hydrogen_bond_length: self.hydrogen_bond_length.unwrap_or(base.hydrogen_bond_length),
        }
    }

    /// Mutable access to a cutoff by its file key, for `-S cutoffs.<key>=<value>`.
    pub fn slot(&mut self, key: &str) -> Option<&mut Option<f64>> {
        Some(match key {
            "salt-bridge" => &mut self.salt_bridge,
            "pi-cation-distance" => &mut self.pi_cation_distance,
            "pi-cation-angle" => &mut self.pi_cation_angle,
            "pi-stack-distance" => &mut self.pi_stack_distance,
            "pi-stack-angle" => &mut self.pi_stack_angle,
            "t-stack-distance" => &mut self.t_stack_distance,
            "t-stack-min-angle" => &mut self.t_stack_min_angle,
            "hbond-distance" => &mut self.hbond_distance,
            "hbond-angle" => &mut self.hbond_angle,
            "vdw-epsilon" => &mut self.vdw_epsilon,
            "hydrogen-bond-length" => &mut self.hydrogen_bond_length,
            _ => return None,
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub interactions: Option<Vec<String>>,
    pub cores: Option<usize>,
    pub solvent: Option<String>,
    pub ligand: Option<String>,
    pub frames: Option<FileFramesConfig>,
    pub selection: Option<FileSelectionConfig>,
    pub cutoffs: Option<FileCutoffsConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
