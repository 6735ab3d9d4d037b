use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse converter config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to serialize converter config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where converted parts land, relative to the KiCad project directory.
///
/// ```toml
/// library_path = "libs/lcsc"
/// library_nickname = "lcsc"
/// footprint_text_margin = 2.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub library_path: String,
    pub symbol_lib_file: String,
    pub footprint_lib_dir: String,
    pub model_dir: String,
    /// Library table nickname used in `nickname:entry` footprint references.
    pub library_nickname: String,
    /// Millimeters between the footprint outline and its reference/value text.
    pub footprint_text_margin: f64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            library_path: "libs/lcsc".to_string(),
            symbol_lib_file: "lcsc_imported.kicad_sym".to_string(),
            footprint_lib_dir: "footprints.pretty".to_string(),
            model_dir: "3dmodels".to_string(),
            library_nickname: "lcsc".to_string(),
            footprint_text_margin: 1.5,
        }
    }
}

impl ConvertConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Value for a symbol's Footprint property.
    pub fn footprint_ref(&self, footprint_entry: &str) -> String {
        format!("{}:{footprint_entry}", self.library_nickname)
    }

    /// Project-relative model path written into footprints.
    pub fn model_path(&self, part_id: &str) -> String {
        format!(
            "${{KIPRJMOD}}/{}/{}/{part_id}.wrl",
            self.library_path.trim_end_matches('/'),
            self.model_dir
        )
    }

    pub fn symbol_lib_path(&self) -> PathBuf {
        PathBuf::from(&self.library_path).join(&self.symbol_lib_file)
    }

    pub fn footprint_file_path(&self, footprint_entry: &str) -> PathBuf {
        PathBuf::from(&self.library_path)
            .join(&self.footprint_lib_dir)
            .join(format!("{footprint_entry}.kicad_mod"))
    }

    pub fn model_file_path(&self, part_id: &str) -> PathBuf {
        PathBuf::from(&self.library_path)
            .join(&self.model_dir)
            .join(format!("{part_id}.wrl"))
    }
}
