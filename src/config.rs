use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InspectorError, Result};

/// Output encoding for emitted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// One human-readable line per record
    Text,
}

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Whether the grammar supports class keyword arguments (`metaclass=...`).
    pub class_keywords: bool,
    /// Abort the whole run on the first failing file.
    pub fail_fast: bool,
    /// Skip hidden and ignored files when expanding directories.
    pub respect_ignore: bool,
    pub format: OutputFormat,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            class_keywords: true,
            fail_fast: true,
            respect_ignore: true,
            format: OutputFormat::Json,
        }
    }
}

impl InspectorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InspectorError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| InspectorError::Config(e.to_string()))
    }
}
