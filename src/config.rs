//! Repository configuration, persisted as TOML.
//!
//! Every field has a serde default so a partial (or empty) file is valid.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(lexigraph::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(lexigraph::config::parse),
        help("Check the TOML syntax. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(lexigraph::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings consumed by the context resolvers, the importer and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexConfig {
    /// Language tag preferred for labels (vocabulary titles, search labels).
    #[serde(default = "default_language")]
    pub language: String,
    /// Path component between a vocabulary IRI and its term local names.
    #[serde(default = "default_term_namespace_separator")]
    pub term_namespace_separator: String,
    /// Suffix appended to an asset IRI to synthesize its change-tracking context.
    #[serde(default = "default_change_tracking_context_extension")]
    pub change_tracking_context_extension: String,
    /// IRI of the container referencing canonical (shared) vocabulary contexts.
    #[serde(default = "default_canonical_cache_container")]
    pub canonical_cache_container: String,
    /// Directory of the persistent oxigraph store. `None` for memory-only mode.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_language() -> String {
    "en".into()
}
fn default_term_namespace_separator() -> String {
    "/term".into()
}
fn default_change_tracking_context_extension() -> String {
    "/changes".into()
}
fn default_canonical_cache_container() -> String {
    "https://lexigraph.dev/canonical-cache".into()
}

impl Default for LexConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            term_namespace_separator: default_term_namespace_separator(),
            change_tracking_context_extension: default_change_tracking_context_extension(),
            canonical_cache_container: default_canonical_cache_container(),
            data_dir: None,
        }
    }
}

impl LexConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml().map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }
}
