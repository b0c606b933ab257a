//! Layered configuration
//!
//! Defaults, then an optional TOML file, then `ARMORY_*` environment
//! variables (nested keys split on `__`, e.g. `ARMORY_LOADER__SUGGESTION_DISTANCE`).

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "armory.toml";

/// Catalog loader tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Max edits for near-miss flag suggestions (0 disables suggestions)
    pub suggestion_distance: usize,
    /// Emit diagnostics for type-specific fields on the wrong item type
    pub report_irrelevant_fields: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            suggestion_distance: 2,
            report_irrelevant_fields: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmoryConfig {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit log lines as JSON objects
    pub log_json: bool,
    pub loader: LoaderOptions,
    /// Default seed for dice rolls; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            log_filter: "armory=info".to_string(),
            log_json: false,
            loader: LoaderOptions::default(),
            seed: None,
        }
    }
}

impl ArmoryConfig {
    /// Build the provider stack without extracting
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(ArmoryConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("ARMORY_").split("__"))
    }

    /// Load configuration; a missing file just means defaults
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}
