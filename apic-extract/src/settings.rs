use std::fs;
use std::path::Path;

use aci_tree_core::parser::DEFAULT_STREAM_THRESHOLD;
use aci_tree_core::LoadOptions;
use serde::Deserialize;
use thiserror::Error;

/// Tool settings, read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub load: LoadSettings,
    pub output: OutputSettings,
    pub list: ListSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    pub stream_threshold: u64,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            stream_threshold: DEFAULT_STREAM_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    pub preview_limit: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self { preview_limit: 20 }
    }
}

impl Settings {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            stream_threshold: self.load.stream_threshold,
        }
    }
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file. Keys missing from the file keep their defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_settings(&raw, path.display().to_string())
}

/// Settings shipped with the binary.
pub fn default_settings() -> Settings {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));
    parse_settings(embedded, "embedded config".to_string()).unwrap_or_default()
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, ConfigLoadError> {
    toml::from_str(raw).map_err(|source| ConfigLoadError::Parse { path, source })
}
