//! Configuration for the local filesystem adapter.
//!
//! Values come from serde (any format) or from `PERSIST_*` environment
//! variables; anything unset keeps its default.

use serde::Deserialize;
use std::{env, path::PathBuf};

/// Settings for a [`LocalAdapter`](crate::adapter::LocalAdapter).
///
/// Deserializes from any serde format with every field optional, e.g.
/// `{"directory": "/var/game/saves"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocalAdapterConfig {
    /// Name the adapter is registered under.
    pub name: String,
    /// Directory that holds the save files. Relative paths resolve against
    /// the working directory.
    pub directory: PathBuf,
    /// Suffix appended to every file path, including the leading dot.
    pub extension: String,
    /// Lower values are consulted first.
    pub priority: i32,
}

impl Default for LocalAdapterConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            directory: PathBuf::from("Saves"),
            extension: ".save".to_string(),
            priority: 0,
        }
    }
}

impl LocalAdapterConfig {
    /// Builds a configuration from `PERSIST_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            name: lookup("PERSIST_ADAPTER_NAME").unwrap_or(defaults.name),
            directory: lookup("PERSIST_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.directory),
            extension: lookup("PERSIST_EXTENSION").unwrap_or(defaults.extension),
            priority: lookup("PERSIST_PRIORITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.priority),
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
