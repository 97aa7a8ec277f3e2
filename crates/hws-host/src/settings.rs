// SPDX-License-Identifier: MIT
//
// Persisted settings — a flat JSON object loaded from a settings file.
//
// The store does not know what any key means. Plugins read the values they
// care about and apply their own defaults (see `hws_core::config`).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Error loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings must be a JSON object")]
    NotAnObject,
}

/// A settings store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(SettingsError::NotAnObject),
        }
    }

    /// Load settings from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a JSON
    /// object.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Remove a key, returning its old value.
    pub fn erase(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    #[inline]
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
