//! Configuration Store
//!
//! String settings grouped by section, the shape media-player hosts expose
//! to their plugins. [`JsonConfigStore`] keeps them in a JSON document.

use crate::{GsfError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Host configuration store
pub trait ConfigStore {
    /// Stored value of `key` in `section`
    fn get(&self, section: &str, key: &str) -> Option<String>;

    /// Store `value` under `key` in `section`
    fn set(&mut self, section: &str, key: &str, value: String);

    /// Persist pending changes
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Store each default whose key has no value yet
    fn set_defaults(&mut self, section: &str, defaults: &[(&str, &str)]) {
        for (key, value) in defaults {
            if self.get(section, key).is_none() {
                self.set(section, key, value.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct ConfigDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

/// Configuration store backed by a JSON file (or by memory only)
#[derive(Debug, Clone, Default)]
pub struct JsonConfigStore {
    path: Option<PathBuf>,
    document: ConfigDocument,
    dirty: bool,
}

impl JsonConfigStore {
    /// Store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`; a missing file starts empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                GsfError::ConfigError(format!(
                    "Invalid configuration file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => ConfigDocument::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(JsonConfigStore {
            path: Some(path.to_path_buf()),
            document,
            dirty: false,
        })
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.document.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: String) {
        let previous = self
            .document
            .sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        if previous.as_ref() != Some(&value) {
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        let text = serde_json::to_string_pretty(&self.document).map_err(|e| {
            GsfError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;
        fs::write(path, text)?;
        self.dirty = false;
        log::debug!("Configuration written to '{}'", path.display());
        Ok(())
    }
}
