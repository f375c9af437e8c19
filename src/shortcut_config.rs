//! User-editable mapping from numpad button ids to shortcut keys.
//!
//! The file lives next to the panel executable. When it is missing the
//! built-in numpad table is written there so users have something to edit.

use crate::common::config_files::write_config_file;
use crate::error::ConfigError;
use hashlink::LinkedHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

pub const MAPPING_FILE: &str = "numpad_config.json";
pub const DEFAULT_COLOR: &str = "#4a90e2";

/// Button id -> entry, in file order.
pub type KeyMapping = LinkedHashMap<String, KeyMappingEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMappingEntry {
    #[serde(default, deserialize_with = "text_or_number")]
    pub label: String,
    /// Key sequence to inject, e.g. `ctrl+shift+g`.
    #[serde(default, deserialize_with = "text_or_number")]
    pub key: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl KeyMappingEntry {
    pub fn new(label: &str, key: &str, color: &str) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            color: color.into(),
        }
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}

/// Accept `"7"` as well as a bare `7` for label and key.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Built-in numpad table: digits send themselves, Enter/BS/Del send their
/// keysyms.
pub fn default_mapping() -> KeyMapping {
    let mut map = KeyMapping::new();
    for digit in ["7", "8", "9", "4", "5", "6", "1", "2", "3", "0"] {
        map.insert(digit.into(), KeyMappingEntry::new(digit, digit, DEFAULT_COLOR));
    }
    map.insert(
        "return".into(),
        KeyMappingEntry::new("Enter", "Return", "#44aa44"),
    );
    map.insert(
        "backspace".into(),
        KeyMappingEntry::new("BS", "BackSpace", "#ff8800"),
    );
    map.insert(
        "delete".into(),
        KeyMappingEntry::new("Del", "Delete", "#ff8800"),
    );
    map
}

#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    path: PathBuf,
}

impl ShortcutConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the mapping. Never fails: unreadable or invalid files yield the
    /// defaults, a missing file is created from them.
    pub fn load(&self) -> KeyMapping {
        if !self.path.exists() {
            let defaults = default_mapping();
            match self.save(&defaults) {
                Ok(()) => tracing::info!("created default config at {}", self.path.display()),
                Err(e) => tracing::error!("error saving default config: {e}"),
            }
            return defaults;
        }
        match self.read() {
            Ok(map) => {
                tracing::info!("loaded config from {}", self.path.display());
                map
            }
            Err(e) => {
                tracing::error!("error loading config: {e}");
                default_mapping()
            }
        }
    }

    pub fn reload(&self) -> KeyMapping {
        tracing::info!("reloading configuration");
        self.load()
    }

    pub fn save(&self, mapping: &KeyMapping) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(mapping).map_err(|e| ConfigError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        write_config_file(&self.path, &json).map_err(|e| ConfigError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn read(&self) -> Result<KeyMapping, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
