use crate::common::config_files::{resolve_config_path, write_config_file};
use crate::layout::PanelVariant;
use crate::monitor::PanelPlacement;
use crate::shortcut_config::MAPPING_FILE;
use crate::window_manager::TargetApp;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log. Relative paths are taken
    /// from the installation directory.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Panel shown when `--variant` is not given.
    #[serde(default)]
    pub variant: PanelVariant,
    /// `wmctrl` class strings identifying the target editor.
    #[serde(default = "default_window_classes")]
    pub window_classes: Vec<String>,
    /// Class passed to `xdotool search --class`.
    #[serde(default = "default_search_class")]
    pub search_class: String,
    /// Milliseconds between activating the window and typing.
    #[serde(default = "default_focus_delay")]
    pub focus_delay_ms: u64,
    /// Milliseconds between synthesized events on the fallback path.
    #[serde(default = "default_fallback_key_delay")]
    pub fallback_key_delay_ms: u64,
    /// Move the panel to the monitor showing the editor.
    #[serde(default = "default_true")]
    pub follow_target_monitor: bool,
    /// Gap between the panel and the right edge of its monitor.
    #[serde(default = "default_edge_margin")]
    pub edge_margin: i32,
    /// Gap between the panel and the top edge of its monitor.
    #[serde(default = "default_top_offset")]
    pub top_offset: i32,
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,
}

fn default_window_classes() -> Vec<String> {
    TargetApp::default().class_identities
}

fn default_search_class() -> String {
    TargetApp::default().search_class
}

fn default_focus_delay() -> u64 {
    50
}

fn default_fallback_key_delay() -> u64 {
    50
}

fn default_true() -> bool {
    true
}

fn default_edge_margin() -> i32 {
    50
}

fn default_top_offset() -> i32 {
    50
}

fn default_mapping_file() -> String {
    MAPPING_FILE.into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            variant: PanelVariant::default(),
            window_classes: default_window_classes(),
            search_class: default_search_class(),
            focus_delay_ms: default_focus_delay(),
            fallback_key_delay_ms: default_fallback_key_delay(),
            follow_target_monitor: true,
            edge_margin: default_edge_margin(),
            top_offset: default_top_offset(),
            mapping_file: default_mapping_file(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields the
    /// defaults; malformed JSON is an error.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_config_file(path.as_ref(), &json)?;
        Ok(())
    }

    /// Save to `path` unless a file is already there, so users get a file to
    /// edit. Returns whether it was written.
    pub fn write_if_missing(&self, path: impl AsRef<Path>) -> anyhow::Result<bool> {
        if path.as_ref().exists() {
            return Ok(false);
        }
        self.save(path)?;
        Ok(true)
    }

    pub fn target_app(&self) -> TargetApp {
        TargetApp {
            class_identities: self.window_classes.clone(),
            search_class: self.search_class.clone(),
        }
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn fallback_key_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_key_delay_ms)
    }

    pub fn placement(&self, panel_width: f32) -> PanelPlacement {
        PanelPlacement {
            panel_width: panel_width.round() as i32,
            edge_margin: self.edge_margin,
            top_offset: self.top_offset,
        }
    }

    pub fn mapping_path(&self, base_dir: &Path) -> PathBuf {
        resolve_config_path(base_dir, &self.mapping_file)
    }

    pub fn log_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(|f| resolve_config_path(base_dir, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"variant": "numpad"}"#).unwrap();
        assert_eq!(settings.variant, PanelVariant::Numpad);
        assert_eq!(settings.search_class, "inkscape");
        assert_eq!(settings.focus_delay_ms, 50);
        assert!(settings.follow_target_monitor);
        assert_eq!(settings.mapping_file, MAPPING_FILE);
    }

    #[test]
    fn missing_or_empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            debug_logging: true,
            edge_margin: 10,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn existing_settings_are_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert!(Settings::default().write_if_missing(&path).unwrap());
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        std::fs::write(&path, r#"{"edge_margin": 7}"#).unwrap();
        assert!(!Settings::default().write_if_missing(&path).unwrap());
        assert_eq!(Settings::load(&path).unwrap().edge_margin, 7);
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/opt/keypad");
        let settings = Settings {
            log_file: Some("keypad.log".into()),
            ..Settings::default()
        };
        assert_eq!(
            settings.mapping_path(base),
            base.join(MAPPING_FILE)
        );
        assert_eq!(settings.log_path(base), Some(base.join("keypad.log")));
        assert_eq!(Settings::default().log_path(base), None);
    }
}
