use crate::keys::{direct_key_name, Modifier, ModifierState};
use crate::shortcut_config::{KeyMapping, ShortcutConfig, DEFAULT_COLOR};
use std::fmt;

/// Longest label a mapped button shows.
pub const MAX_LABEL_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Buttons send their own id.
    #[default]
    Direct,
    /// Buttons send what the mapping file says.
    Mapped,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Direct => DisplayMode::Mapped,
            DisplayMode::Mapped => DisplayMode::Direct,
        }
    }

    /// Caption of the mode button.
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Direct => "NUM",
            DisplayMode::Mapped => "SC",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Direct => write!(f, "numpad"),
            DisplayMode::Mapped => write!(f, "shortcut"),
        }
    }
}

/// Toggle state and mapping for one panel.
#[derive(Debug, Clone, Default)]
pub struct PanelSession {
    pub modifiers: ModifierState,
    pub mode: DisplayMode,
    mapping: KeyMapping,
}

impl PanelSession {
    pub fn new(mapping: KeyMapping) -> Self {
        Self {
            modifiers: ModifierState::default(),
            mode: DisplayMode::default(),
            mapping,
        }
    }

    /// Swap in a freshly loaded mapping; mode and latches stay as they are.
    pub fn set_mapping(&mut self, mapping: KeyMapping) {
        self.mapping = mapping;
    }

    pub fn reload_mapping(&mut self, config: &ShortcutConfig) {
        self.set_mapping(config.reload());
    }

    pub fn toggle_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.toggled();
        tracing::info!("mode switched to: {}", self.mode);
        self.mode
    }

    pub fn toggle_modifier(&mut self, modifier: Modifier) -> bool {
        let on = self.modifiers.toggle(modifier);
        tracing::info!("{} {}", modifier.label(), if on { "ON" } else { "OFF" });
        on
    }

    /// Key sequence a button id stands for in the current mode. Ids missing
    /// from the mapping are sent as they are.
    pub fn resolve_literal(&self, logical_id: &str) -> String {
        match self.mode {
            DisplayMode::Mapped => self
                .mapping
                .get(logical_id)
                .map(|entry| entry.key.as_str())
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(logical_id)
                .to_string(),
            DisplayMode::Direct => direct_key_name(logical_id).to_string(),
        }
    }

    pub fn button_label(&self, logical_id: &str) -> String {
        match self.mode {
            DisplayMode::Mapped => {
                let label = self
                    .mapping
                    .get(logical_id)
                    .map(|entry| entry.label.as_str())
                    .filter(|label| !label.is_empty())
                    .unwrap_or(logical_id);
                label.chars().take(MAX_LABEL_CHARS).collect()
            }
            DisplayMode::Direct => match logical_id {
                "return" => "Enter".into(),
                "backspace" => "BS".into(),
                "delete" => "Del".into(),
                other => other.into(),
            },
        }
    }

    pub fn button_color(&self, logical_id: &str) -> String {
        match self.mode {
            DisplayMode::Mapped => self
                .mapping
                .get(logical_id)
                .map(|entry| entry.color.clone())
                .unwrap_or_else(|| DEFAULT_COLOR.into()),
            DisplayMode::Direct => match logical_id {
                "return" => "#44aa44".into(),
                "backspace" | "delete" => "#ff8800".into(),
                _ => DEFAULT_COLOR.into(),
            },
        }
    }
}
