//! Button layouts for the three panel flavours, rendered by one generic
//! panel in [`crate::gui`].

use crate::keys::Modifier;
use crate::session::{DisplayMode, PanelSession};
use serde::{Deserialize, Serialize};

pub const BUTTON_COLOR: &str = "#4a90e2";
pub const LATCHED_COLOR: &str = "#ff8800";
pub const REFRESH_COLOR: &str = "#44aa44";
pub const SAVE_COLOR: &str = "#4aa444";
pub const CLOSE_COLOR: &str = "#ff4444";
pub const HIDE_COLOR: &str = "#888888";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PanelVariant {
    /// Editing shortcuts with SHIFT/CTRL latches and arrow keys.
    #[default]
    Keypad,
    /// Editing shortcuts without latches.
    Basic,
    /// Numbers with a switchable shortcut table.
    Numpad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Dispatch this logical key.
    Key(String),
    ToggleModifier(Modifier),
    ToggleMode,
    RefreshWindow,
    ReloadConfig,
    Hide,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSpec {
    /// Fixed caption. `None` takes the caption from the session, which
    /// depends on the display mode.
    pub label: Option<String>,
    pub action: ButtonAction,
    /// Fixed color, or `None` to ask the session.
    pub color: Option<String>,
    pub size: [f32; 2],
}

impl ButtonSpec {
    fn key(label: &str, literal: &str) -> Self {
        Self {
            label: Some(label.into()),
            action: ButtonAction::Key(literal.into()),
            color: Some(BUTTON_COLOR.into()),
            size: [50.0, 30.0],
        }
    }

    /// Caption and color follow the display mode.
    fn mapped(logical_id: &str) -> Self {
        Self {
            label: None,
            action: ButtonAction::Key(logical_id.into()),
            color: None,
            size: [45.0, 40.0],
        }
    }

    fn control(label: &str, action: ButtonAction, color: &str) -> Self {
        Self {
            label: Some(label.into()),
            action,
            color: Some(color.into()),
            size: [50.0, 30.0],
        }
    }

    fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = [width, height];
        self
    }

    pub fn caption_for(&self, session: &PanelSession) -> String {
        match (&self.label, &self.action) {
            (Some(label), _) => label.clone(),
            (None, ButtonAction::ToggleMode) => session.mode.label().into(),
            (None, ButtonAction::Key(id)) => session.button_label(id),
            (None, _) => String::new(),
        }
    }

    /// Base fill; latched toggles turn orange.
    pub fn color_for(&self, session: &PanelSession) -> String {
        let active = match self.action {
            ButtonAction::ToggleModifier(m) => session.modifiers.is_latched(m),
            ButtonAction::ToggleMode => session.mode == DisplayMode::Mapped,
            _ => false,
        };
        if active {
            return LATCHED_COLOR.into();
        }
        match (&self.color, &self.action) {
            (Some(color), _) => color.clone(),
            (None, ButtonAction::Key(id)) => session.button_color(id),
            (None, _) => BUTTON_COLOR.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowItem {
    Button(ButtonSpec),
    /// Pushes the remaining buttons to the right edge.
    Stretch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub collapsed_height: f32,
    pub rows: Vec<Vec<RowItem>>,
}

impl PanelLayout {
    pub fn for_variant(variant: PanelVariant) -> Self {
        match variant {
            PanelVariant::Keypad => keypad_layout(),
            PanelVariant::Basic => basic_layout(),
            PanelVariant::Numpad => numpad_layout(),
        }
    }

    /// Whether the panel can minimize itself, in which case it needs a
    /// taskbar entry to come back.
    pub fn can_hide(&self) -> bool {
        self.buttons().any(|b| b.action == ButtonAction::Hide)
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ButtonSpec> {
        self.rows.iter().flatten().filter_map(|item| match item {
            RowItem::Button(b) => Some(b),
            RowItem::Stretch => None,
        })
    }
}

fn b(spec: ButtonSpec) -> RowItem {
    RowItem::Button(spec)
}

fn keypad_layout() -> PanelLayout {
    let arrow = |label: &str, key: &str| b(ButtonSpec::key(label, key).sized(25.0, 25.0));
    PanelLayout {
        title: "Inkscape Keypad".into(),
        width: 320.0,
        height: 290.0,
        collapsed_height: 40.0,
        rows: vec![
            vec![
                b(ButtonSpec::key("Copy", "ctrl+c")),
                b(ButtonSpec::key("Paste", "ctrl+v")),
                b(ButtonSpec::key("Cut", "ctrl+x")),
                arrow("←", "Left"),
                arrow("↑", "Up"),
                arrow("↓", "Down"),
                arrow("→", "Right"),
            ],
            vec![
                b(ButtonSpec::key("Undo", "ctrl+z")),
                b(ButtonSpec::key("Redo", "ctrl+y")),
                b(ButtonSpec::key("Del", "Delete")),
                b(ButtonSpec::key("TAB", "Tab")),
                RowItem::Stretch,
            ],
            vec![
                b(ButtonSpec::key("All", "ctrl+a")),
                b(ButtonSpec::key("Group", "ctrl+g")),
                b(ButtonSpec::key("Ungrp", "ctrl+shift+g")),
                b(ButtonSpec::control(
                    Modifier::Shift.label(),
                    ButtonAction::ToggleModifier(Modifier::Shift),
                    BUTTON_COLOR,
                )),
                RowItem::Stretch,
            ],
            vec![
                b(ButtonSpec::key("Dup", "ctrl+d")),
                b(ButtonSpec::key("FlipH", "h")),
                b(ButtonSpec::key("FlipV", "v")),
                b(ButtonSpec::control(
                    Modifier::Control.label(),
                    ButtonAction::ToggleModifier(Modifier::Control),
                    BUTTON_COLOR,
                )),
                RowItem::Stretch,
            ],
            layer_row(),
            vec![
                b(ButtonSpec::control("↻", ButtonAction::RefreshWindow, REFRESH_COLOR)),
                b(ButtonSpec {
                    color: Some(SAVE_COLOR.into()),
                    ..ButtonSpec::key("Save", "ctrl+s")
                }),
                RowItem::Stretch,
                b(ButtonSpec::control("×", ButtonAction::Close, CLOSE_COLOR)),
            ],
        ],
    }
}

fn basic_layout() -> PanelLayout {
    PanelLayout {
        title: "Inkscape Keypad".into(),
        width: 320.0,
        height: 250.0,
        collapsed_height: 40.0,
        rows: vec![
            vec![
                b(ButtonSpec::key("Copy", "ctrl+c")),
                b(ButtonSpec::key("Paste", "ctrl+v")),
                b(ButtonSpec::key("Cut", "ctrl+x")),
            ],
            vec![
                b(ButtonSpec::key("Undo", "ctrl+z")),
                b(ButtonSpec::key("Redo", "ctrl+y")),
                b(ButtonSpec::key("Del", "Delete")),
            ],
            vec![
                b(ButtonSpec::key("All", "ctrl+a")),
                b(ButtonSpec::key("Group", "ctrl+g")),
                b(ButtonSpec::key("Ungrp", "ctrl+shift+g")),
            ],
            vec![
                b(ButtonSpec::key("Dup", "ctrl+d")),
                b(ButtonSpec::key("FlipH", "h")),
                b(ButtonSpec::key("FlipV", "v")),
            ],
            layer_row(),
            vec![
                b(ButtonSpec::control("↻", ButtonAction::RefreshWindow, REFRESH_COLOR)),
                b(ButtonSpec::control("_", ButtonAction::Hide, HIDE_COLOR)),
                RowItem::Stretch,
                b(ButtonSpec::control("×", ButtonAction::Close, CLOSE_COLOR)),
            ],
        ],
    }
}

fn numpad_layout() -> PanelLayout {
    let small = |label: &str, action: ButtonAction, color: &str| {
        b(ButtonSpec::control(label, action, color).sized(35.0, 30.0))
    };
    PanelLayout {
        title: "Numpad Palette".into(),
        width: 175.0,
        height: 280.0,
        collapsed_height: 40.0,
        rows: vec![
            vec![b(ButtonSpec::mapped("7")), b(ButtonSpec::mapped("8")), b(ButtonSpec::mapped("9"))],
            vec![b(ButtonSpec::mapped("4")), b(ButtonSpec::mapped("5")), b(ButtonSpec::mapped("6"))],
            vec![b(ButtonSpec::mapped("1")), b(ButtonSpec::mapped("2")), b(ButtonSpec::mapped("3"))],
            vec![
                b(ButtonSpec::mapped("0")),
                b(ButtonSpec::mapped("return").sized(100.0, 40.0)),
            ],
            vec![b(ButtonSpec::mapped("backspace")), b(ButtonSpec::mapped("delete"))],
            vec![
                b(ButtonSpec {
                    label: None,
                    ..ButtonSpec::control("", ButtonAction::ToggleMode, BUTTON_COLOR)
                }),
                small("↻", ButtonAction::RefreshWindow, REFRESH_COLOR),
                small("⟲", ButtonAction::ReloadConfig, SAVE_COLOR),
                RowItem::Stretch,
                small("×", ButtonAction::Close, CLOSE_COLOR),
            ],
        ],
    }
}

fn layer_row() -> Vec<RowItem> {
    vec![
        b(ButtonSpec::key("Raise", "Page_Up")),
        b(ButtonSpec::key("Lower", "Page_Down")),
        b(ButtonSpec::key("Front", "Home")),
        b(ButtonSpec::key("Back", "End")),
    ]
}

/// Hover shade for a button color.
pub fn lighten_color(color: &str) -> &str {
    match color {
        "#4a90e2" => "#5ba0f2",
        "#ff4444" => "#ff6666",
        "#44aa44" => "#66cc66",
        "#4aa444" => "#6cc466",
        "#ff8800" => "#ffaa00",
        "#888888" => "#aaaaaa",
        other => other,
    }
}

/// Pressed shade for a button color.
pub fn darken_color(color: &str) -> &str {
    match color {
        "#4a90e2" => "#3a80d2",
        "#ff4444" => "#dd2222",
        "#44aa44" => "#228822",
        "#4aa444" => "#2a8a24",
        "#ff8800" => "#cc6600",
        "#888888" => "#666666",
        other => other,
    }
}

/// Parse `#rrggbb`.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
