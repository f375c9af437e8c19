//! Key sequences as they travel from a panel button to the injector.
//!
//! Sequences are written in the configuration vocabulary (`ctrl+shift+g`,
//! `Page_Up`, `Return`) and rendered for `xdotool` (`control+shift+g`) or
//! mapped to [`rdev::Key`] codes for the in-process fallback.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Control,
    Shift,
    Alt,
    Super,
}

impl Modifier {
    /// Modifiers the panel can latch, in the order they are prepended.
    pub const LATCHABLE: [Modifier; 2] = [Modifier::Control, Modifier::Shift];

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Control),
            "shift" => Some(Modifier::Shift),
            "alt" => Some(Modifier::Alt),
            "super" | "win" | "meta" => Some(Modifier::Super),
            _ => None,
        }
    }

    /// Name used in the mapping file and in log lines.
    pub fn config_name(self) -> &'static str {
        match self {
            Modifier::Control => "ctrl",
            Modifier::Shift => "shift",
            Modifier::Alt => "alt",
            Modifier::Super => "super",
        }
    }

    /// Name `xdotool key` expects.
    pub fn xdotool_name(self) -> &'static str {
        match self {
            Modifier::Control => "control",
            Modifier::Shift => "shift",
            Modifier::Alt => "alt",
            Modifier::Super => "super",
        }
    }

    /// Caption of the latch button.
    pub fn label(self) -> &'static str {
        match self {
            Modifier::Control => "CTRL",
            Modifier::Shift => "SHIFT",
            Modifier::Alt => "ALT",
            Modifier::Super => "SUPER",
        }
    }

    fn rdev_key(self) -> rdev::Key {
        match self {
            Modifier::Control => rdev::Key::ControlLeft,
            Modifier::Shift => rdev::Key::ShiftLeft,
            Modifier::Alt => rdev::Key::Alt,
            Modifier::Super => rdev::Key::MetaLeft,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Sticky modifiers toggled from the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub control: bool,
    pub shift: bool,
}

impl ModifierState {
    pub fn is_latched(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Control => self.control,
            Modifier::Shift => self.shift,
            Modifier::Alt | Modifier::Super => false,
        }
    }

    /// Flip `modifier` and return the new state. Only latchable modifiers
    /// change.
    pub fn toggle(&mut self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Control => {
                self.control = !self.control;
                self.control
            }
            Modifier::Shift => {
                self.shift = !self.shift;
                self.shift
            }
            Modifier::Alt | Modifier::Super => false,
        }
    }

    pub fn latched(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::LATCHABLE
            .into_iter()
            .filter(move |m| self.is_latched(*m))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyToken {
    Modifier(Modifier),
    Key(String),
}

impl KeyToken {
    pub fn xdotool_name(&self) -> &str {
        match self {
            KeyToken::Modifier(m) => m.xdotool_name(),
            // `+` is the chord separator for xdotool.
            KeyToken::Key(k) if k == "+" => "plus",
            KeyToken::Key(k) => k,
        }
    }

    pub fn is_uppercase_letter(&self) -> bool {
        match self {
            KeyToken::Key(k) => {
                let mut chars = k.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
            }
            KeyToken::Modifier(_) => false,
        }
    }

    /// Key code for the in-process injector.
    pub fn rdev_key(&self) -> Option<rdev::Key> {
        match self {
            KeyToken::Modifier(m) => Some(m.rdev_key()),
            KeyToken::Key(k) => rdev_key_for_name(k),
        }
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Modifier(m) => f.write_str(m.config_name()),
            KeyToken::Key(k) => f.write_str(k),
        }
    }
}

/// A single key or a `+`-joined chord.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCombo {
    tokens: Vec<KeyToken>,
}

impl KeyCombo {
    /// Parse `ctrl+shift+g`, `Page_Up`, `+` or `ctrl++`. Repeated modifiers
    /// collapse.
    pub fn parse(literal: &str) -> Self {
        let literal = literal.trim();
        // A trailing `+` right after a separator (or alone) is the plus key.
        let (body, plus_key) = match literal.strip_suffix('+') {
            Some(rest) if rest.is_empty() || rest.ends_with('+') => (rest, true),
            _ => (literal, false),
        };
        let mut combo = Self::default();
        for part in body.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match Modifier::parse(part) {
                Some(m) => {
                    if !combo.has_modifier(m) {
                        combo.tokens.push(KeyToken::Modifier(m));
                    }
                }
                None => combo.tokens.push(KeyToken::Key(part.to_string())),
            }
        }
        if plus_key {
            combo.tokens.push(KeyToken::Key("+".into()));
        }
        combo
    }

    pub fn tokens(&self) -> &[KeyToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, KeyToken::Modifier(m) if *m == modifier))
    }

    /// Prepend every latched modifier the sequence does not already carry,
    /// control before shift.
    pub fn with_latched(&self, state: &ModifierState) -> Self {
        let mut tokens: Vec<KeyToken> = state
            .latched()
            .filter(|m| !self.has_modifier(*m))
            .map(KeyToken::Modifier)
            .collect();
        tokens.extend(self.tokens.iter().cloned());
        Self { tokens }
    }

    /// Argument for `xdotool key`.
    pub fn xdotool_arg(&self) -> String {
        self.tokens
            .iter()
            .map(KeyToken::xdotool_name)
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Translate the three reserved numpad identifiers to X keysym names.
pub fn direct_key_name(logical_id: &str) -> &str {
    match logical_id {
        "return" => "Return",
        "backspace" => "BackSpace",
        "delete" => "Delete",
        other => other,
    }
}

/// Map an X keysym style name (`Page_Up`, `BackSpace`, `a`, `F5`) to an
/// [`rdev::Key`]. Letters map to their key regardless of case; the injector
/// adds shift for uppercase ones.
pub fn rdev_key_for_name(name: &str) -> Option<rdev::Key> {
    use rdev::Key;

    let upper = name.trim().to_ascii_uppercase();
    match upper.as_str() {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "RETURN" | "ENTER" => Some(Key::Return),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "DELETE" | "DEL" => Some(Key::Delete),
        "BACKSPACE" => Some(Key::Backspace),
        "INSERT" => Some(Key::Insert),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGE_UP" | "PAGEUP" | "PRIOR" => Some(Key::PageUp),
        "PAGE_DOWN" | "PAGEDOWN" | "NEXT" => Some(Key::PageDown),
        "LEFT" => Some(Key::LeftArrow),
        "RIGHT" => Some(Key::RightArrow),
        "UP" => Some(Key::UpArrow),
        "DOWN" => Some(Key::DownArrow),
        "MINUS" | "-" => Some(Key::Minus),
        "EQUAL" | "=" => Some(Key::Equal),
        "COMMA" | "," => Some(Key::Comma),
        "PERIOD" | "." => Some(Key::Dot),
        "SLASH" | "/" => Some(Key::Slash),
        "BACKSLASH" | "\\" => Some(Key::BackSlash),
        "SEMICOLON" | ";" => Some(Key::SemiColon),
        "APOSTROPHE" | "'" => Some(Key::Quote),
        "GRAVE" | "`" => Some(Key::BackQuote),
        "BRACKETLEFT" | "[" => Some(Key::LeftBracket),
        "BRACKETRIGHT" | "]" => Some(Key::RightBracket),
        "KP_ADD" | "PLUS" | "+" => Some(Key::KpPlus),
        "KP_SUBTRACT" => Some(Key::KpMinus),
        "KP_MULTIPLY" | "ASTERISK" | "*" => Some(Key::KpMultiply),
        "KP_DIVIDE" => Some(Key::KpDivide),
        _ if upper.starts_with('F') && upper.len() > 1 => match upper[1..].parse::<u8>().ok() {
            Some(1) => Some(Key::F1),
            Some(2) => Some(Key::F2),
            Some(3) => Some(Key::F3),
            Some(4) => Some(Key::F4),
            Some(5) => Some(Key::F5),
            Some(6) => Some(Key::F6),
            Some(7) => Some(Key::F7),
            Some(8) => Some(Key::F8),
            Some(9) => Some(Key::F9),
            Some(10) => Some(Key::F10),
            Some(11) => Some(Key::F11),
            Some(12) => Some(Key::F12),
            _ => None,
        },
        _ if upper.chars().count() == 1 => upper.chars().next().and_then(single_char_key),
        _ => None,
    }
}

fn single_char_key(c: char) -> Option<rdev::Key> {
    use rdev::Key;

    Some(match c {
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        'A' => Key::KeyA,
        'B' => Key::KeyB,
        'C' => Key::KeyC,
        'D' => Key::KeyD,
        'E' => Key::KeyE,
        'F' => Key::KeyF,
        'G' => Key::KeyG,
        'H' => Key::KeyH,
        'I' => Key::KeyI,
        'J' => Key::KeyJ,
        'K' => Key::KeyK,
        'L' => Key::KeyL,
        'M' => Key::KeyM,
        'N' => Key::KeyN,
        'O' => Key::KeyO,
        'P' => Key::KeyP,
        'Q' => Key::KeyQ,
        'R' => Key::KeyR,
        'S' => Key::KeyS,
        'T' => Key::KeyT,
        'U' => Key::KeyU,
        'V' => Key::KeyV,
        'W' => Key::KeyW,
        'X' => Key::KeyX,
        'Y' => Key::KeyY,
        'Z' => Key::KeyZ,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_is_rendered_as_control_for_xdotool() {
        let combo = KeyCombo::parse("ctrl+shift+g");
        assert_eq!(combo.xdotool_arg(), "control+shift+g");
        assert_eq!(combo.to_string(), "ctrl+shift+g");
    }

    #[test]
    fn single_key_passes_through() {
        let combo = KeyCombo::parse("Page_Up");
        assert_eq!(combo.tokens().len(), 1);
        assert_eq!(combo.xdotool_arg(), "Page_Up");
    }

    #[test]
    fn plus_after_modifier_is_the_plus_key() {
        let combo = KeyCombo::parse("ctrl++");
        assert_eq!(
            combo.tokens(),
            &[KeyToken::Modifier(Modifier::Control), KeyToken::Key("+".into())]
        );
        assert_eq!(combo.xdotool_arg(), "control+plus");
        assert_eq!(combo.to_string(), "ctrl++");
        assert_eq!(KeyCombo::parse("ctrl+").xdotool_arg(), "control");
    }

    #[test]
    fn latched_plus_renders_for_xdotool() {
        let mut state = ModifierState::default();
        state.toggle(Modifier::Shift);
        let combo = KeyCombo::parse("+").with_latched(&state);
        assert_eq!(combo.xdotool_arg(), "shift+plus");
        assert_eq!(KeyCombo::parse(&combo.to_string()), combo);
    }

    #[test]
    fn plus_alone_is_a_key() {
        assert_eq!(KeyCombo::parse("+").tokens(), &[KeyToken::Key("+".into())]);
    }

    #[test]
    fn repeated_modifiers_collapse() {
        assert_eq!(KeyCombo::parse("ctrl+control+x").xdotool_arg(), "control+x");
    }

    #[test]
    fn reserved_identifiers_translate() {
        assert_eq!(direct_key_name("return"), "Return");
        assert_eq!(direct_key_name("backspace"), "BackSpace");
        assert_eq!(direct_key_name("delete"), "Delete");
        assert_eq!(direct_key_name("7"), "7");
    }

    #[test]
    fn rdev_names_cover_panel_keys() {
        use rdev::Key;
        let cases = [
            ("Page_Up", Some(Key::PageUp)),
            ("BackSpace", Some(Key::Backspace)),
            ("Return", Some(Key::Return)),
            ("h", Some(Key::KeyH)),
            ("7", Some(Key::Num7)),
            ("F5", Some(Key::F5)),
            ("NoSuchKey", None),
        ];
        for (name, expected) in cases {
            assert_eq!(rdev_key_for_name(name), expected, "name: {name}");
        }
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut state = ModifierState::default();
        assert!(state.toggle(Modifier::Shift));
        assert!(state.is_latched(Modifier::Shift));
        assert!(!state.toggle(Modifier::Shift));
        assert!(!state.toggle(Modifier::Alt));
    }
}
