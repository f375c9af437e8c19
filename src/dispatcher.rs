//! Sending a button's key sequence to the target window.
//!
//! The primary path focuses the window with `wmctrl` and types through
//! `xdotool key`. If either tool cannot be run the sequence is replayed
//! through [`rdev`] instead. Outcomes are only logged; a missed keystroke
//! never reaches the UI.

use crate::common::command::CommandRunner;
use crate::error::{InjectError, ToolError};
use crate::keys::{KeyCombo, KeyToken, Modifier};
use crate::session::PanelSession;
use crate::window_manager::{
    first_window_id, ResolvedWindow, WindowHandle, WindowResolver, WMCTRL, XDOTOOL,
};
use std::thread;
use std::time::Duration;

/// In-process key injection used when the helper tools fail.
pub trait KeyInjector {
    fn press(&self, key: &KeyToken) -> Result<(), InjectError>;
    /// Press `keys` in order and release them in reverse.
    fn hotkey(&self, keys: &[KeyToken]) -> Result<(), InjectError>;
}

/// Synthesizes X events through `rdev::simulate`.
#[derive(Debug, Clone, Copy)]
pub struct RdevInjector {
    /// Pause after each event so the X server registers it.
    pub event_delay: Duration,
}

impl Default for RdevInjector {
    fn default() -> Self {
        Self {
            event_delay: Duration::from_millis(50),
        }
    }
}

impl RdevInjector {
    fn simulate(&self, event: rdev::EventType) -> Result<(), InjectError> {
        rdev::simulate(&event).map_err(|_| InjectError::Simulate(format!("{event:?}")))?;
        thread::sleep(self.event_delay);
        Ok(())
    }
}

/// Key codes to press for `keys`, in order. Uppercase letters get a shift
/// press in front unless the sequence already holds shift.
pub fn rdev_sequence(keys: &[KeyToken]) -> Result<Vec<rdev::Key>, InjectError> {
    let mut codes = keys
        .iter()
        .map(|k| k.rdev_key().ok_or_else(|| InjectError::UnknownKey(k.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    let shifted = keys.iter().any(|k| *k == KeyToken::Modifier(Modifier::Shift));
    if !shifted && keys.iter().any(KeyToken::is_uppercase_letter) {
        codes.insert(0, rdev::Key::ShiftLeft);
    }
    Ok(codes)
}

impl KeyInjector for RdevInjector {
    fn press(&self, key: &KeyToken) -> Result<(), InjectError> {
        self.hotkey(std::slice::from_ref(key))
    }

    fn hotkey(&self, keys: &[KeyToken]) -> Result<(), InjectError> {
        if keys.is_empty() {
            return Err(InjectError::Empty);
        }
        let codes = rdev_sequence(keys)?;
        for code in &codes {
            self.simulate(rdev::EventType::KeyPress(*code))?;
        }
        for code in codes.iter().rev() {
            self.simulate(rdev::EventType::KeyRelease(*code))?;
        }
        Ok(())
    }
}

pub struct KeyDispatcher<R, I> {
    runner: R,
    injector: I,
    resolver: WindowResolver,
    focus_delay: Duration,
    window: Option<WindowHandle>,
}

impl<R: CommandRunner, I: KeyInjector> KeyDispatcher<R, I> {
    pub fn new(runner: R, injector: I, resolver: WindowResolver) -> Self {
        Self {
            runner,
            injector,
            resolver,
            focus_delay: Duration::from_millis(50),
            window: None,
        }
    }

    /// Time given to the window manager between activation and typing.
    pub fn with_focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay = delay;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }

    pub fn set_window(&mut self, handle: Option<WindowHandle>) {
        self.window = handle;
    }

    pub fn invalidate_window(&mut self) {
        if let Some(handle) = self.window.take() {
            tracing::debug!(%handle, "dropped cached window");
        }
    }

    /// Forget the cached window and look it up again.
    pub fn refresh_window(&mut self) -> Option<ResolvedWindow> {
        self.invalidate_window();
        let found = self.resolver.locate(&self.runner);
        self.window = found.map(|w| w.handle);
        found
    }

    /// Send the key sequence bound to `logical_key` under the session's mode
    /// and latched modifiers.
    pub fn dispatch(&mut self, logical_key: &str, session: &PanelSession) {
        let literal = session.resolve_literal(logical_key);
        let combo = KeyCombo::parse(&literal).with_latched(&session.modifiers);
        if combo.is_empty() {
            tracing::warn!(button = logical_key, "ignoring empty key sequence");
            return;
        }
        match self.send_with_tools(&combo) {
            Ok(()) => tracing::info!("sent key: {combo} ({} mode)", session.mode),
            Err(e) => {
                tracing::warn!("key send error: {e}");
                self.invalidate_window();
                match self.send_with_injector(&combo) {
                    Ok(()) => tracing::info!("fallback sent key: {combo} ({} mode)", session.mode),
                    Err(e) => tracing::error!("fallback error: {e}"),
                }
            }
        }
    }

    fn send_with_tools(&mut self, combo: &KeyCombo) -> Result<(), ToolError> {
        self.focus_target()?;
        let arg = combo.xdotool_arg();
        let out = self.runner.run(XDOTOOL, &["key", &arg])?;
        if !out.success {
            tracing::debug!(key = %arg, "xdotool key reported failure");
        }
        Ok(())
    }

    fn send_with_injector(&self, combo: &KeyCombo) -> Result<(), InjectError> {
        match combo.tokens() {
            [] => Err(InjectError::Empty),
            [single] => self.injector.press(single),
            keys => self.injector.hotkey(keys),
        }
    }

    fn focus_target(&mut self) -> Result<(), ToolError> {
        if self.window.is_none() {
            self.window = self.resolver.find_target_window(&self.runner);
        }
        match self.window {
            Some(handle) => self.activate_window(handle)?,
            None => self.activate_any_target()?,
        }
        if !self.focus_delay.is_zero() {
            thread::sleep(self.focus_delay);
        }
        Ok(())
    }

    /// Raise `handle` with `wmctrl`, or with `xdotool` when `wmctrl` cannot
    /// be run.
    fn activate_window(&mut self, handle: WindowHandle) -> Result<(), ToolError> {
        let token = handle.to_string();
        match self.runner.run(WMCTRL, &["-i", "-a", &token]) {
            Ok(out) => {
                if !out.success {
                    tracing::warn!(%handle, "could not activate cached window; it will be looked up again");
                    self.window = None;
                }
            }
            Err(e) => {
                tracing::debug!("{e}; activating through xdotool");
                let id = handle.id().to_string();
                self.runner
                    .run(XDOTOOL, &["windowactivate", "--sync", &id])?;
            }
        }
        Ok(())
    }

    /// Best effort without a known handle: activate the first window of the
    /// target class, if there is one.
    fn activate_any_target(&self) -> Result<(), ToolError> {
        let class = &self.resolver.target().search_class;
        let out = self.runner.run(XDOTOOL, &["search", "--class", class])?;
        match first_window_id(&out.stdout) {
            Some(handle) => {
                let id = handle.id().to_string();
                self.runner
                    .run(XDOTOOL, &["windowactivate", "--sync", &id])?;
            }
            None => tracing::debug!(class = %class, "no window to activate"),
        }
        Ok(())
    }
}
