//! Locating the target application's top-level window through `wmctrl` and
//! `xdotool`.

use crate::common::command::CommandRunner;
use std::fmt;

pub const WMCTRL: &str = "wmctrl";
pub const XDOTOOL: &str = "xdotool";

/// An X11 window id. Displayed in the zero-padded hexadecimal form `wmctrl`
/// prints, whichever tool produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }

    /// Parse a `0x03a00003` token.
    pub fn parse_hex(token: &str) -> Option<Self> {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))?;
        u64::from_str_radix(digits, 16).ok().map(Self)
    }

    /// Parse a decimal id as printed by `xdotool search`.
    pub fn parse_decimal(token: &str) -> Option<Self> {
        token.trim().parse::<u64>().ok().map(Self)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub handle: WindowHandle,
    pub geometry: Option<WindowGeometry>,
}

/// Identity of the application whose window receives keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetApp {
    /// `WM_CLASS` strings as shown by `wmctrl -lx`. Older releases used
    /// `inkscape.Inkscape`, newer ones `org.inkscape.Inkscape`.
    pub class_identities: Vec<String>,
    /// Class passed to `xdotool search --class`.
    pub search_class: String,
}

impl Default for TargetApp {
    fn default() -> Self {
        Self {
            class_identities: vec![
                "inkscape.Inkscape".into(),
                "org.inkscape.Inkscape".into(),
            ],
            search_class: "inkscape".into(),
        }
    }
}

impl TargetApp {
    fn matches_class(&self, class: &str) -> bool {
        self.class_identities
            .iter()
            .any(|id| !id.is_empty() && class.contains(id.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct WindowResolver {
    target: TargetApp,
    with_geometry: bool,
}

impl WindowResolver {
    pub fn new(target: TargetApp) -> Self {
        Self {
            target,
            with_geometry: false,
        }
    }

    /// Also read window geometry so the panel can follow the target's
    /// monitor.
    pub fn with_geometry(mut self, enabled: bool) -> Self {
        self.with_geometry = enabled;
        self
    }

    pub fn target(&self) -> &TargetApp {
        &self.target
    }

    pub fn find_target_window<R: CommandRunner + ?Sized>(&self, runner: &R) -> Option<WindowHandle> {
        self.locate(runner).map(|w| w.handle)
    }

    /// Try the window list first, then a class search. Tool failures fall
    /// through to the next strategy and never reach the caller.
    pub fn locate<R: CommandRunner + ?Sized>(&self, runner: &R) -> Option<ResolvedWindow> {
        if let Some(found) = self.from_window_list(runner) {
            tracing::info!(handle = %found.handle, "found target window");
            return Some(found);
        }
        if let Some(handle) = search_by_class(runner, &self.target.search_class) {
            tracing::info!(%handle, "found target window via xdotool");
            return Some(ResolvedWindow {
                handle,
                geometry: None,
            });
        }
        tracing::warn!(
            classes = ?self.target.class_identities,
            "no target window found"
        );
        None
    }

    fn from_window_list<R: CommandRunner + ?Sized>(&self, runner: &R) -> Option<ResolvedWindow> {
        let flags = if self.with_geometry { "-lxG" } else { "-lx" };
        let out = match runner.run(WMCTRL, &[flags]) {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!("window search error: {e}");
                return None;
            }
        };
        if !out.success {
            tracing::debug!("wmctrl {flags} exited with failure");
        }
        if self.with_geometry {
            parse_window_list_with_geometry(&out.stdout, &self.target)
        } else {
            parse_window_list(&out.stdout, &self.target).map(|handle| ResolvedWindow {
                handle,
                geometry: None,
            })
        }
    }
}

/// First window of class `class` according to `xdotool search`.
pub fn search_by_class<R: CommandRunner + ?Sized>(runner: &R, class: &str) -> Option<WindowHandle> {
    match runner.run(XDOTOOL, &["search", "--class", class]) {
        Ok(out) => first_window_id(&out.stdout),
        Err(e) => {
            tracing::debug!("xdotool search failed: {e}");
            None
        }
    }
}

/// First decimal id in `xdotool search` output.
pub fn first_window_id(stdout: &str) -> Option<WindowHandle> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .and_then(WindowHandle::parse_decimal)
}

/// Parse `wmctrl -lx`: `<id> <desktop> <class> <host> <title...>`.
pub fn parse_window_list(stdout: &str, target: &TargetApp) -> Option<WindowHandle> {
    stdout.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let id = fields.next()?;
        let class = fields.nth(1)?;
        if target.matches_class(class) {
            WindowHandle::parse_hex(id)
        } else {
            None
        }
    })
}

/// Parse `wmctrl -lxG`: `<id> <desktop> <x> <y> <w> <h> <class> <host> <title...>`.
pub fn parse_window_list_with_geometry(stdout: &str, target: &TargetApp) -> Option<ResolvedWindow> {
    stdout.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 7 || !target.matches_class(fields[6]) {
            return None;
        }
        let handle = WindowHandle::parse_hex(fields[0])?;
        let num = |i: usize| fields[i].parse::<i32>().ok();
        let geometry = match (num(2), num(3), num(4), num(5)) {
            (Some(x), Some(y), Some(width), Some(height)) => Some(WindowGeometry {
                x,
                y,
                width,
                height,
            }),
            _ => None,
        };
        Some(ResolvedWindow { handle, geometry })
    })
}
