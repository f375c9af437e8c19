use crate::common::command::CommandRunner;

pub const XRANDR: &str = "xrandr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub rect: MonitorRect,
    pub primary: bool,
}

/// Where the panel sits relative to its monitor's top-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPlacement {
    pub panel_width: i32,
    pub edge_margin: i32,
    pub top_offset: i32,
}

pub fn monitor_contains_point(rect: MonitorRect, point: (i32, i32)) -> bool {
    point.0 >= rect.x
        && point.0 < rect.x + rect.width
        && point.1 >= rect.y
        && point.1 < rect.y + rect.height
}

pub fn select_monitor_for_point(monitors: &[Monitor], point: (i32, i32)) -> Option<Monitor> {
    monitors
        .iter()
        .copied()
        .find(|m| monitor_contains_point(m.rect, point))
}

pub fn primary_monitor(monitors: &[Monitor]) -> Option<Monitor> {
    monitors
        .iter()
        .copied()
        .find(|m| m.primary)
        .or_else(|| monitors.first().copied())
}

/// Top-left corner for the panel: right edge of the monitor holding
/// `anchor`, or of the primary monitor when no monitor contains it.
pub fn panel_position(
    monitors: &[Monitor],
    anchor: Option<(i32, i32)>,
    placement: PanelPlacement,
) -> Option<(i32, i32)> {
    let monitor = anchor
        .and_then(|point| select_monitor_for_point(monitors, point))
        .or_else(|| primary_monitor(monitors))?;
    let rect = monitor.rect;
    Some((
        rect.x + rect.width - placement.panel_width - placement.edge_margin,
        rect.y + placement.top_offset,
    ))
}

/// Monitors reported by `xrandr --listmonitors`. Empty when the tool is
/// unavailable.
pub fn query_monitors<R: CommandRunner + ?Sized>(runner: &R) -> Vec<Monitor> {
    match runner.run(XRANDR, &["--listmonitors"]) {
        Ok(out) => parse_xrandr_monitors(&out.stdout),
        Err(e) => {
            tracing::debug!("monitor query failed: {e}");
            Vec::new()
        }
    }
}

/// Parse lines such as ` 0: +*DP-1 1920/527x1080/296+0+0  DP-1`.
pub fn parse_xrandr_monitors(stdout: &str) -> Vec<Monitor> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let index = fields.next()?;
            if !index.ends_with(':') {
                return None;
            }
            let name = fields.next()?;
            let geometry = fields.next()?;
            Some(Monitor {
                rect: parse_xrandr_geometry(geometry)?,
                primary: name.contains('*'),
            })
        })
        .collect()
}

/// `W/mmxH/mm+X+Y`; physical sizes are optional.
fn parse_xrandr_geometry(token: &str) -> Option<MonitorRect> {
    let (size, offsets) = token.split_once('+')?;
    let (x, y) = offsets.split_once('+')?;
    let (w, h) = size.split_once('x')?;
    let pixels = |part: &str| part.split('/').next()?.parse::<i32>().ok();
    Some(MonitorRect {
        x: x.parse().ok()?,
        y: y.parse().ok()?,
        width: pixels(w)?,
        height: pixels(h)?,
    })
}
