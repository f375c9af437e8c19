use crate::common::command::CommandRunner;
use crate::error::install_package;
use crate::window_manager::{WMCTRL, XDOTOOL};

/// Tools the primary send path depends on.
pub const REQUIRED_TOOLS: [&str; 2] = [WMCTRL, XDOTOOL];

/// Probe each required tool with `--version` and return the ones that are
/// missing or broken. Missing tools are reported with an install hint; the
/// panel still starts and relies on the fallback injector.
pub fn check_dependencies<R: CommandRunner + ?Sized>(runner: &R) -> Vec<String> {
    let missing: Vec<String> = REQUIRED_TOOLS
        .iter()
        .filter(|tool| match runner.run(tool, &["--version"]) {
            Ok(out) => !out.success,
            Err(e) => {
                tracing::debug!("{e}");
                true
            }
        })
        .map(|tool| tool.to_string())
        .collect();

    if !missing.is_empty() {
        tracing::warn!("missing dependencies: {}", missing.join(", "));
        for tool in &missing {
            tracing::warn!("  sudo apt install {}", install_package(tool));
        }
    }
    missing
}
