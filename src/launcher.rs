//! Entry point used as an editor extension: start the panel in the
//! background and hand the editor its document back untouched.

use crate::layout::PanelVariant;
use anyhow::Context;
use clap::ValueEnum;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const PANEL_BINARY: &str = "ink_keypad";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub variant: Option<PanelVariant>,
    /// Document the host passed in, echoed back on stdout.
    pub document: Option<PathBuf>,
}

impl LaunchRequest {
    /// Pick `--variant` out of the host's arguments and take the last
    /// argument naming an existing file as the document. Other host options
    /// are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let value = if arg == "--variant" {
                args.next()
            } else if let Some(v) = arg.strip_prefix("--variant=") {
                Some(v.to_string())
            } else {
                if !arg.starts_with("--") && Path::new(&arg).is_file() {
                    request.document = Some(PathBuf::from(arg));
                }
                continue;
            };
            match value.as_deref().map(|v| PanelVariant::from_str(v, true)) {
                Some(Ok(variant)) => request.variant = Some(variant),
                Some(Err(_)) | None => {
                    tracing::warn!("ignoring unknown panel variant {:?}", value)
                }
            }
        }
        request
    }
}

pub fn panel_binary_path(dir: &Path) -> PathBuf {
    dir.join(PANEL_BINARY)
}

pub fn variant_args(variant: Option<PanelVariant>) -> Vec<String> {
    variant
        .and_then(|v| v.to_possible_value())
        .map(|v| vec!["--variant".to_string(), v.get_name().to_string()])
        .unwrap_or_default()
}

/// Start the panel without waiting for it. The child gets its own process
/// group and no stdio, so it outlives the host's extension run.
///
/// Returns `Ok(false)` when the panel binary is not installed.
pub fn spawn_panel(binary: &Path, variant: Option<PanelVariant>) -> anyhow::Result<bool> {
    if !binary.is_file() {
        tracing::warn!("panel binary not found at {}", binary.display());
        return Ok(false);
    }
    let mut cmd = Command::new(binary);
    cmd.args(variant_args(variant))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    let child = cmd
        .spawn()
        .with_context(|| format!("failed to start {}", binary.display()))?;
    tracing::info!(pid = child.id(), "panel started");
    Ok(true)
}

/// Copy the host document to `out` unchanged.
pub fn pass_through_document(document: &Path, out: &mut impl Write) -> anyhow::Result<u64> {
    let mut file = std::fs::File::open(document)
        .with_context(|| format!("failed to open {}", document.display()))?;
    let copied = std::io::copy(&mut file, out)?;
    out.flush()?;
    Ok(copied)
}
