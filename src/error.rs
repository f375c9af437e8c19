use std::path::PathBuf;
use thiserror::Error;

/// Failures of the external X11 helpers (`wmctrl`, `xdotool`, `xrandr`).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} is not installed. Please install it: sudo apt install {package}")]
    Missing { tool: String, package: String },
    #[error("{tool} failed: {reason}")]
    Invocation { tool: String, reason: String },
}

impl ToolError {
    pub fn missing(tool: &str) -> Self {
        ToolError::Missing {
            tool: tool.to_string(),
            package: install_package(tool).to_string(),
        }
    }

    pub fn invocation(tool: &str, reason: impl Into<String>) -> Self {
        ToolError::Invocation {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ToolError::Missing { .. })
    }
}

/// Debian/Ubuntu package providing `tool`.
pub fn install_package(tool: &str) -> &str {
    match tool {
        "xrandr" => "x11-xserver-utils",
        other => other,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Errors from the in-process key injection fallback.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("no key code for '{0}'")]
    UnknownKey(String),
    #[error("empty key sequence")]
    Empty,
    #[error("could not simulate {0}")]
    Simulate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_message_carries_install_hint() {
        let err = ToolError::missing("xdotool");
        assert!(err.is_missing());
        assert_eq!(
            err.to_string(),
            "xdotool is not installed. Please install it: sudo apt install xdotool"
        );
    }

    #[test]
    fn xrandr_hint_names_its_package() {
        let err = ToolError::missing("xrandr");
        assert!(err.to_string().ends_with("sudo apt install x11-xserver-utils"));
    }
}
