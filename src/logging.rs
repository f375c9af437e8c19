use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialise logging to stderr at `info`, or at `debug` when `debug` is set.
/// With debug enabled `RUST_LOG` may override the level.
///
/// When `log_file` is given, records are also appended to that file through
/// a background writer that lives until the process exits. Calling this more
/// than once is harmless; only the first subscriber is installed.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // Without debug logging the level is pinned so a stray `RUST_LOG` in the
    // user's environment cannot make the panel chatty.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let file_layer = log_file.and_then(|path| {
        if FILE_GUARD.get().is_some() {
            // A subscriber with a file is already installed.
            return None;
        }
        let dir = path.parent().map(PathBuf::from).unwrap_or_default();
        let name = path.file_name()?.to_string_lossy().into_owned();
        let appender = match RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(name)
            .build(&dir)
        {
            Ok(appender) => appender,
            Err(e) => {
                eprintln!("cannot open log file {}: {e}", path.display());
                return None;
            }
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        if FILE_GUARD.set(guard).is_err() {
            return None;
        }
        Some(fmt::layer().with_ansi(false).with_writer(writer))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
}
