//! File logging. The terminal belongs to the TUI, so nothing is written to
//! stdout or stderr.

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

pub const LOG_FILE: &str = "phototerm.log";

/// Raises the default filter from `warn` to `debug` when set to anything
/// non-empty. `RUST_LOG` still wins.
pub const DEBUG_ENV_VAR: &str = "PHOTOTERM_DEBUG";

/// Install the global subscriber writing to `<log dir>/phototerm.log`.
/// Returns the log file path.
pub fn init(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let dir = config.log_dir();
    std::fs::create_dir_all(&dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&dir)?;

    let default_level = default_level(std::env::var_os(DEBUG_ENV_VAR).as_deref());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .try_init();

    tracing::info!("phototerm v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(dir.join(LOG_FILE))
}

fn default_level(debug: Option<&OsStr>) -> &'static str {
    match debug {
        Some(value) if !value.is_empty() => "debug",
        _ => "warn",
    }
}
