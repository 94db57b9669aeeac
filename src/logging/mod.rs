//! Application logging functionality
//!
//! Installs the tracing subscriber and manages the optional log file

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const APP_NAME: &str = "pixel-glyph-design";

/// Get the path to the app config directory
fn config_dir() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
    config_dir.join(APP_NAME)
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

fn log_file_name() -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d");
    format!("{APP_NAME}-{timestamp}.log")
}

/// Get the path to the current log file
pub fn current_log_file() -> PathBuf {
    logs_dir().join(log_file_name())
}

/// Default filter directive for a `-v` count
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn env_filter(verbose: u8) -> EnvFilter {
    // RUST_LOG wins when it is set
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)))
}

/// Install the global subscriber
///
/// Logs always go to stderr. With `log_file` a copy is appended to
/// [`current_log_file`]; keep the returned guard alive until exit so the
/// file writer flushes.
pub fn init(verbose: u8, log_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter(verbose));

    let (file_layer, guard) = if log_file {
        let logs_dir = logs_dir();
        fs::create_dir_all(&logs_dir)?;
        let appender = tracing_appender::rolling::never(&logs_dir, log_file_name());
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(env_filter(verbose));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    if guard.is_some() {
        tracing::debug!("Logging to {:?}", current_log_file());
    }
    Ok(guard)
}
