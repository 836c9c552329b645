use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Must be kept alive for buffered log lines to be flushed.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Logs go next to the data they describe.
pub fn get_log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Install a daily-rolling file subscriber. The terminal stays clean for the
/// TUI; `RUST_LOG` overrides `default_level`.
///
/// Returns `None` when the log directory cannot be created, in which case
/// the application runs without logging.
pub fn init_logging(data_dir: &Path, default_level: &str) -> Option<LoggingGuard> {
    let log_dir = get_log_dir(data_dir);

    if !log_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create log directory {}: {}", log_dir.display(), e);
            return None;
        }
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "ivyfocus.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");

    Some(LoggingGuard { _guard: guard })
}
