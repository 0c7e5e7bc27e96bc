use std::fs;
use std::path::Path;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global tracing subscriber.
///
/// Logs go to a daily-rolling file under `log_dir`, and additionally to stdout
/// when `log_to_stdout` is set. `LOG_LEVEL` in the environment wins over
/// `log_level`. Keep the returned guard alive for as long as logs should be
/// flushed. Calling this twice leaves the first subscriber in place.
pub fn init_logging(
    log_dir: &str,
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> WorkerGuard {
    if !Path::new(log_dir).exists() {
        fs::create_dir_all(log_dir).ok();
    }

    let file_appender = rolling::daily(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(log_level));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed; keeping the existing one");
    }

    guard
}
