//! Tracing initialisation for the CLI.
//!
//! Two sinks: a console layer on stderr filtered by the verbosity flag,
//! and a rolling file layer in the configured log directory that always
//! records at `info` and above. The file writer is non-blocking; the
//! returned guard must stay alive until exit or buffered lines are lost.

use std::path::Path;

use anyhow::{Context as _, Result};
use frostlink_config::LoggingConfig;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "frostlink.log";

/// Keeps the non-blocking file writer alive. Drop on process exit.
pub struct TelemetryGuard {
    _guard: WorkerGuard,
}

/// Map the `-v` count to a console level.
fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialise the global subscriber with both sinks.
///
/// The console filter honours `RUST_LOG` when set, otherwise it follows
/// the verbosity flag (with the configured `logging.level` as a floor at
/// zero verbosity).
pub fn init(verbosity: u8, logging: &LoggingConfig) -> Result<TelemetryGuard> {
    let default_level = if verbosity == 0 {
        logging.level.clone()
    } else {
        level_from_verbosity(verbosity).to_string()
    };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let dir = Path::new(&logging.dir);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let appender = match logging.rotation.as_str() {
        "hourly" => rolling::hourly(dir, LOG_FILE_PREFIX),
        "never" => rolling::never(dir, LOG_FILE_PREFIX),
        _ => rolling::daily(dir, LOG_FILE_PREFIX),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(TelemetryGuard { _guard: guard })
}
