//! Tracing setup for the TubeLens binary.
//!
//! Events go to a daily-rolling file, optionally mirrored to stderr, with
//! `RUST_LOG` controlling the filter. The returned guard flushes the
//! non-blocking appender; keep it alive until process exit.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const LOG_FILE: &str = "tubelens.log";

/// Sink options, filled from the `logging` config section.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Explicit log directory; falls back to `TUBELENS_LOG_DIR`, then
    /// `~/.local/share/tubelens`.
    pub dir: Option<PathBuf>,
    /// Mirror events to stderr in addition to the file sink.
    pub stderr: bool,
    /// Emit JSON-encoded events to the file instead of text.
    pub json: bool,
}

/// Install the global subscriber and return the log file path plus the
/// appender guard.
pub fn init_logging(opts: LogOptions) -> anyhow::Result<(PathBuf, WorkerGuard)> {
    let dir = resolve_log_dir(opts.dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(if opts.json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    });
    if opts.stderr {
        layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    Ok((dir.join(LOG_FILE), guard))
}

fn resolve_log_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os("TUBELENS_LOG_DIR").map(PathBuf::from))
        .unwrap_or_else(|| match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".local/share/tubelens"),
            None => PathBuf::from("tubelens-logs"),
        })
}
