//! Logging setup
//!
//! Thin wrappers around `tracing-subscriber` so hosts and tests get the same
//! output shape. The hook/capture/listener trace spans emitted by the
//! dispatcher become visible at the `trace` level, e.g.
//! `RUST_LOG=world_capture_sdk=trace`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize stderr logging with an env-filter (`RUST_LOG`)
///
/// Falls back to `info` when `RUST_LOG` is unset. Safe to call once per
/// process; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize logging to a daily-rolling file in `dir`
///
/// Returns the appender's worker guard; dropping it stops the background
/// writer, so hold it for the process lifetime.
pub fn init_with_file(dir: impl AsRef<Path>) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(dir.as_ref(), "capture.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    guard
}
