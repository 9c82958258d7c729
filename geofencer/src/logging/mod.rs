//! Tracing subscriber initialization.
//!
//! Console logging uses an env-filtered fmt subscriber with local-time
//! timestamps; `RUST_LOG` overrides the configured filter. File logging
//! writes daily-rolled files through a non-blocking appender; callers must
//! hold the returned guard for the lifetime of the process or buffered
//! lines are lost on exit.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Initialize console logging with the given default filter.
///
/// The filter uses `tracing_subscriber` env-filter syntax (e.g. `info`,
/// `geofencer=debug`). A set `RUST_LOG` environment variable wins. Calling
/// this more than once is a no-op.
pub fn init(filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(LocalTime::rfc_3339())
        .try_init()
        .ok();
}

/// Initialize logging to a daily-rolled file in the given directory.
///
/// Returns the appender guard; dropping it stops the background writer.
pub fn init_with_file(filter: &str, directory: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(directory, "geofencer.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok();

    guard
}
