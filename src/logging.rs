//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never mix with data. `RUST_LOG`, when
//! set, takes precedence over the verbosity chosen on the command line.
//!
//! - `warn`: default, quiet unless something is off
//! - `info`: one line per written file
//! - `debug`: parse and transform summaries
//! - `trace`: one line per entry

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// Maps a `-v` count to a level: 0 → warn, 1 → info, 2 → debug, 3+ → trace.
#[must_use]
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber writing to stderr.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging(level: Level) {
    init_logging_with_writer(level, io::stderr);
}

/// Installs the global subscriber with a custom writer (useful for testing).
pub fn init_logging_with_writer<W>(level: Level, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_writer(writer)
        .with_target(false)
        .without_time()
        .try_init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn
        EnvFilter::new(format!(
            "warn,bib_shorten={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}
