//! Logging initialization: verbosity-to-level mapping and the optional file mirror.
//!
//! One function, called once from `run()`, building a `tracing_subscriber` pipeline from the
//! CLI's own flags, with an optional `-l PATH` file mirror layered alongside stderr.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Map `-v`/`-vv` occurrence count to a `tracing` level: `0` → WARN, `1` → INFO, `2+` → DEBUG.
#[must_use]
pub const fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global `tracing` subscriber: always logs to stderr, and additionally to
/// `log_file` when one is given, without suppressing the stderr writer.
pub fn initialize_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = level_for_verbosity(verbose);
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(LevelFilter::from_level(level)).with(stderr_layer);

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let file_layer = fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file));
            registry.with(file_layer).try_init()?;
        },
        None => registry.try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_expected_levels() {
        assert_eq!(level_for_verbosity(0), Level::WARN);
        assert_eq!(level_for_verbosity(1), Level::INFO);
        assert_eq!(level_for_verbosity(2), Level::DEBUG);
        assert_eq!(level_for_verbosity(9), Level::DEBUG);
    }
}
