// docredact/src/logger.rs
//! Logger initialization for the docredact binary and its tests.
//!
//! `RUST_LOG` is honored unless an explicit level is given. Initialization is
//! idempotent so tests can call it freely.

use log::LevelFilter;

/// Initializes `env_logger`, writing to stderr so stdout stays clean for
/// redacted documents.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init()
        .ok();
}

/// Picks the level from the `--quiet` and `--debug` flags; `None` defers to `RUST_LOG`.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    match (quiet, debug) {
        (true, _) => Some(LevelFilter::Off),
        (false, true) => Some(LevelFilter::Debug),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_debug() {
        assert_eq!(level_from_flags(true, true), Some(LevelFilter::Off));
        assert_eq!(level_from_flags(false, true), Some(LevelFilter::Debug));
        assert_eq!(level_from_flags(false, false), None);
    }
}
