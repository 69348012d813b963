//! Log output configuration.
//!
//! Verbosity is an explicit value. [`dispatch`] builds a subscriber for it
//! that callers scope around their work with
//! `tracing::dispatcher::with_default`, so no process-wide subscriber is ever
//! installed.

use serde::Serialize;
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    #[default]
    Normal,
    /// Adds debug detail such as every file moved.
    Verbose,
}

impl Verbosity {
    /// Resolve the mutually exclusive `--quiet` / `--verbose` flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    pub fn level(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::ERROR,
            Verbosity::Normal => LevelFilter::INFO,
            Verbosity::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// Build a stderr subscriber filtered to `verbosity`.
pub fn dispatch(verbosity: Verbosity) -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(verbosity.level())
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    Dispatch::new(subscriber)
}
