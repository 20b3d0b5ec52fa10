//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can happen between parsing the
//! command line and printing the result report.

use std::path::PathBuf;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: noah_core::config::ConfigError,
    },

    /// World generation failed.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: noah_core::setup::SetupError,
    },

    /// The simulation aborted mid-run.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: noah_core::runner::RunnerError,
    },

    /// A map file could not be read.
    #[error("failed to read map file {}: {source}", .path.display())]
    MapRead {
        /// Path that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A map file is not valid JSON of the expected shape.
    #[error("failed to parse map file {}: {source}", .path.display())]
    MapParse {
        /// Path that was requested.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A scenario value was given both by flag and by map file.
    #[error("`--{flag}` cannot be combined with `--map-path`")]
    ConflictingArgs {
        /// Name of the flag that duplicates a map file field.
        flag: &'static str,
    },

    /// No strategy is registered under the requested key.
    #[error("player `{key}` not valid (expected one of: {known})")]
    UnknownPlayer {
        /// The requested key.
        key: String,
        /// Space-separated registered keys.
        known: String,
    },
}
