//! Error types shared across the crate
//!
//! Only [`AppError`] can end the program. Selection errors and external process
//! failures are recovered inside the engine and shown as text, so they never
//! reach this type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while setting up the session
#[derive(Debug, Error)]
pub enum AppError {
    /// The diagnostic event log was requested but could not be opened
    #[error("cannot open event log {}: {source}", .path.display())]
    EventLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
