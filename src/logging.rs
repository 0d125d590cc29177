//! Opt-in diagnostic event log
//!
//! When `DEBUG` is set, a `tracing` subscriber writes every engine event (and
//! anything else logged at debug level or above) to `messages.log` in the
//! working directory. The file is truncated on each run. Without the toggle no
//! subscriber is installed, since the TUI owns the terminal.

use crate::errors::AppError;
use std::env;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Environment variable that enables the event log
pub const DEBUG_ENV: &str = "DEBUG";

/// Fixed location of the event log
pub const EVENT_LOG: &str = "messages.log";

/// Install the file subscriber if `DEBUG` is set.
///
/// Returns whether logging was enabled.
pub fn init_from_env() -> Result<bool, AppError> {
    if env::var_os(DEBUG_ENV).is_none() {
        return Ok(false);
    }
    init_event_log(Path::new(EVENT_LOG))?;
    Ok(true)
}

/// Truncate `path` and route tracing output into it
pub fn init_event_log(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| AppError::EventLog {
            path: path.to_path_buf(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    // The earlier subscriber stays in charge and receives this warning
    if let Err(e) = installed {
        warn!(path = %path.display(), error = %e, "event log subscriber already installed");
    }
    Ok(())
}
