//! External process execution
//!
//! - [`ProcessRunner`]: the seam the engine calls through; [`SystemRunner`] is
//!   the real implementation, tests substitute their own
//! - [`Pipeline`]: the request → formatter chain for the output pane and the
//!   viewer command for the content pane
//!
//! All invocations are blocking. The caller is suspended until the child exits.

mod errors;
pub mod pipeline;

pub use errors::RunnerError;
pub use pipeline::Pipeline;

use std::process::Command;
use tracing::debug;

/// Runs an external program and captures its combined output
pub trait ProcessRunner {
    /// Run `program` with `args`, returning stdout followed by stderr on success
    fn run(&self, program: &str, args: &[String]) -> Result<String, RunnerError>;
}

/// Runs programs with [`std::process::Command`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String, RunnerError> {
        debug!(program, ?args, "spawning external command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| RunnerError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            debug!(program, status = %output.status, "external command failed");
            Err(RunnerError::Exit {
                program: program.to_string(),
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}
