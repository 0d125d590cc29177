//! External process failures
//!
//! These never stop the interaction loop. The pipeline turns them into the text
//! shown in the output pane, so the message is the cause alone; the program
//! name is kept as a field for logging.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// The program could not be started at all
    #[error("{source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran but reported failure
    #[error("{status}")]
    Exit {
        program: String,
        status: String,
        /// Combined stdout and stderr captured before exit
        output: String,
    },
}

impl RunnerError {
    pub fn program(&self) -> &str {
        match self {
            RunnerError::Spawn { program, .. } | RunnerError::Exit { program, .. } => program,
        }
    }

    /// Whatever the program printed before failing (empty if it never started)
    pub fn output(&self) -> &str {
        match self {
            RunnerError::Spawn { .. } => "",
            RunnerError::Exit { output, .. } => output,
        }
    }
}
