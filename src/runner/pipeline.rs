//! Request → formatter pipeline and raw file viewer

use super::{ProcessRunner, RunnerError};
use crate::config::{Commands, TemplateVars};
use std::path::{Path, PathBuf};
use tracing::warn;

/// The external commands run for a selected file
#[derive(Debug, Clone)]
pub struct Pipeline {
    commands: Commands,
    variables_file: PathBuf,
}

impl Pipeline {
    pub fn new(commands: Commands, variables_file: PathBuf) -> Self {
        Pipeline {
            commands,
            variables_file,
        }
    }

    /// Run the request command and format its output.
    ///
    /// Failures come back as text: a request failure yields its error text and
    /// raw output without running the formatter; a formatter failure yields the
    /// formatter's error text alone.
    pub fn run_request(&self, runner: &dyn ProcessRunner, path: &Path) -> String {
        let file = path.to_string_lossy();
        let variables = self.variables_file.to_string_lossy();

        let request = &self.commands.request;
        let args = request.resolve(&TemplateVars {
            file: &file,
            variables: &variables,
            input: "",
        });

        let raw = match runner.run(&request.program, &args) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    program = e.program(),
                    error = %e,
                    path = %path.display(),
                    "request command failed"
                );
                return failure_text(&e);
            }
        };

        let formatter = &self.commands.formatter;
        let args = formatter.resolve(&TemplateVars {
            file: &file,
            variables: &variables,
            input: &raw,
        });

        match runner.run(&formatter.program, &args) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(program = e.program(), error = %e, "formatter command failed");
                e.to_string()
            }
        }
    }

    /// Raw contents of `path` for the content pane; empty when the viewer fails
    pub fn view_file(&self, runner: &dyn ProcessRunner, path: &Path) -> String {
        let file = path.to_string_lossy();
        let viewer = &self.commands.viewer;
        let args = viewer.resolve(&TemplateVars {
            file: &file,
            ..TemplateVars::default()
        });
        runner.run(&viewer.program, &args).unwrap_or_default()
    }
}

fn failure_text(err: &RunnerError) -> String {
    format!("{}\n{}", err, err.output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandTemplate;
    use std::cell::RefCell;
    use std::io;

    /// Records every call and answers from a fixed script keyed by program
    struct Scripted {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        answer: fn(&str) -> Result<String, RunnerError>,
    }

    impl ProcessRunner for Scripted {
        fn run(&self, program: &str, args: &[String]) -> Result<String, RunnerError> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            (self.answer)(program)
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(Commands::default(), PathBuf::from("/reqs/hurl.env"))
    }

    #[test]
    fn test_formatter_receives_raw_output() {
        let runner = Scripted {
            calls: RefCell::new(Vec::new()),
            answer: |program| match program {
                "hurl" => Ok("{\"a\":1}".to_string()),
                _ => Ok("{\n  \"a\": 1\n}".to_string()),
            },
        };
        let out = pipeline().run_request(&runner, Path::new("/reqs/get.hurl"));
        assert_eq!(out, "{\n  \"a\": 1\n}");

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0].1,
            vec!["/reqs/get.hurl", "--variables-file", "/reqs/hurl.env"]
        );
        assert_eq!(calls[1].1.last().map(String::as_str), Some("{\"a\":1}"));
    }

    #[test]
    fn test_request_failure_skips_formatter() {
        let runner = Scripted {
            calls: RefCell::new(Vec::new()),
            answer: |_| {
                Err(RunnerError::Exit {
                    program: "hurl".to_string(),
                    status: "exit status: 4".to_string(),
                    output: "error: HTTP connection".to_string(),
                })
            },
        };
        let out = pipeline().run_request(&runner, Path::new("/reqs/get.hurl"));
        assert_eq!(out, "exit status: 4\nerror: HTTP connection");
        assert_eq!(runner.calls.borrow().len(), 1);
    }

    #[test]
    fn test_request_failure_starts_with_cause() {
        let runner = Scripted {
            calls: RefCell::new(Vec::new()),
            answer: |program| {
                Err(RunnerError::Exit {
                    program: program.to_string(),
                    status: "not found".to_string(),
                    output: "raw".to_string(),
                })
            },
        };
        let out = pipeline().run_request(&runner, Path::new("/reqs/get.hurl"));
        assert!(out.starts_with("not found"));
        assert!(out.ends_with("\nraw"));
    }

    #[test]
    fn test_formatter_failure_replaces_output() {
        let runner = Scripted {
            calls: RefCell::new(Vec::new()),
            answer: |program| match program {
                "hurl" => Ok("not json".to_string()),
                _ => Err(RunnerError::Exit {
                    program: "jq".to_string(),
                    status: "exit status: 2".to_string(),
                    output: "parse error".to_string(),
                }),
            },
        };
        let out = pipeline().run_request(&runner, Path::new("/reqs/get.hurl"));
        assert_eq!(out, "exit status: 2");
    }

    #[test]
    fn test_viewer_failure_is_empty() {
        let runner = Scripted {
            calls: RefCell::new(Vec::new()),
            answer: |program| {
                Err(RunnerError::Spawn {
                    program: program.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                })
            },
        };
        let pipeline = Pipeline::new(
            Commands {
                viewer: CommandTemplate::new("bat", &["{file}"]),
                ..Commands::default()
            },
            PathBuf::from("hurl.env"),
        );
        assert_eq!(pipeline.view_file(&runner, Path::new("x.hurl")), "");
        assert_eq!(runner.calls.borrow()[0].0, "bat");
    }
}
