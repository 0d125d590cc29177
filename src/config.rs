//! Runtime configuration
//!
//! Settings are read from a TOML file. `$HURLVIEW_CONFIG` names the file
//! explicitly; otherwise `<config dir>/hurlview/config.toml` is used. Every field
//! has a default so a missing file is not an error.

use crate::errors::ConfigError;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "HURLVIEW_CONFIG";

/// An external command with `{file}`, `{variables}` and `{input}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandTemplate {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(program: &str, args: &[&str]) -> Self {
        CommandTemplate {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Substitute placeholders in every argument
    pub fn resolve(&self, vars: &TemplateVars<'_>) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                // Whole-argument placeholders keep the value intact even if it
                // contains text that looks like another placeholder.
                "{file}" => vars.file.to_string(),
                "{variables}" => vars.variables.to_string(),
                "{input}" => vars.input.to_string(),
                _ => arg
                    .replace("{file}", vars.file)
                    .replace("{variables}", vars.variables),
            })
            .collect()
    }
}

/// Values substituted into a [`CommandTemplate`]
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub file: &'a str,
    pub variables: &'a str,
    pub input: &'a str,
}

/// The three external commands the engine drives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Commands {
    /// Runs the selected file; its output feeds the formatter
    pub request: CommandTemplate,
    /// Formats the request output for the output pane
    pub formatter: CommandTemplate,
    /// Dumps the raw selected file for the content pane
    pub viewer: CommandTemplate,
}

impl Default for Commands {
    fn default() -> Self {
        Commands {
            request: CommandTemplate::new("hurl", &["{file}", "--variables-file", "{variables}"]),
            formatter: CommandTemplate::new(
                "jq",
                &["--color-output", "--null-input", "--jsonargs", "{input}"],
            ),
            viewer: CommandTemplate::new("cat", &["{file}"]),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    root_dir: Option<PathBuf>,
    allowed_extensions: Option<Vec<String>>,
    visible_rows: Option<usize>,
    show_hidden: Option<bool>,
    error_timeout_ms: Option<u64>,
    variables_file: Option<PathBuf>,
    commands: Option<Commands>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root_dir: PathBuf,
    pub allowed_extensions: FxHashSet<String>,
    pub visible_rows: usize,
    pub show_hidden: bool,
    pub error_timeout: Duration,
    pub variables_file: PathBuf,
    pub commands: Commands,
}

impl Default for Config {
    fn default() -> Self {
        let root_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Config::with_root(root_dir)
    }
}

impl Config {
    /// Defaults rooted at `root_dir`
    pub fn with_root(root_dir: PathBuf) -> Self {
        Config {
            variables_file: root_dir.join("hurl.env"),
            root_dir,
            allowed_extensions: [".hurl".to_string()].into_iter().collect(),
            visible_rows: 10,
            show_hidden: false,
            error_timeout: Duration::from_secs(2),
            commands: Commands::default(),
        }
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = match raw.root_dir {
            Some(root) => Config::with_root(root),
            None => Config::default(),
        };
        if let Some(exts) = raw.allowed_extensions {
            config.allowed_extensions = exts.into_iter().map(normalize_extension).collect();
        }
        if let Some(rows) = raw.visible_rows {
            config.visible_rows = rows.max(1);
        }
        if let Some(show) = raw.show_hidden {
            config.show_hidden = show;
        }
        if let Some(ms) = raw.error_timeout_ms {
            config.error_timeout = Duration::from_millis(ms);
        }
        if let Some(vars) = raw.variables_file {
            config.variables_file = if vars.is_relative() {
                config.root_dir.join(vars)
            } else {
                vars
            };
        }
        if let Some(commands) = raw.commands {
            config.commands = commands;
        }
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml(&contents, path)
    }

    /// Load from `$HURLVIEW_CONFIG` or the user config dir, falling back to
    /// defaults. Problems are reported on stderr before the TUI starts.
    pub fn load() -> Self {
        let path = match env::var_os(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|dir| dir.join("hurlview").join("config.toml")),
        };

        let Some(path) = path else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }

        match Config::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}; using defaults", e);
                Config::default()
            }
        }
    }
}

/// Ensure an extension carries its leading dot
fn normalize_extension(ext: String) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hurl_workflow() {
        let config = Config::with_root(PathBuf::from("/srv/api"));
        assert!(config.allowed_extensions.contains(".hurl"));
        assert_eq!(config.visible_rows, 10);
        assert_eq!(config.error_timeout, Duration::from_secs(2));
        assert_eq!(config.variables_file, PathBuf::from("/srv/api/hurl.env"));
        assert_eq!(config.commands.request.program, "hurl");
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            root_dir = "/tmp/reqs"
            allowed_extensions = ["ok", ".json"]
            visible_rows = 5
            error_timeout_ms = 500
            variables_file = "vars.env"

            [commands.viewer]
            program = "bat"
            args = ["--plain", "{file}"]
        "#;
        let config = Config::from_toml(toml, Path::new("config.toml")).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/tmp/reqs"));
        assert!(config.allowed_extensions.contains(".ok"));
        assert!(config.allowed_extensions.contains(".json"));
        assert_eq!(config.visible_rows, 5);
        assert_eq!(config.error_timeout, Duration::from_millis(500));
        assert_eq!(config.variables_file, PathBuf::from("/tmp/reqs/vars.env"));
        assert_eq!(config.commands.viewer.program, "bat");
        // Unspecified commands keep their defaults
        assert_eq!(config.commands.formatter.program, "jq");
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = Config::from_toml("visible_rows = \"many\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_template_resolution() {
        let template = CommandTemplate::new("hurl", &["{file}", "--variables-file", "{variables}"]);
        let vars = TemplateVars {
            file: "/a/b.hurl",
            variables: "/a/hurl.env",
            input: "",
        };
        assert_eq!(
            template.resolve(&vars),
            vec!["/a/b.hurl", "--variables-file", "/a/hurl.env"]
        );

        let embedded = CommandTemplate::new("sh", &["--path={file}"]);
        assert_eq!(embedded.resolve(&vars), vec!["--path=/a/b.hurl"]);
    }
}
