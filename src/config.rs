//! Configuration for tabkeeper.
//!
//! Two knobs: the history capacity and whether bulk closing may close
//! pinned tabs. Loaded from a YAML file with strict field checking and typo
//! suggestions; a missing file just means defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strsim::jaro_winkler;

/// Default history capacity.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

const KNOWN_FIELDS: &[&str] = &["history_limit", "close_pinned_tabs"];
const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Raw config file structure (used for parsing). Unknown fields are
/// rejected with an error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    history_limit: Option<usize>,
    #[serde(default)]
    close_pinned_tabs: Option<bool>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of closed tabs kept in history. Always positive.
    pub history_limit: usize,
    /// Whether bulk close commands may close pinned tabs.
    pub close_pinned_tabs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            close_pinned_tabs: false,
        }
    }
}

/// Error loading or parsing a config file.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading the config file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error.
    Parse {
        path: PathBuf,
        message: String,
        suggestion: Option<String>,
    },

    /// Validation error (semantic errors after parsing).
    Validation { path: PathBuf, message: String },
}

impl ConfigError {
    /// Format error in Cargo-style format.
    pub fn format_cargo_style(&self) -> String {
        match self {
            ConfigError::Io { path, source } => {
                format!(
                    "error: cannot read config file\n  --> {}\n  |\n  = {}\n",
                    path.display(),
                    source
                )
            }
            ConfigError::Parse {
                path,
                message,
                suggestion,
            } => {
                let mut output = format!("error: {}\n  --> {}\n  |\n", message, path.display());
                if let Some(suggestion) = suggestion {
                    output.push_str(&format!("  = help: did you mean `{}`?\n", suggestion));
                }
                output
            }
            ConfigError::Validation { path, message } => {
                format!("error: {}\n  --> {}\n  |\n", message, path.display())
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_cargo_style())
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(path, &content)
}

/// Load the effective config: `tabkeeper.yaml` in the workspace root wins,
/// then the global `~/.config/tabkeeper/config.yaml`, then defaults.
pub fn discover(workspace_root: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(root) = workspace_root {
        let project = root.join("tabkeeper.yaml");
        if project.exists() {
            return load(&project);
        }
    }

    if let Some(dir) = crate::store::tabkeeper_dir() {
        let global = dir.join("config.yaml");
        if global.exists() {
            return load(&global);
        }
    }

    Ok(Config::default())
}

fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = serde_saphyr::from_str(content).map_err(|e| {
        let message = e.to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            suggestion: suggest_field(&message),
            message,
        }
    })?;

    let config = Config {
        history_limit: raw.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        close_pinned_tabs: raw.close_pinned_tabs.unwrap_or(false),
    };

    if config.history_limit == 0 {
        return Err(ConfigError::Validation {
            path: path.to_path_buf(),
            message: "history_limit must be a positive integer".to_string(),
        });
    }

    Ok(config)
}

/// For an "unknown field `x`" parse error, suggest the closest known field.
fn suggest_field(message: &str) -> Option<String> {
    let unknown = message
        .strip_prefix("unknown field `")
        .or_else(|| message.split("unknown field `").nth(1))?
        .split('`')
        .next()?;

    KNOWN_FIELDS
        .iter()
        .filter(|&&known| jaro_winkler(unknown, known) >= SIMILARITY_THRESHOLD)
        .max_by(|a, b| {
            jaro_winkler(unknown, a)
                .partial_cmp(&jaro_winkler(unknown, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|&s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(content: &str) -> Result<Config, ConfigError> {
        parse(Path::new("tabkeeper.yaml"), content)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.history_limit, 1000);
        assert!(!config.close_pinned_tabs);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_str("history_limit: 50\nclose_pinned_tabs: true\n").unwrap();
        assert_eq!(config.history_limit, 50);
        assert!(config.close_pinned_tabs);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config = parse_str("history_limit: 50\n").unwrap();
        assert_eq!(config.history_limit, 50);
        assert!(!config.close_pinned_tabs);
    }

    #[test]
    fn test_zero_history_limit_is_rejected() {
        let err = parse_str("history_limit: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_unknown_field_suggests_correction() {
        let err = parse_str("history_limt: 50\n").unwrap_err();
        let display = err.to_string();
        assert!(display.contains("history_limt"));
        assert!(display.contains("history_limit"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabkeeper.yaml");
        fs::write(&path, "history_limit: 7\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.history_limit, 7);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_discover_prefers_workspace_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tabkeeper.yaml"), "history_limit: 3\n").unwrap();

        let config = discover(Some(dir.path())).unwrap();
        assert_eq!(config.history_limit, 3);
    }
}
