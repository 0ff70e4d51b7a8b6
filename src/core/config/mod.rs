//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! branchlab has two configuration scopes:
//! - **Global**: User-level settings
//! - **Workspace**: `.branchlab.toml` in the directory `bl` runs from
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Workspace config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. The path passed with `--config`, if any (must exist)
//! 2. `$BRANCHLAB_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/branchlab/config.toml`
//! 4. `~/.branchlab/config.toml` (canonical location)
//!
//! # Example
//!
//! ```no_run
//! use branchlab::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(None, Some(Path::new("."))).unwrap();
//! let config = result.config;
//!
//! println!("Orientation: {}", config.orientation());
//! println!("Recall limit: {}", config.recall_limit());
//! ```

pub mod schema;

pub use schema::{FileConfig, HistorySection, LayoutSection, Orientation, ShellSection};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "BRANCHLAB_CONFIG";

/// Workspace config file name.
pub const WORKSPACE_FILE: &str = ".branchlab.toml";

/// Lane colors used when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 4] = ["#38b2ac", "#a78bfa", "#f6ad55", "#ec4899"];

/// Neutral color used when none is configured.
pub const DEFAULT_NEUTRAL: &str = "#4a5568";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence automatically: a workspace value
/// overrides a global value, which overrides the built-in default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Workspace configuration (if present)
    pub workspace: Option<FileConfig>,
    global_path: Option<PathBuf>,
    workspace_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// `explicit` replaces the global lookup. `workspace_dir`, if given, is
    /// searched for a `.branchlab.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated, or if `explicit` names a missing file.
    /// Missing default-location files are not an error (defaults are used).
    pub fn load(
        explicit: Option<&Path>,
        workspace_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                (Self::read_config(path)?, Some(path.to_path_buf()))
            }
            None => Self::load_global(&mut warnings)?,
        };

        let (workspace, workspace_path) = match workspace_dir {
            Some(dir) => {
                let path = dir.join(WORKSPACE_FILE);
                if path.exists() {
                    (Some(Self::read_config(&path)?), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref w) = workspace {
            w.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                workspace,
                global_path,
                workspace_path,
            },
            warnings,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global(
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
            warnings.push(ConfigWarning {
                message: format!("${CONFIG_ENV} points at a missing file, ignoring it"),
                path,
            });
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("branchlab/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".branchlab/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((FileConfig::default(), None))
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.branchlab/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".branchlab/config.toml"))
    }

    /// Get the workspace config path for a directory.
    pub fn workspace_config_path(dir: &Path) -> PathBuf {
        dir.join(WORKSPACE_FILE)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn layout_value<T>(&self, pick: impl Fn(&LayoutSection) -> Option<T>) -> Option<T> {
        let from = |file: &FileConfig| file.layout.as_ref().and_then(&pick);
        self.workspace
            .as_ref()
            .and_then(from)
            .or_else(|| from(&self.global))
    }

    /// Render orientation. Defaults to vertical.
    pub fn orientation(&self) -> Orientation {
        self.layout_value(|l| l.orientation).unwrap_or_default()
    }

    /// Left padding. Defaults to 150.
    pub fn padding_x(&self) -> f64 {
        self.layout_value(|l| l.padding_x).unwrap_or(150.0)
    }

    /// Top padding. Defaults to 100.
    pub fn padding_y(&self) -> f64 {
        self.layout_value(|l| l.padding_y).unwrap_or(100.0)
    }

    /// Lane spacing. Defaults to 150.
    pub fn lane_step(&self) -> f64 {
        self.layout_value(|l| l.lane_step).unwrap_or(150.0)
    }

    /// Depth spacing in vertical orientation. Defaults to 80.
    pub fn depth_step(&self) -> f64 {
        self.layout_value(|l| l.depth_step).unwrap_or(80.0)
    }

    /// Depth spacing in horizontal orientation. Defaults to 120.
    pub fn horizontal_depth_step(&self) -> f64 {
        self.layout_value(|l| l.horizontal_depth_step)
            .unwrap_or(120.0)
    }

    /// Label row/column offset. Defaults to 40.
    pub fn label_offset(&self) -> f64 {
        self.layout_value(|l| l.label_offset).unwrap_or(40.0)
    }

    /// Lane palette.
    pub fn palette(&self) -> Vec<String> {
        self.layout_value(|l| l.palette.clone())
            .unwrap_or_else(|| DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }

    /// Neutral edge color.
    pub fn neutral_color(&self) -> String {
        self.layout_value(|l| l.neutral_color.clone())
            .unwrap_or_else(|| DEFAULT_NEUTRAL.to_string())
    }

    /// Command-recall capacity. Defaults to 100.
    pub fn recall_limit(&self) -> usize {
        let from = |file: &FileConfig| file.history.as_ref().and_then(|h| h.recall_limit);
        self.workspace
            .as_ref()
            .and_then(from)
            .or_else(|| from(&self.global))
            .unwrap_or(100)
    }

    /// Shell prompt. Defaults to `"> "`.
    pub fn prompt(&self) -> String {
        let from = |file: &FileConfig| file.shell.as_ref().and_then(|s| s.prompt.clone());
        self.workspace
            .as_ref()
            .and_then(from)
            .or_else(|| from(&self.global))
            .unwrap_or_else(|| "> ".to_string())
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded workspace config file.
    pub fn workspace_config_loaded_from(&self) -> Option<&Path> {
        self.workspace_path.as_deref()
    }
}
