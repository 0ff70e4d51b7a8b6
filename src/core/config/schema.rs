//! core::config::schema
//!
//! Configuration schema types.
//!
//! Both scopes (global and workspace) share one file format, [`FileConfig`].
//! Every key is optional so a workspace file can override a single value
//! without restating the rest.
//!
//! # Validation
//!
//! Config values are validated after parsing: steps must be positive,
//! paddings non-negative, colors `#rrggbb`, and the recall buffer must hold
//! at least one entry.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Axis along which commit depth grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Lanes are columns, depth grows downward.
    #[default]
    Vertical,
    /// Lanes are rows, depth grows rightward.
    Horizontal,
}

impl Orientation {
    /// Get the orientation as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid orientation '{other}', must be 'vertical' or 'horizontal'"
            ))),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configuration file (global or workspace scope).
///
/// # Example
///
/// ```toml
/// [layout]
/// orientation = "horizontal"
/// palette = ["#38b2ac", "#a78bfa"]
///
/// [history]
/// recall_limit = 50
///
/// [shell]
/// prompt = "bl> "
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Render geometry
    pub layout: Option<LayoutSection>,

    /// Command recall
    pub history: Option<HistorySection>,

    /// Interactive shell
    pub shell: Option<ShellSection>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(layout) = &self.layout {
            layout.validate()?;
        }
        if let Some(history) = &self.history {
            history.validate()?;
        }
        Ok(())
    }
}

/// `[layout]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub orientation: Option<Orientation>,
    pub padding_x: Option<f64>,
    pub padding_y: Option<f64>,
    /// Distance between adjacent lanes
    pub lane_step: Option<f64>,
    /// Distance between adjacent depths (vertical)
    pub depth_step: Option<f64>,
    /// Distance between adjacent depths (horizontal)
    pub horizontal_depth_step: Option<f64>,
    /// Offset of the label row/column from the content edge
    pub label_offset: Option<f64>,
    /// Lane colors, cycled
    pub palette: Option<Vec<String>>,
    /// Color of trunk edges and off-lane label connectors
    pub neutral_color: Option<String>,
}

impl LayoutSection {
    fn validate(&self) -> Result<(), ConfigError> {
        let steps = [
            ("lane_step", self.lane_step),
            ("depth_step", self.depth_step),
            ("horizontal_depth_step", self.horizontal_depth_step),
        ];
        for (key, value) in steps {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "layout.{key} must be a positive number, got {v}"
                    )));
                }
            }
        }

        let offsets = [
            ("padding_x", self.padding_x),
            ("padding_y", self.padding_y),
            ("label_offset", self.label_offset),
        ];
        for (key, value) in offsets {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "layout.{key} must be a non-negative number, got {v}"
                    )));
                }
            }
        }

        if let Some(palette) = &self.palette {
            if palette.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "layout.palette cannot be empty".to_string(),
                ));
            }
            for color in palette {
                validate_color("layout.palette", color)?;
            }
        }

        if let Some(color) = &self.neutral_color {
            validate_color("layout.neutral_color", color)?;
        }

        Ok(())
    }
}

/// `[history]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySection {
    /// Capacity of the command-recall buffer
    pub recall_limit: Option<usize>,
}

impl HistorySection {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.recall_limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "history.recall_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[shell]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellSection {
    pub prompt: Option<String>,
}

fn validate_color(key: &str, color: &str) -> Result<(), ConfigError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "{key}: '{color}' is not a #rrggbb color"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_valid() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_every_section() {
        let config: FileConfig = toml::from_str(
            r##"
            [layout]
            orientation = "horizontal"
            lane_step = 90.0
            palette = ["#000000", "#ffffff"]

            [history]
            recall_limit = 5

            [shell]
            prompt = "$ "
            "##,
        )
        .unwrap();

        let layout = config.layout.as_ref().unwrap();
        assert_eq!(layout.orientation, Some(Orientation::Horizontal));
        assert_eq!(layout.lane_step, Some(90.0));
        assert_eq!(config.history.as_ref().unwrap().recall_limit, Some(5));
        assert_eq!(config.shell.as_ref().unwrap().prompt.as_deref(), Some("$ "));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[layout]\nzoom = 2.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn non_positive_step_rejected() {
        let config = FileConfig {
            layout: Some(LayoutSection {
                depth_step: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_padding_rejected() {
        let config = FileConfig {
            layout: Some(LayoutSection {
                padding_x: Some(-1.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_colors_rejected() {
        for palette in [vec![], vec!["teal".to_string()], vec!["#12345g".to_string()]] {
            let config = FileConfig {
                layout: Some(LayoutSection {
                    palette: Some(palette),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn zero_recall_limit_rejected() {
        let config = FileConfig {
            history: Some(HistorySection {
                recall_limit: Some(0),
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn orientation_parses_from_str() {
        assert_eq!("vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert_eq!(
            "horizontal".parse::<Orientation>().unwrap(),
            Orientation::Horizontal
        );
        assert!("diagonal".parse::<Orientation>().is_err());
    }
}
