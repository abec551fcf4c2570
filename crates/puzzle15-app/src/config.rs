//! Layered runtime configuration.
//!
//! Precedence, lowest first: built-in defaults, an optional JSON file, then
//! `PUZZLE15_*` environment overrides.

use std::path::{Path, PathBuf};

use puzzle15_core::Rgba;
use puzzle15_render::{
    DEFAULT_EMPTY_COLOR, DEFAULT_GRID_LINE_COLOR, DEFAULT_GRID_LINE_THICKNESS,
    DEFAULT_LABEL_COLOR, DEFAULT_LABEL_SCALE, RenderStyle,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var toggling tile numbers at startup.
pub const SHOW_NUMBERS_ENV: &str = "PUZZLE15_SHOW_NUMBERS";
/// Env var fixing the shuffle seed.
pub const SEED_ENV: &str = "PUZZLE15_SEED";

/// Processor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PuzzleConfig {
    /// Whether tile numbers are drawn when a processor starts.
    pub show_tile_numbers: bool,
    /// Fill color of the blank slot.
    pub empty_color: Rgba,
    /// Separator line color.
    pub grid_line_color: Rgba,
    /// Tile number color.
    pub label_color: Rgba,
    /// Separator thickness in pixels.
    pub grid_line_thickness: u32,
    /// Glyph magnification for tile numbers.
    pub label_scale: u32,
    /// Fixed shuffle seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            show_tile_numbers: true,
            empty_color: DEFAULT_EMPTY_COLOR,
            grid_line_color: DEFAULT_GRID_LINE_COLOR,
            label_color: DEFAULT_LABEL_COLOR,
            grid_line_thickness: DEFAULT_GRID_LINE_THICKNESS,
            label_scale: DEFAULT_LABEL_SCALE,
            seed: None,
        }
    }
}

impl PuzzleConfig {
    /// Loads defaults, an optional JSON file, and process env overrides.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// env override is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed JSON or unknown fields.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Applies `PUZZLE15_*` overrides resolved through `lookup`.
    ///
    /// `PUZZLE15_SHOW_NUMBERS`: `0`, `false`, `off` (case-insensitive) hide
    /// numbers, any other value shows them. `PUZZLE15_SEED` must be a `u64`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] when the seed does not parse.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(SHOW_NUMBERS_ENV) {
            let normalized = value.trim().to_ascii_lowercase();
            self.show_tile_numbers =
                !(normalized == "0" || normalized == "false" || normalized == "off");
        }

        if let Some(value) = lookup(SEED_ENV) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv {
                    key: SEED_ENV,
                    value: value.clone(),
                })?;
            self.seed = Some(seed);
        }

        Ok(self)
    }

    /// Visual parameters for the render canvas.
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            empty_color: self.empty_color,
            grid_line_color: self.grid_line_color,
            label_color: self.label_color,
            grid_line_thickness: self.grid_line_thickness,
            label_scale: self.label_scale,
        }
    }
}

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Config JSON is malformed.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Env override has an unusable value.
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    //! Unit tests for config layering.

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PuzzleConfig::from_json_str(r#"{"label_scale": 5, "seed": 11}"#)
            .expect("config should parse");
        assert_eq!(config.label_scale, 5);
        assert_eq!(config.seed, Some(11));
        assert!(config.show_tile_numbers);
        assert_eq!(config.empty_color, DEFAULT_EMPTY_COLOR);
    }

    #[test]
    fn colors_parse_as_channel_arrays() {
        let config = PuzzleConfig::from_json_str(r#"{"empty_color": [0, 0, 0, 255]}"#)
            .expect("config should parse");
        assert_eq!(config.empty_color, Rgba::new(0, 0, 0, 255));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            PuzzleConfig::from_json_str(r#"{"grid_size": 5}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let config = PuzzleConfig::default()
            .with_overrides(|key| match key {
                SHOW_NUMBERS_ENV => Some("Off".to_string()),
                SEED_ENV => Some(" 77 ".to_string()),
                _ => None,
            })
            .expect("overrides should apply");
        assert!(!config.show_tile_numbers);
        assert_eq!(config.seed, Some(77));
    }

    #[test]
    fn malformed_seed_is_reported() {
        let error = PuzzleConfig::default()
            .with_overrides(|key| (key == SEED_ENV).then(|| "abc".to_string()))
            .expect_err("seed should be rejected");
        assert!(matches!(error, ConfigError::InvalidEnv { key: SEED_ENV, .. }));
    }
}
