//! TOML configuration file support.
//!
//! Viewer defaults and output format can be kept in a config file instead of
//! being passed as flags every time:
//!
//! ```toml
//! # mxa.toml
//! [viewer]
//! brightness = 1.2
//! contrast = 1.5
//! zoom = 0.5
//!
//! [output]
//! format = "json"
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;

use mxa_analyzer::image::ViewSettings;

/// How extracted records are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Key/value panels
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Root configuration structure for mxa.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Image viewer defaults.
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Image viewer defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerConfig {
    /// Brightness factor (0.1-2.0).
    pub brightness: Option<f64>,

    /// Contrast factor (0.1-2.0).
    pub contrast: Option<f64>,

    /// Zoom level (0.1-5.0).
    pub zoom: Option<f64>,
}

/// Output settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Output format for records.
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Output format, with a command-line override taking precedence.
    pub fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.output.format).unwrap_or_default()
    }

    /// Viewer settings, with command-line overrides taking precedence.
    pub fn view_settings(
        &self,
        brightness: Option<f64>,
        contrast: Option<f64>,
        zoom: Option<f64>,
    ) -> ViewSettings {
        ViewSettings::new(
            brightness.or(self.viewer.brightness).unwrap_or(1.0),
            contrast.or(self.viewer.contrast).unwrap_or(1.0),
            zoom.or(self.viewer.zoom).unwrap_or(1.0),
        )
    }
}
