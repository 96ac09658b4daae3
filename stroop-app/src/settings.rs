//! `stroop.toml`: experiment parameters, analysis thresholds, display and
//! report output. Every key has a default, so a missing file is not an error.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stroop_experiment::{AnalysisThresholds, ExperimentConfig};
use stroop_report::ReportFormat;

pub const DEFAULT_CONFIG_FILE: &str = "stroop.toml";
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Which documents an export writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatChoice {
    #[default]
    Html,
    Json,
    All,
}

impl FormatChoice {
    pub fn formats(&self) -> Vec<ReportFormat> {
        match self {
            FormatChoice::Html => vec![ReportFormat::Html],
            FormatChoice::Json => vec![ReportFormat::Json],
            FormatChoice::All => ReportFormat::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub font_path: PathBuf,
    pub fullscreen: bool,
    /// Window size when not fullscreen.
    pub width: u32,
    pub height: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            fullscreen: false,
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub format: FormatChoice,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            format: FormatChoice::Html,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub experiment: ExperimentConfig,
    pub analysis: AnalysisThresholds,
    pub display: DisplaySettings,
    pub report: ReportSettings,
}

impl Settings {
    /// Reads `path`, or `stroop.toml` in the working directory if it exists,
    /// or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                tracing::debug!("no config file, using defaults");
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.experiment
            .validate()
            .context("invalid [experiment] section")?;
        self.analysis.validate().context("invalid [analysis] section")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}
