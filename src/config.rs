use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{ReportError, Result};

/// Run configuration. Every field has a default so an absent or partial
/// `config.toml` is valid.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub charts_dir: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub delimiter: char,
    pub top_n: usize,
    pub render_charts: bool,
    pub log_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            charts_dir: PathBuf::from(constants::DEFAULT_CHARTS_DIR),
            summary_path: None,
            delimiter: ',',
            top_n: constants::DEFAULT_TOP_N,
            render_charts: true,
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

/// Values given on the command line. Anything set here wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub top_n: Option<usize>,
    pub no_charts: bool,
}

impl ReportConfig {
    /// Layer command line values over the loaded config, then re-validate.
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(input) = overrides.input_path {
            self.input_path = input;
        }
        if let Some(output) = overrides.output_path {
            self.output_path = output;
        }
        if let Some(charts_dir) = overrides.charts_dir {
            self.charts_dir = charts_dir;
        }
        if let Some(summary) = overrides.summary_path {
            self.summary_path = Some(summary);
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(top_n) = overrides.top_n {
            self.top_n = top_n;
        }
        if overrides.no_charts {
            self.render_charts = false;
        }
        self.validate()?;
        Ok(self)
    }

    /// Load from an explicit path; the file must exist.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ReportError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: ReportConfig = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `config_path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// The delimiter as the single byte the csv reader and writer expect.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "delimiter '{}' must be a single ASCII character",
                    self.delimiter
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        if self.top_n == 0 {
            return Err(ReportError::Config("top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}
