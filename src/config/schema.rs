//! Config schema and deserialization

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Inclusive year range for the average-by-year checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

/// Root config structure for .marqueerc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Movie CSV to grade against, relative to the grading root
    #[serde(default)]
    pub data: Option<PathBuf>,

    /// How many genres the top-genres checks ask for
    #[serde(default)]
    pub top_n: Option<usize>,

    #[serde(default)]
    pub year_range: Option<YearRange>,

    /// Absolute tolerance for average ratings
    #[serde(default)]
    pub tolerance: Option<f64>,

    /// Minimum score (0-100) below which the CLI exits with 1
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Keep rating_trend.png after the render check
    #[serde(default)]
    pub keep_artifacts: Option<bool>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_data: Option<PathBuf>,
        cli_threshold: Option<u8>,
        cli_keep_artifacts: bool,
    ) -> Self {
        if cli_data.is_some() {
            self.data = cli_data;
        }
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if cli_keep_artifacts {
            self.keep_artifacts = Some(true);
        }
        self
    }

    /// Reject values that would make the checks meaningless
    pub fn validate(&self) -> Result<()> {
        if self.top_n == Some(0) {
            anyhow::bail!("topN must be at least 1");
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                anyhow::bail!("tolerance must be a positive number, got {}", tolerance);
            }
        }
        if let Some(range) = self.year_range {
            if range.start > range.end {
                anyhow::bail!(
                    "yearRange start {} is after end {}",
                    range.start,
                    range.end
                );
            }
        }
        Ok(())
    }

    /// Merge another config into this one (for extends). Values already set
    /// here win.
    pub fn merge_from(&mut self, base: Config) {
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.data.is_none() {
            self.data = base.data;
        }
        if self.top_n.is_none() {
            self.top_n = base.top_n;
        }
        if self.year_range.is_none() {
            self.year_range = base.year_range;
        }
        if self.tolerance.is_none() {
            self.tolerance = base.tolerance;
        }
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.keep_artifacts.is_none() {
            self.keep_artifacts = base.keep_artifacts;
        }
    }
}
