//! Grading harness: runs the check table against one implementation and
//! folds the results into a [`ScoreReport`](crate::ScoreReport).

pub mod checks;
mod expectations;
mod runner;
mod scoring;

pub use checks::{max_score, Check, CheckSpec, CHECKS};
pub use expectations::Expectations;
pub use runner::{GradingHarness, HarnessState};
pub use scoring::ScoreSheet;

use crate::analyzer::{AnalyzerError, AnalyzerProvider, Registry};
use crate::config::Config;
use crate::FailureKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_FILE: &str = "movies.csv";
pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2020, 2021);
/// Absolute tolerance when comparing average ratings
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Grading failures. Only `ModuleNotFound` aborts a run; the others are
/// recorded against a single check.
#[derive(Debug, Error)]
pub enum GradingError {
    #[error("module `{name}` not found (available: {})", available.join(", "))]
    ModuleNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("data could not be loaded: {0}")]
    DataLoad(String),

    #[error("{0}")]
    ContractViolation(String),

    #[error("expected artifact {} was not produced", path.display())]
    SideEffectMissing { path: PathBuf },
}

impl GradingError {
    /// Map an error returned by operation `op` into the grading taxonomy
    pub fn from_analyzer(op: &str, err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::DataLoad(e) => GradingError::DataLoad(e.to_string()),
            other => GradingError::ContractViolation(format!("`{}` failed: {}", op, other)),
        }
    }

    pub fn violation(message: impl Into<String>) -> Self {
        GradingError::ContractViolation(message.into())
    }

    /// Per-check failure category; None for run-level failures
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            GradingError::ModuleNotFound { .. } => None,
            GradingError::DataLoad(_) => Some(FailureKind::DataLoad),
            GradingError::ContractViolation(_) => Some(FailureKind::ContractViolation),
            GradingError::SideEffectMissing { .. } => Some(FailureKind::SideEffectMissing),
        }
    }
}

/// Look up the implementation to grade
pub fn resolve_module<'r>(
    registry: &'r Registry,
    name: &str,
) -> Result<&'r dyn AnalyzerProvider, GradingError> {
    registry.get(name).ok_or_else(|| GradingError::ModuleNotFound {
        name: name.trim().to_string(),
        available: registry.names().into_iter().map(str::to_string).collect(),
    })
}

/// Inputs and parameters of one grading run
#[derive(Debug, Clone)]
pub struct GradingSettings {
    /// Movie CSV handed to the implementation
    pub data_path: PathBuf,
    /// Directory receiving the chart artifact and the score file
    pub root: PathBuf,
    pub top_n: usize,
    /// Inclusive year range for the average-by-year checks
    pub year_range: (i32, i32),
    pub tolerance: f64,
    /// Leave the rendered chart in place after the render check
    pub keep_artifacts: bool,
}

impl GradingSettings {
    pub fn new(data_path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            root: root.into(),
            top_n: DEFAULT_TOP_N,
            year_range: DEFAULT_YEAR_RANGE,
            tolerance: DEFAULT_TOLERANCE,
            keep_artifacts: false,
        }
    }

    /// Settings from a loaded config. Relative data paths resolve against
    /// `root`.
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let data = config
            .data
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let data_path = if data.is_absolute() {
            data
        } else {
            root.join(data)
        };

        let mut settings = Self::new(data_path, root);
        if let Some(n) = config.top_n {
            settings.top_n = n;
        }
        if let Some(range) = config.year_range {
            settings.year_range = (range.start, range.end);
        }
        if let Some(tolerance) = config.tolerance {
            settings.tolerance = tolerance;
        }
        settings.keep_artifacts = config.keep_artifacts.unwrap_or(false);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataLoadError;

    #[test]
    fn test_resolve_unknown_module_lists_available() {
        let registry = Registry::builtin();
        let err = resolve_module(&registry, "mock_solve").err().unwrap();
        assert!(err.kind().is_none());
        let msg = err.to_string();
        assert!(msg.contains("mock_solve"));
        assert!(msg.contains("reference, template"));
    }

    #[test]
    fn test_from_analyzer_maps_data_load() {
        let err = GradingError::from_analyzer(
            "load",
            AnalyzerError::DataLoad(DataLoadError::MissingColumn { column: "Genre" }),
        );
        assert_eq!(err.kind(), Some(FailureKind::DataLoad));

        let err =
            GradingError::from_analyzer("top_genres", AnalyzerError::NotImplemented("top_genres"));
        assert_eq!(err.kind(), Some(FailureKind::ContractViolation));
        assert!(err.to_string().contains("not implemented"));
    }

    #[test]
    fn test_settings_from_config() {
        let config: Config = serde_json::from_str(
            r#"{ "data": "data/films.csv", "topN": 5, "yearRange": { "start": 2019, "end": 2022 }, "keepArtifacts": true }"#,
        )
        .unwrap();
        let settings = GradingSettings::from_config(&config, Path::new("/work"));
        assert_eq!(settings.data_path, PathBuf::from("/work/data/films.csv"));
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.year_range, (2019, 2022));
        assert_eq!(settings.tolerance, DEFAULT_TOLERANCE);
        assert!(settings.keep_artifacts);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = GradingSettings::from_config(&Config::default(), Path::new("/work"));
        assert_eq!(settings.data_path, PathBuf::from("/work/movies.csv"));
        assert_eq!(settings.top_n, 3);
        assert_eq!(settings.year_range, (2020, 2021));
        assert!(!settings.keep_artifacts);
    }
}
