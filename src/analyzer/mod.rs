//! The analyzer contract and its built-in implementations
//!
//! A graded implementation is an [`AnalyzerProvider`]: a named factory whose
//! `load` builds a [`MovieAnalyzer`] from a movie CSV. Operations an
//! implementation does not provide fall back to the trait defaults, which
//! report [`AnalyzerError::NotImplemented`].

mod reference;
mod registry;
mod template;

pub use reference::{count_genres, ReferenceAnalyzer, ReferenceProvider};
pub use registry::Registry;
pub use template::TemplateProvider;

use crate::chart::ChartError;
use crate::dataset::{DataLoadError, MovieRecord};
use crate::{GenreCount, YearlyAverage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the rendered rating trend chart
pub const TREND_CHART_FILENAME: &str = "rating_trend.png";

/// Errors raised by analyzer operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error("operation `{0}` is not implemented")]
    NotImplemented(&'static str),

    #[error("no genre information: every Genre value is missing")]
    NoGenres,

    #[error("failed to render trend chart: {0}")]
    Render(#[from] ChartError),
}

/// What to load and where rendered artifacts go
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
}

impl LoadRequest {
    /// Load `data_path`, writing artifacts to the current directory
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Fixed location of the trend chart for this request
    pub fn trend_chart_path(&self) -> PathBuf {
        trend_chart_path(&self.output_dir)
    }
}

/// Fixed location of the trend chart under `output_dir`
pub fn trend_chart_path(output_dir: &Path) -> PathBuf {
    output_dir.join(TREND_CHART_FILENAME)
}

/// Operations available on a loaded movie table
pub trait MovieAnalyzer {
    /// The loaded table, after date conversion and rating imputation
    fn records(&self) -> &[MovieRecord];

    /// The `n` most frequent genres, most frequent first. Movies without a
    /// genre are not counted.
    fn top_genres(&self, n: usize) -> Result<Vec<GenreCount>, AnalyzerError> {
        let _ = n;
        Err(AnalyzerError::NotImplemented("top_genres"))
    }

    /// Mean rating per release year for years in `start..=end`
    fn average_by_year(&self, start: i32, end: i32) -> Result<YearlyAverage, AnalyzerError> {
        let _ = (start, end);
        Err(AnalyzerError::NotImplemented("average_by_year"))
    }

    /// Render the mean rating per year over the whole table to the trend
    /// chart file, replacing any previous chart.
    fn render_trend(&self) -> Result<(), AnalyzerError> {
        Err(AnalyzerError::NotImplemented("render_trend"))
    }
}

/// A named implementation of the analyzer contract
pub trait AnalyzerProvider {
    /// Name used to select this implementation
    fn name(&self) -> &'static str;

    /// Other names this implementation answers to
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn description(&self) -> &'static str;

    /// Read the data file and build an analyzer over it
    fn load(&self, request: &LoadRequest) -> Result<Box<dyn MovieAnalyzer>, AnalyzerError>;
}
