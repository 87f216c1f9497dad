//! Reference behavior the graded implementation is compared against

use super::GradingError;
use crate::analyzer::count_genres;
use crate::dataset::{read_raw, stats, MovieTable, RawTable};
use crate::{GenreCount, YearlyAverage};
use std::path::Path;

/// Expected values derived independently of the graded implementation: the
/// raw CSV content and the reference implementation's table.
pub struct Expectations {
    raw: Result<RawTable, String>,
    reference: Result<MovieTable, String>,
}

impl Expectations {
    /// Read `data_path` and build the reference table from it. Failures are
    /// kept and reported by the checks that need the data.
    pub fn prepare(data_path: &Path) -> Self {
        let raw = read_raw(data_path).map_err(|e| e.to_string());
        let reference = match &raw {
            Ok(raw) => MovieTable::from_raw(raw).map_err(|e| e.to_string()),
            Err(e) => Err(e.clone()),
        };
        if let Err(ref e) = reference {
            tracing::warn!(
                path = %data_path.display(),
                error = %e,
                "reference could not load data"
            );
        }
        Self { raw, reference }
    }

    pub fn raw(&self) -> Result<&RawTable, GradingError> {
        self.raw.as_ref().map_err(|e| unavailable(e))
    }

    pub fn reference(&self) -> Result<&MovieTable, GradingError> {
        self.reference.as_ref().map_err(|e| unavailable(e))
    }

    /// All genre counts, most frequent first
    pub fn genre_counts(&self) -> Result<Vec<GenreCount>, GradingError> {
        Ok(count_genres(self.reference()?.records()))
    }

    pub fn average_by_year(&self, start: i32, end: i32) -> Result<YearlyAverage, GradingError> {
        Ok(stats::mean_rating_by_year(self.reference()?.records(), start, end))
    }
}

fn unavailable(reason: &str) -> GradingError {
    GradingError::violation(format!("reference behavior unavailable: {}", reason))
}
