//! Movie dataset: records, CSV loading and rating imputation

mod dates;
mod loader;
pub mod stats;

pub use dates::parse_release_date;
pub use loader::{read_raw, RawRow, RawTable, REQUIRED_COLUMNS};

use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a movie CSV could not be loaded
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} contains no data rows", path.display())]
    Empty { path: PathBuf },

    #[error("required column `{column}` is missing")]
    MissingColumn { column: &'static str },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: Rating `{value}` is not a finite number")]
    InvalidRating { row: usize, value: String },
}

/// One row of the movie table after loading
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub genre: Option<String>,
    /// Absent when the raw value was missing or not a recognizable date
    pub release_date: Option<NaiveDate>,
    pub rating: Option<f64>,
}

impl MovieRecord {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }
}

/// Loaded, imputed movie table
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    records: Vec<MovieRecord>,
    median_rating: Option<f64>,
    imputed: usize,
}

impl MovieTable {
    /// Read `path`, convert release dates and fill missing ratings with the
    /// median of the present ones.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let raw = read_raw(path)?;
        Self::from_raw(&raw)
    }

    /// Build the table from already-read CSV rows
    pub fn from_raw(raw: &RawTable) -> Result<Self, DataLoadError> {
        let mut records = Vec::with_capacity(raw.rows.len());
        for (idx, row) in raw.rows.iter().enumerate() {
            let rating = match row.rating.as_deref() {
                None => None,
                Some(value) => match value.parse::<f64>() {
                    Ok(rating) if rating.is_finite() => Some(rating),
                    _ => {
                        return Err(DataLoadError::InvalidRating {
                            row: idx + 1,
                            value: value.to_string(),
                        })
                    }
                },
            };
            records.push(MovieRecord {
                title: row.title.clone().unwrap_or_default(),
                genre: row.genre.clone(),
                release_date: row.release_date.as_deref().and_then(parse_release_date),
                rating,
            });
        }
        Ok(Self::with_imputed_ratings(records))
    }

    /// Fill absent ratings with the median of the present ones. With no
    /// rating present at all the ratings stay absent.
    pub fn with_imputed_ratings(mut records: Vec<MovieRecord>) -> Self {
        let present: Vec<f64> = records.iter().filter_map(|r| r.rating).collect();
        let median_rating = stats::median(&present);

        let mut imputed = 0;
        if let Some(median) = median_rating {
            for record in records.iter_mut().filter(|r| r.rating.is_none()) {
                record.rating = Some(median);
                imputed += 1;
            }
        }

        tracing::debug!(
            rows = records.len(),
            imputed,
            median = ?median_rating,
            "movie table loaded"
        );

        Self {
            records,
            median_rating,
            imputed,
        }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Median used to fill missing ratings, if any rating was present
    pub fn median_rating(&self) -> Option<f64> {
        self.median_rating
    }

    /// Number of ratings that were filled in
    pub fn imputed_count(&self) -> usize {
        self.imputed
    }
}
