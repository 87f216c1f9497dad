//! The check table and the property comparisons behind each check

use super::GradingError;
use crate::dataset::{parse_release_date, stats, MovieRecord, RawTable};
use crate::{GenreCount, Section, YearlyAverage};
use std::collections::{HashMap, HashSet};

/// Tolerance for comparing imputed ratings with the median
const IMPUTATION_EPSILON: f64 = 1e-9;

/// Every check the harness knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    DataLoaded,
    ReleaseDateParsed,
    RatingImputed,
    TopGenresShape,
    TopGenresCorrect,
    AverageByYearShape,
    AverageByYearCorrect,
    RenderArtifact,
}

/// One row of the check table
#[derive(Debug, Clone, Copy)]
pub struct CheckSpec {
    pub check: Check,
    pub id: &'static str,
    pub section: Section,
    pub points: u32,
    pub description: &'static str,
}

/// All checks in execution order. Point values are fixed.
pub static CHECKS: [CheckSpec; 8] = [
    CheckSpec {
        check: Check::DataLoaded,
        id: "init.data_loaded",
        section: Section::Init,
        points: 10,
        description: "Data loaded into a non-empty table",
    },
    CheckSpec {
        check: Check::ReleaseDateParsed,
        id: "init.release_date_parsed",
        section: Section::Init,
        points: 10,
        description: "Release_Date converted to dates",
    },
    CheckSpec {
        check: Check::RatingImputed,
        id: "init.rating_imputed",
        section: Section::Init,
        points: 5,
        description: "Missing Rating values filled with the median",
    },
    CheckSpec {
        check: Check::TopGenresShape,
        id: "top_genres.shape",
        section: Section::TopGenres,
        points: 10,
        description: "top_genres returns the right number of sorted entries",
    },
    CheckSpec {
        check: Check::TopGenresCorrect,
        id: "top_genres.correctness",
        section: Section::TopGenres,
        points: 15,
        description: "top_genres returns the right genres and counts",
    },
    CheckSpec {
        check: Check::AverageByYearShape,
        id: "average_by_year.shape",
        section: Section::AverageByYear,
        points: 10,
        description: "average_by_year returns finite values keyed by year in range",
    },
    CheckSpec {
        check: Check::AverageByYearCorrect,
        id: "average_by_year.correctness",
        section: Section::AverageByYear,
        points: 15,
        description: "average_by_year matches the expected averages",
    },
    CheckSpec {
        check: Check::RenderArtifact,
        id: "render.artifact",
        section: Section::Render,
        points: 25,
        description: "render_trend writes the trend chart",
    },
];

/// Sum of all points in the table
pub fn max_score() -> u32 {
    CHECKS.iter().map(|c| c.points).sum()
}

/// Checks belonging to `section`, in table order
pub fn checks_in(section: Section) -> impl Iterator<Item = &'static CheckSpec> {
    CHECKS.iter().filter(move |c| c.section == section)
}

/// The table is non-empty and holds one record per data row
pub fn check_data_loaded(records: &[MovieRecord], raw: &RawTable) -> Result<(), GradingError> {
    if records.is_empty() {
        return Err(GradingError::violation("loaded table is empty"));
    }
    if records.len() != raw.rows.len() {
        return Err(GradingError::violation(format!(
            "loaded {} records but the file has {} data rows",
            records.len(),
            raw.rows.len()
        )));
    }
    Ok(())
}

/// Every release date is present exactly when the raw cell parses, and
/// equals the parsed value
pub fn check_release_dates(records: &[MovieRecord], raw: &RawTable) -> Result<(), GradingError> {
    if records.len() != raw.rows.len() {
        return Err(GradingError::violation("record count does not match the file"));
    }
    for (idx, (record, row)) in records.iter().zip(&raw.rows).enumerate() {
        let expected = row.release_date.as_deref().and_then(parse_release_date);
        if record.release_date != expected {
            return Err(GradingError::violation(format!(
                "row {}: Release_Date {:?} should be {:?}",
                idx + 1,
                record.release_date,
                expected
            )));
        }
    }
    Ok(())
}

/// No rating is missing and every originally missing one equals the median
/// of the originally present ratings
pub fn check_rating_imputation(
    records: &[MovieRecord],
    raw: &RawTable,
) -> Result<(), GradingError> {
    if records.len() != raw.rows.len() {
        return Err(GradingError::violation("record count does not match the file"));
    }

    let present: Vec<f64> = raw
        .rows
        .iter()
        .filter_map(|r| r.rating.as_deref().and_then(|v| v.parse::<f64>().ok()))
        .collect();
    let median = stats::median(&present);

    for (idx, (record, row)) in records.iter().zip(&raw.rows).enumerate() {
        let Some(actual) = record.rating else {
            if median.is_none() {
                // Nothing to impute from
                continue;
            }
            return Err(GradingError::violation(format!(
                "row {}: Rating is still missing",
                idx + 1
            )));
        };
        let expected = match row.rating.as_deref() {
            Some(v) => v.parse::<f64>().ok(),
            None => median,
        };
        if let Some(expected) = expected {
            if (actual - expected).abs() > IMPUTATION_EPSILON {
                return Err(GradingError::violation(format!(
                    "row {}: Rating {} should be {}",
                    idx + 1,
                    actual,
                    expected
                )));
            }
        }
    }
    Ok(())
}

/// Length is `min(n, distinct genres)`, counts never increase, names are
/// distinct and non-empty
pub fn check_top_genres_shape(
    actual: &[GenreCount],
    n: usize,
    expected_all: &[GenreCount],
) -> Result<(), GradingError> {
    let expected_len = n.min(expected_all.len());
    if actual.len() != expected_len {
        return Err(GradingError::violation(format!(
            "expected {} entries, got {}",
            expected_len,
            actual.len()
        )));
    }
    if actual.windows(2).any(|w| w[0].count < w[1].count) {
        return Err(GradingError::violation("entries are not sorted by count descending"));
    }
    let mut seen = HashSet::new();
    for entry in actual {
        if entry.genre.trim().is_empty() {
            return Err(GradingError::violation("entry with an empty genre name"));
        }
        if !seen.insert(entry.genre.as_str()) {
            return Err(GradingError::violation(format!("genre `{}` listed twice", entry.genre)));
        }
    }
    Ok(())
}

/// Same count sequence as the reference, every listed count is the genre's
/// true count, and genres above the cutoff count are all present. Which of
/// several genres tied at the cutoff appear is not checked.
pub fn check_top_genres_correct(
    actual: &[GenreCount],
    n: usize,
    expected_all: &[GenreCount],
) -> Result<(), GradingError> {
    let expected_top = &expected_all[..n.min(expected_all.len())];

    let actual_counts: Vec<usize> = actual.iter().map(|g| g.count).collect();
    let expected_counts: Vec<usize> = expected_top.iter().map(|g| g.count).collect();
    if actual_counts != expected_counts {
        return Err(GradingError::violation(format!(
            "expected counts {:?}, got {:?}",
            expected_counts, actual_counts
        )));
    }

    let true_counts: HashMap<&str, usize> = expected_all
        .iter()
        .map(|g| (g.genre.as_str(), g.count))
        .collect();
    for entry in actual {
        match true_counts.get(entry.genre.as_str()) {
            Some(&count) if count == entry.count => {}
            Some(&count) => {
                return Err(GradingError::violation(format!(
                    "`{}` has {} movies, not {}",
                    entry.genre, count, entry.count
                )))
            }
            None => {
                return Err(GradingError::violation(format!(
                    "`{}` is not a genre in the data",
                    entry.genre
                )))
            }
        }
    }

    let Some(cutoff) = expected_top.last().map(|g| g.count) else {
        return Ok(());
    };
    let listed: HashSet<&str> = actual.iter().map(|g| g.genre.as_str()).collect();
    for required in expected_top.iter().filter(|g| g.count > cutoff) {
        if !listed.contains(required.genre.as_str()) {
            return Err(GradingError::violation(format!(
                "`{}` ({} movies) is missing",
                required.genre, required.count
            )));
        }
    }
    Ok(())
}

/// Keys lie within `start..=end` and values are finite
pub fn check_average_shape(
    actual: &YearlyAverage,
    start: i32,
    end: i32,
) -> Result<(), GradingError> {
    for (&year, &value) in actual {
        if year < start || year > end {
            return Err(GradingError::violation(format!(
                "year {} is outside {}..={}",
                year, start, end
            )));
        }
        if !value.is_finite() {
            return Err(GradingError::violation(format!("average for {} is {}", year, value)));
        }
    }
    Ok(())
}

/// Same years as expected, each average within `tolerance`
pub fn check_average_correct(
    actual: &YearlyAverage,
    expected: &YearlyAverage,
    tolerance: f64,
) -> Result<(), GradingError> {
    for year in expected.keys() {
        if !actual.contains_key(year) {
            return Err(GradingError::violation(format!("average for {} is missing", year)));
        }
    }
    for (year, value) in actual {
        let Some(want) = expected.get(year) else {
            return Err(GradingError::violation(format!("unexpected year {}", year)));
        };
        if (value - want).abs() >= tolerance {
            return Err(GradingError::violation(format!(
                "average for {} is {:.4}, expected ~{:.4}",
                year, value, want
            )));
        }
    }
    Ok(())
}
