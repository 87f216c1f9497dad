//! Small numeric helpers over ratings

use super::MovieRecord;
use crate::YearlyAverage;
use std::collections::BTreeMap;

/// Median of `values`, or None when empty. Even-length input averages the
/// two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean rating per release year for records whose year falls in
/// `start..=end`. Records without a year or a rating are ignored, and years
/// left with no ratings are absent from the result.
pub fn mean_rating_by_year(records: &[MovieRecord], start: i32, end: i32) -> YearlyAverage {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in records {
        let (Some(year), Some(rating)) = (record.release_year(), record.rating) else {
            continue;
        };
        if year < start || year > end {
            continue;
        }
        groups.entry(year).or_default().push(rating);
    }

    groups
        .into_iter()
        .filter_map(|(year, ratings)| mean(&ratings).map(|m| (year, m)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn movie(year: Option<i32>, rating: Option<f64>) -> MovieRecord {
        MovieRecord {
            title: String::new(),
            genre: None,
            release_date: year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
            rating,
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_rating_by_year_inclusive_bounds() {
        let records = vec![
            movie(Some(2019), Some(5.0)),
            movie(Some(2020), Some(8.0)),
            movie(Some(2020), Some(6.0)),
            movie(Some(2021), Some(9.0)),
            movie(Some(2022), Some(1.0)),
            movie(None, Some(10.0)),
        ];
        let avg = mean_rating_by_year(&records, 2020, 2021);
        assert_eq!(avg.len(), 2);
        assert_eq!(avg[&2020], 7.0);
        assert_eq!(avg[&2021], 9.0);
    }

    #[test]
    fn test_year_without_ratings_is_absent() {
        let records = vec![movie(Some(2020), None), movie(Some(2021), Some(4.0))];
        let avg = mean_rating_by_year(&records, 2020, 2021);
        assert!(!avg.contains_key(&2020));
        assert_eq!(avg[&2021], 4.0);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let records = vec![movie(Some(2020), Some(8.0))];
        assert!(mean_rating_by_year(&records, 2021, 2020).is_empty());
    }
}
