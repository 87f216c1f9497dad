//! Lenient release date parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a raw `Release_Date` cell. Returns None for anything that is not a
/// recognizable date rather than failing the load.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    // Year-month and bare year resolve to the first day of the period
    if let Some((year, month)) = value.split_once('-') {
        if year.len() == 4 && month.len() <= 2 {
            let (Ok(y), Ok(m)) = (year.parse::<i32>(), month.parse::<u32>()) else {
                return None;
            };
            return NaiveDate::from_ymd_opt(y, m, 1);
        }
    }
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_release_date("2020-03-13"), ymd(2020, 3, 13));
        assert_eq!(parse_release_date("  2020-03-13 "), ymd(2020, 3, 13));
    }

    #[test]
    fn test_alternate_layouts() {
        assert_eq!(parse_release_date("2021/08/20"), ymd(2021, 8, 20));
        assert_eq!(parse_release_date("08/20/2021"), ymd(2021, 8, 20));
        assert_eq!(parse_release_date("2021-08-20 19:30:00"), ymd(2021, 8, 20));
        assert_eq!(parse_release_date("2021-08-20T19:30:00+02:00"), ymd(2021, 8, 20));
        assert_eq!(parse_release_date("March 5, 2019"), ymd(2019, 3, 5));
    }

    #[test]
    fn test_partial_dates() {
        assert_eq!(parse_release_date("2018-07"), ymd(2018, 7, 1));
        assert_eq!(parse_release_date("1999"), ymd(1999, 1, 1));
    }

    #[test]
    fn test_unparsable_is_none() {
        assert_eq!(parse_release_date(""), None);
        assert_eq!(parse_release_date("unknown"), None);
        assert_eq!(parse_release_date("2020-13-45"), None);
        assert_eq!(parse_release_date("2020-13"), None);
        assert_eq!(parse_release_date("12345"), None);
    }
}
