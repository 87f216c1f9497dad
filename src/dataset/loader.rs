//! CSV reading for the movie table

use super::DataLoadError;
use std::fs::File;
use std::path::Path;

/// Columns every movie CSV must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["Title", "Genre", "Release_Date", "Rating"];

/// Cell values treated as missing in any column
const MISSING_TOKENS: &[&str] = &["na", "n/a", "nan", "null", "none"];

/// One CSV row with missing cells already mapped to None
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<String>,
}

/// Untyped CSV content, used both for loading and by the harness to
/// recompute expectations independently of the graded implementation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn missing_ratings(&self) -> usize {
        self.rows.iter().filter(|r| r.rating.is_none()).count()
    }
}

/// Read the four movie columns from `path`
pub fn read_raw(path: &Path) -> Result<RawTable, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let csv_err = |source: csv::Error| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut positions = [0usize; 4];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or(DataLoadError::MissingColumn { column })?;
    }
    let [title, genre, release_date, rating] = positions;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let cell = |idx: usize| record.get(idx).and_then(present);
        rows.push(RawRow {
            title: cell(title),
            genre: cell(genre),
            release_date: cell(release_date),
            rating: cell(rating),
        });
    }

    if rows.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read movie csv");
    Ok(RawTable { rows })
}

fn present(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() || MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t)) {
        None
    } else {
        Some(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_columns_in_any_order() {
        let file =
            csv_file("Rating,Title,Extra,Release_Date,Genre\n7.5,Alpha,x,2020-01-01,Drama\n");
        let raw = read_raw(file.path()).unwrap();
        assert_eq!(
            raw.rows[0],
            RawRow {
                title: Some("Alpha".to_string()),
                genre: Some("Drama".to_string()),
                release_date: Some("2020-01-01".to_string()),
                rating: Some("7.5".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_tokens_become_none() {
        let file = csv_file(
            "Title,Genre,Release_Date,Rating\nAlpha,NA,,nan\nBeta,Comedy,2021-01-01,\n",
        );
        let raw = read_raw(file.path()).unwrap();
        assert_eq!(raw.rows[0].genre, None);
        assert_eq!(raw.rows[0].release_date, None);
        assert_eq!(raw.rows[0].rating, None);
        assert_eq!(raw.missing_ratings(), 2);
    }

    #[test]
    fn test_short_rows_are_padded_with_missing() {
        let file = csv_file("Title,Genre,Release_Date,Rating\nAlpha,Drama\n");
        let raw = read_raw(file.path()).unwrap();
        assert_eq!(raw.rows[0].release_date, None);
        assert_eq!(raw.rows[0].rating, None);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = csv_file("Title,Genre,Rating\nAlpha,Drama,7.0\n");
        let err = read_raw(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn {
                column: "Release_Date"
            }
        ));
    }

    #[test]
    fn test_empty_file_is_reported() {
        let file = csv_file("");
        assert!(matches!(
            read_raw(file.path()).unwrap_err(),
            DataLoadError::Empty { .. }
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let file = csv_file("Title,Genre,Release_Date,Rating\n");
        assert!(matches!(
            read_raw(file.path()).unwrap_err(),
            DataLoadError::Empty { .. }
        ));
    }

    #[test]
    fn test_nonexistent_file_is_io_error() {
        let err = read_raw(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
        assert!(err.to_string().contains("here.csv"));
    }
}
