//! Persisted score file

use crate::ScoreReport;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `<root>/<module>_score.txt`
pub fn score_file_path(root: &Path, module: &str) -> PathBuf {
    root.join(format!("{}_score.txt", module))
}

/// Write the integer total to the module's score file and remember where it went.
/// An existing file is overwritten.
pub fn write_score_file(report: &mut ScoreReport, root: &Path) -> io::Result<PathBuf> {
    let path = score_file_path(root, &report.module);
    fs::write(&path, report.total.to_string())?;
    tracing::info!(path = %path.display(), total = report.total, "wrote score file");
    report.score_file = Some(path.clone());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report(total: u32) -> ScoreReport {
        ScoreReport {
            module: "template".to_string(),
            total,
            max: 100,
            results: vec![],
            score_file: None,
        }
    }

    #[test]
    fn test_writes_only_the_total() {
        let dir = TempDir::new().unwrap();
        let mut r = report(0);
        let path = write_score_file(&mut r, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("template_score.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
        assert_eq!(r.score_file, Some(path));
    }

    #[test]
    fn test_overwrites_previous_score() {
        let dir = TempDir::new().unwrap();
        write_score_file(&mut report(40), dir.path()).unwrap();
        let path = write_score_file(&mut report(75), dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "75");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_score_file(&mut report(1), &missing).is_err());
    }
}
