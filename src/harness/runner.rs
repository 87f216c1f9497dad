//! Drives one implementation through the check table

use super::checks::{self, checks_in, Check, CheckSpec};
use super::{Expectations, GradingError, GradingSettings, ScoreSheet};
use crate::analyzer::{
    trend_chart_path, AnalyzerError, AnalyzerProvider, LoadRequest, MovieAnalyzer,
};
use crate::{ScoreReport, Section};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Progress of a grading run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    NotStarted,
    Running(Section),
    Completed,
}

/// Grades one injected implementation
pub struct GradingHarness<'a> {
    provider: &'a dyn AnalyzerProvider,
    settings: GradingSettings,
    state: HarnessState,
}

impl<'a> GradingHarness<'a> {
    pub fn new(provider: &'a dyn AnalyzerProvider, settings: GradingSettings) -> Self {
        Self {
            provider,
            settings,
            state: HarnessState::NotStarted,
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn settings(&self) -> &GradingSettings {
        &self.settings
    }

    /// Run every section and fold the results. Always completes: failures
    /// are recorded per check, and a failed load zeroes every section.
    pub fn run(&mut self) -> ScoreReport {
        let expectations = Expectations::prepare(&self.settings.data_path);
        let mut sheet = ScoreSheet::new(self.provider.name());

        self.enter(Section::Init);
        let request =
            LoadRequest::new(&self.settings.data_path).with_output_dir(&self.settings.root);
        let provider = self.provider;
        let analyzer = match guarded("load", || provider.load(&request)) {
            Ok(analyzer) => {
                for spec in checks_in(Section::Init) {
                    let outcome = self.evaluate(spec, analyzer.as_ref(), &expectations);
                    log_outcome(spec, &outcome);
                    sheet.record(spec, outcome);
                }
                Some(analyzer)
            }
            Err(err) => {
                tracing::warn!(
                    module = provider.name(),
                    error = %err,
                    "load failed; dependent sections skipped"
                );
                for spec in checks_in(Section::Init) {
                    let failure = match &err {
                        GradingError::DataLoad(message) => GradingError::DataLoad(message.clone()),
                        other => GradingError::violation(other.to_string()),
                    };
                    sheet.record(spec, Err(failure));
                }
                None
            }
        };

        for section in [Section::TopGenres, Section::AverageByYear, Section::Render] {
            self.enter(section);
            for spec in checks_in(section) {
                match &analyzer {
                    Some(analyzer) => {
                        let outcome = self.evaluate(spec, analyzer.as_ref(), &expectations);
                        log_outcome(spec, &outcome);
                        sheet.record(spec, outcome);
                    }
                    None => {
                        sheet.skip(spec, "load failed");
                    }
                }
            }
        }

        self.state = HarnessState::Completed;
        let report = sheet.finish();
        tracing::info!(
            module = %report.module,
            total = report.total,
            max = report.max,
            "grading completed"
        );
        report
    }

    fn enter(&mut self, section: Section) {
        tracing::debug!(from = ?self.state, to = ?section, "entering section");
        self.state = HarnessState::Running(section);
    }

    fn evaluate(
        &self,
        spec: &CheckSpec,
        analyzer: &dyn MovieAnalyzer,
        expectations: &Expectations,
    ) -> Result<(), GradingError> {
        let (start, end) = self.settings.year_range;
        let n = self.settings.top_n;

        match spec.check {
            Check::DataLoaded => {
                let raw = expectations.raw()?;
                let records = guarded("load", || Ok(analyzer.records().to_vec()))?;
                checks::check_data_loaded(&records, raw)
            }
            Check::ReleaseDateParsed => {
                let raw = expectations.raw()?;
                let records = guarded("load", || Ok(analyzer.records().to_vec()))?;
                checks::check_release_dates(&records, raw)
            }
            Check::RatingImputed => {
                let raw = expectations.raw()?;
                let records = guarded("load", || Ok(analyzer.records().to_vec()))?;
                checks::check_rating_imputation(&records, raw)
            }
            Check::TopGenresShape => {
                let expected = expectations.genre_counts()?;
                let actual = guarded("top_genres", || analyzer.top_genres(n))?;
                checks::check_top_genres_shape(&actual, n, &expected)
            }
            Check::TopGenresCorrect => {
                let expected = expectations.genre_counts()?;
                let actual = guarded("top_genres", || analyzer.top_genres(n))?;
                checks::check_top_genres_correct(&actual, n, &expected)
            }
            Check::AverageByYearShape => {
                let actual = guarded("average_by_year", || analyzer.average_by_year(start, end))?;
                checks::check_average_shape(&actual, start, end)
            }
            Check::AverageByYearCorrect => {
                let expected = expectations.average_by_year(start, end)?;
                let actual = guarded("average_by_year", || analyzer.average_by_year(start, end))?;
                checks::check_average_correct(&actual, &expected, self.settings.tolerance)
            }
            Check::RenderArtifact => self.check_render(analyzer),
        }
    }

    /// Remove any stale chart, render, and require a non-empty file
    fn check_render(&self, analyzer: &dyn MovieAnalyzer) -> Result<(), GradingError> {
        let path = trend_chart_path(&self.settings.root);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                GradingError::violation(format!("could not remove stale {}: {}", path.display(), e))
            })?;
        }

        let rendered = guarded("render_trend", || analyzer.render_trend());
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if !self.settings.keep_artifacts && path.exists() {
            discard_artifact(&path);
        }

        rendered?;
        if size == 0 {
            return Err(GradingError::SideEffectMissing { path });
        }
        Ok(())
    }
}

/// Run one contract operation, turning both returned errors and panics into
/// a failed check
fn guarded<T>(op: &str, f: impl FnOnce() -> Result<T, AnalyzerError>) -> Result<T, GradingError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(GradingError::from_analyzer(op, err)),
        Err(payload) => Err(GradingError::violation(format!(
            "`{}` panicked: {}",
            op,
            panic_message(payload.as_ref())
        ))),
    }
}

/// Remove a rendered artifact after its check. A failure is logged and does
/// not affect the score.
fn discard_artifact(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed rendered chart");
            true
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "could not remove rendered chart"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_outcome(spec: &CheckSpec, outcome: &Result<(), GradingError>) {
    match outcome {
        Ok(()) => tracing::debug!(check = spec.id, points = spec.points, "check passed"),
        Err(err) => tracing::debug!(check = spec.id, error = %err, "check failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_catches_panics() {
        let result: Result<(), GradingError> =
            guarded("top_genres", || panic!("index out of bounds"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("panicked: index out of bounds"));
    }

    #[test]
    fn test_guarded_maps_errors() {
        let result: Result<(), GradingError> =
            guarded("render_trend", || Err(AnalyzerError::NotImplemented("render_trend")));
        assert!(matches!(result, Err(GradingError::ContractViolation(_))));
    }

    #[test]
    fn test_panic_message_from_string_payload() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(payload.as_ref()), "boom");
    }

    #[test]
    fn test_discard_artifact_removes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rating_trend.png");
        std::fs::write(&path, b"png").unwrap();

        assert!(discard_artifact(&path));
        assert!(!path.exists());
    }

    #[test]
    fn test_discard_artifact_failure_is_reported_not_raised() {
        let dir = tempfile::TempDir::new().unwrap();
        // A directory in place of the chart cannot be removed as a file
        let path = dir.path().join("rating_trend.png");
        std::fs::create_dir(&path).unwrap();

        assert!(!discard_artifact(&path));
        assert!(path.exists());
    }
}
