//! Integration tests: full grading runs against fixtures/movies.csv

use marquee::analyzer::{
    AnalyzerError, AnalyzerProvider, LoadRequest, MovieAnalyzer, ReferenceAnalyzer,
    ReferenceProvider, TemplateProvider, TREND_CHART_FILENAME,
};
use marquee::harness::{HarnessState, CHECKS};
use marquee::reporter::write_score_file;
use marquee::{
    CheckOutcome, FailureKind, GenreCount, GradingHarness, GradingSettings, MovieRecord,
    ScoreReport, Section, YearlyAverage,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/movies.csv")
}

fn grade(provider: &dyn AnalyzerProvider, root: &Path) -> ScoreReport {
    GradingHarness::new(provider, GradingSettings::new(fixture(), root)).run()
}

fn outcome<'r>(report: &'r ScoreReport, id: &str) -> &'r CheckOutcome {
    &report
        .results
        .iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| panic!("no check {}", id))
        .outcome
}

/// Wraps the reference analyzer and overrides selected operations
struct Variant {
    name: &'static str,
    build: fn(ReferenceAnalyzer) -> Box<dyn MovieAnalyzer>,
}

impl AnalyzerProvider for Variant {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "test variant"
    }

    fn load(&self, request: &LoadRequest) -> Result<Box<dyn MovieAnalyzer>, AnalyzerError> {
        Ok((self.build)(ReferenceAnalyzer::load(request)?))
    }
}

/// Implements load and top_genres only
struct Partial(ReferenceAnalyzer);

impl MovieAnalyzer for Partial {
    fn records(&self) -> &[MovieRecord] {
        self.0.records()
    }

    fn top_genres(&self, n: usize) -> Result<Vec<GenreCount>, AnalyzerError> {
        self.0.top_genres(n)
    }
}

/// Panics in top_genres
struct Panicky(ReferenceAnalyzer);

impl MovieAnalyzer for Panicky {
    fn records(&self) -> &[MovieRecord] {
        self.0.records()
    }

    fn top_genres(&self, _n: usize) -> Result<Vec<GenreCount>, AnalyzerError> {
        panic!("genre index out of bounds")
    }

    fn average_by_year(&self, start: i32, end: i32) -> Result<YearlyAverage, AnalyzerError> {
        self.0.average_by_year(start, end)
    }

    fn render_trend(&self) -> Result<(), AnalyzerError> {
        self.0.render_trend()
    }
}

/// Averages are half a point too high
struct Skewed(ReferenceAnalyzer);

impl MovieAnalyzer for Skewed {
    fn records(&self) -> &[MovieRecord] {
        self.0.records()
    }

    fn top_genres(&self, n: usize) -> Result<Vec<GenreCount>, AnalyzerError> {
        self.0.top_genres(n)
    }

    fn average_by_year(&self, start: i32, end: i32) -> Result<YearlyAverage, AnalyzerError> {
        let mut averages = self.0.average_by_year(start, end)?;
        averages.values_mut().for_each(|v| *v += 0.5);
        Ok(averages)
    }

    fn render_trend(&self) -> Result<(), AnalyzerError> {
        self.0.render_trend()
    }
}

/// Claims success without writing the chart
struct SilentRender(ReferenceAnalyzer);

impl MovieAnalyzer for SilentRender {
    fn records(&self) -> &[MovieRecord] {
        self.0.records()
    }

    fn top_genres(&self, n: usize) -> Result<Vec<GenreCount>, AnalyzerError> {
        self.0.top_genres(n)
    }

    fn average_by_year(&self, start: i32, end: i32) -> Result<YearlyAverage, AnalyzerError> {
        self.0.average_by_year(start, end)
    }

    fn render_trend(&self) -> Result<(), AnalyzerError> {
        Ok(())
    }
}

// --- Fixture scenarios ---

#[test]
fn top_three_genres_on_fixture() {
    let analyzer = ReferenceAnalyzer::load(&LoadRequest::new(fixture())).unwrap();
    let top = analyzer.top_genres(3).unwrap();

    let counts: Vec<usize> = top.iter().map(|g| g.count).collect();
    assert_eq!(counts, vec![4, 4, 3]);
    let mut first_two = vec![top[0].genre.as_str(), top[1].genre.as_str()];
    first_two.sort();
    assert_eq!(first_two, vec!["Action", "Comedy"]);
    assert!(top[2].genre == "Sci-Fi" || top[2].genre == "Thriller");
}

#[test]
fn averages_by_year_on_fixture() {
    let analyzer = ReferenceAnalyzer::load(&LoadRequest::new(fixture())).unwrap();

    let y2020 = analyzer.average_by_year(2020, 2020).unwrap();
    assert_eq!(y2020.len(), 1);
    assert!((y2020[&2020] - 8.35).abs() < 0.01, "2020 = {}", y2020[&2020]);

    let y2021 = analyzer.average_by_year(2021, 2021).unwrap();
    assert!((y2021[&2021] - 7.28).abs() < 0.01, "2021 = {}", y2021[&2021]);
}

#[test]
fn missing_ratings_are_filled_with_median() {
    let analyzer = ReferenceAnalyzer::load(&LoadRequest::new(fixture())).unwrap();
    assert_eq!(analyzer.table().median_rating(), Some(8.0));
    assert_eq!(analyzer.table().imputed_count(), 2);
    assert!(analyzer.records().iter().all(|r| r.rating.is_some()));

    let orbit = analyzer
        .records()
        .iter()
        .find(|r| r.title == "Orbit Zero")
        .unwrap();
    assert_eq!(orbit.rating, Some(8.0));
}

#[test]
fn quoted_title_and_unparsable_date_survive_load() {
    let analyzer = ReferenceAnalyzer::load(&LoadRequest::new(fixture())).unwrap();
    assert_eq!(analyzer.records().len(), 17);
    assert!(analyzer
        .records()
        .iter()
        .any(|r| r.title == "Laugh Track, Part II"));
    let untitled = analyzer
        .records()
        .iter()
        .find(|r| r.title == "Untitled Project")
        .unwrap();
    assert_eq!(untitled.release_date, None);
}

// --- Grading runs ---

#[test]
fn reference_scores_full_marks() {
    let root = TempDir::new().unwrap();
    let report = grade(&ReferenceProvider, root.path());

    let failures: Vec<_> = report.results.iter().filter(|r| !r.passed()).collect();
    assert!(failures.is_empty(), "failed checks: {:?}", failures);
    assert_eq!(report.total, 100);
    assert_eq!(report.max, 100);
    assert_eq!(report.results.len(), CHECKS.len());
}

#[test]
fn reference_run_removes_chart_by_default() {
    let root = TempDir::new().unwrap();
    grade(&ReferenceProvider, root.path());
    assert!(!root.path().join(TREND_CHART_FILENAME).exists());
}

#[test]
fn keep_artifacts_replaces_stale_chart() {
    let root = TempDir::new().unwrap();
    let chart = root.path().join(TREND_CHART_FILENAME);
    fs::write(&chart, b"").unwrap();

    let mut settings = GradingSettings::new(fixture(), root.path());
    settings.keep_artifacts = true;
    let report = GradingHarness::new(&ReferenceProvider, settings).run();

    assert_eq!(outcome(&report, "render.artifact"), &CheckOutcome::Passed);
    let bytes = fs::read(&chart).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn template_scores_zero_and_still_writes_score_file() {
    let root = TempDir::new().unwrap();
    let mut report = grade(&TemplateProvider, root.path());

    assert_eq!(report.total, 0);
    assert_eq!(report.max, 100);
    assert_eq!(report.results.len(), CHECKS.len());
    for r in report.results.iter().filter(|r| r.section != Section::Init) {
        assert!(matches!(r.outcome, CheckOutcome::Skipped { .. }), "{}", r.id);
    }

    let path = write_score_file(&mut report, root.path()).unwrap();
    assert_eq!(path, root.path().join("template_score.txt"));
    assert_eq!(fs::read_to_string(path).unwrap(), "0");
}

#[test]
fn missing_operations_zero_only_their_sections() {
    let root = TempDir::new().unwrap();
    let provider = Variant {
        name: "partial",
        build: |a| Box::new(Partial(a)),
    };
    let mut harness = GradingHarness::new(&provider, GradingSettings::new(fixture(), root.path()));
    let report = harness.run();

    assert_eq!(harness.state(), HarnessState::Completed);
    assert_eq!(report.module, "partial");
    assert_eq!(report.section_totals(Section::Init), (25, 25));
    assert_eq!(report.section_totals(Section::TopGenres), (25, 25));
    assert_eq!(report.section_totals(Section::AverageByYear), (0, 25));
    assert_eq!(report.section_totals(Section::Render), (0, 25));
    assert_eq!(report.total, 50);

    match outcome(&report, "average_by_year.shape") {
        CheckOutcome::Failed { kind, message } => {
            assert_eq!(*kind, FailureKind::ContractViolation);
            assert!(message.contains("not implemented"), "{}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn panicking_operation_is_contained() {
    let root = TempDir::new().unwrap();
    let provider = Variant {
        name: "panicky",
        build: |a| Box::new(Panicky(a)),
    };
    let report = grade(&provider, root.path());

    assert_eq!(report.section_totals(Section::TopGenres), (0, 25));
    assert_eq!(report.total, 75);
    match outcome(&report, "top_genres.shape") {
        CheckOutcome::Failed { message, .. } => assert!(message.contains("panicked")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn wrong_averages_fail_correctness_only() {
    let root = TempDir::new().unwrap();
    let provider = Variant {
        name: "skewed",
        build: |a| Box::new(Skewed(a)),
    };
    let report = grade(&provider, root.path());

    assert_eq!(outcome(&report, "average_by_year.shape"), &CheckOutcome::Passed);
    assert!(!report
        .results
        .iter()
        .find(|r| r.id == "average_by_year.correctness")
        .unwrap()
        .passed());
    assert_eq!(report.total, 85);
}

#[test]
fn render_without_artifact_is_a_missing_side_effect() {
    let root = TempDir::new().unwrap();
    let provider = Variant {
        name: "silent",
        build: |a| Box::new(SilentRender(a)),
    };
    let report = grade(&provider, root.path());

    match outcome(&report, "render.artifact") {
        CheckOutcome::Failed { kind, .. } => assert_eq!(*kind, FailureKind::SideEffectMissing),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(report.total, 75);
}

#[test]
fn missing_data_file_fails_init_and_skips_the_rest() {
    let root = TempDir::new().unwrap();
    let settings = GradingSettings::new(root.path().join("absent.csv"), root.path());
    let report = GradingHarness::new(&ReferenceProvider, settings).run();

    assert_eq!(report.total, 0);
    for r in report.results.iter().filter(|r| r.section == Section::Init) {
        match &r.outcome {
            CheckOutcome::Failed { kind, .. } => assert_eq!(*kind, FailureKind::DataLoad),
            other => panic!("{}: expected failure, got {:?}", r.id, other),
        }
    }
    assert!(report
        .results
        .iter()
        .filter(|r| r.section != Section::Init)
        .all(|r| matches!(r.outcome, CheckOutcome::Skipped { .. })));
}

#[test]
fn header_only_file_is_a_load_failure() {
    let root = TempDir::new().unwrap();
    let data = root.path().join("movies.csv");
    fs::write(&data, "Title,Genre,Release_Date,Rating\n").unwrap();

    let report =
        GradingHarness::new(&ReferenceProvider, GradingSettings::new(&data, root.path())).run();
    assert_eq!(report.total, 0);
    assert_eq!(report.passed_count(), 0);
}

#[test]
fn custom_year_range_and_top_n() {
    let root = TempDir::new().unwrap();
    let mut settings = GradingSettings::new(fixture(), root.path());
    settings.top_n = 10;
    settings.year_range = (2019, 2023);
    let report = GradingHarness::new(&ReferenceProvider, settings).run();
    assert_eq!(report.total, 100);
}

#[test]
fn infinite_rating_fails_load_and_run_completes() {
    let root = TempDir::new().unwrap();
    let data = root.path().join("movies.csv");
    fs::write(
        &data,
        "Title,Genre,Release_Date,Rating\nA,Drama,2020-01-01,9.0\nB,Drama,2021-01-01,inf\n",
    )
    .unwrap();

    let mut harness =
        GradingHarness::new(&ReferenceProvider, GradingSettings::new(&data, root.path()));
    let mut report = harness.run();

    assert_eq!(harness.state(), HarnessState::Completed);
    assert_eq!(report.total, 0);
    match outcome(&report, "init.data_loaded") {
        CheckOutcome::Failed { kind, message } => {
            assert_eq!(*kind, FailureKind::DataLoad);
            assert!(message.contains("inf"), "{}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    let path = write_score_file(&mut report, root.path()).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "0");
}

#[test]
fn huge_rating_still_grades_in_bounded_time() {
    let root = TempDir::new().unwrap();
    let data = root.path().join("movies.csv");
    fs::write(
        &data,
        "Title,Genre,Release_Date,Rating\nA,Drama,2020-01-01,9.0\nB,Comedy,2021-01-01,1e9\n",
    )
    .unwrap();

    let started = std::time::Instant::now();
    let report =
        GradingHarness::new(&ReferenceProvider, GradingSettings::new(&data, root.path())).run();

    assert!(started.elapsed() < std::time::Duration::from_secs(30));
    assert_eq!(outcome(&report, "render.artifact"), &CheckOutcome::Passed);
    assert_eq!(report.total, 100);
}
