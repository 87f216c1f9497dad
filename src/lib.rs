//! Marquee: movie ratings analyzer and grading harness
//!
//! This library loads a CSV of movie metadata, computes genre and per-year
//! rating aggregates, renders a yearly rating trend chart, and grades any
//! implementation of that analyzer contract against the reference one.

pub mod analyzer;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod harness;
pub mod logging;
pub mod reporter;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use analyzer::{AnalyzerError, AnalyzerProvider, LoadRequest, MovieAnalyzer, Registry};
pub use dataset::{DataLoadError, MovieRecord, MovieTable};
pub use harness::{GradingError, GradingHarness, GradingSettings};

/// Mean rating per release year, ordered by year
pub type YearlyAverage = BTreeMap<i32, f64>;

/// A genre and the number of movies tagged with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

impl GenreCount {
    pub fn new(genre: impl Into<String>, count: usize) -> Self {
        Self {
            genre: genre.into(),
            count,
        }
    }
}

/// Group of checks that exercise one analyzer operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Init,
    TopGenres,
    AverageByYear,
    Render,
}

impl Section {
    /// All sections in execution order
    pub const ALL: [Section; 4] = [
        Section::Init,
        Section::TopGenres,
        Section::AverageByYear,
        Section::Render,
    ];

    /// Operation name shown in reports
    pub fn operation(self) -> &'static str {
        match self {
            Section::Init => "load",
            Section::TopGenres => "top_genres",
            Section::AverageByYear => "average_by_year",
            Section::Render => "render_trend",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.operation())
    }
}

/// Category of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// The data file could not be loaded
    DataLoad,
    /// Output had the wrong shape or values, or the operation errored
    ContractViolation,
    /// An expected artifact was not produced
    SideEffectMissing,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::DataLoad => write!(f, "data load error"),
            FailureKind::ContractViolation => write!(f, "contract violation"),
            FailureKind::SideEffectMissing => write!(f, "side effect missing"),
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CheckOutcome {
    Passed,
    Failed { kind: FailureKind, message: String },
    /// Not run because an earlier section failed; earns nothing
    Skipped { reason: String },
}

/// Result of a single check, folded into the run's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub section: Section,
    pub description: String,
    pub points: u32,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Passed)
    }

    /// Points earned by this check
    pub fn earned(&self) -> u32 {
        if self.passed() {
            self.points
        } else {
            0
        }
    }
}

/// Final score of one grading run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    /// Name of the graded implementation
    pub module: String,
    /// Points earned
    pub total: u32,
    /// Points possible, including skipped checks
    pub max: u32,
    /// Every check in table order
    pub results: Vec<CheckResult>,
    /// Where the score file was written, once persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_file: Option<PathBuf>,
}

impl ScoreReport {
    /// Score as a 0-100 percentage of the maximum
    pub fn percent(&self) -> u8 {
        if self.max == 0 {
            return 0;
        }
        ((self.total * 100) / self.max).min(100) as u8
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.percent())
    }

    /// Earned and possible points for one section
    pub fn section_totals(&self, section: Section) -> (u32, u32) {
        self.results
            .iter()
            .filter(|r| r.section == section)
            .fold((0, 0), |(earned, possible), r| {
                (earned + r.earned(), possible + r.points)
            })
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Grade::A => "Excellent - every operation behaves like the reference",
            Grade::B => "Good - a single check is off",
            Grade::C => "Fair - most operations work but some results are wrong",
            Grade::D => "Poor - several operations fail",
            Grade::F => "Failing - the implementation needs major work",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}
