//! JSON reporter for machine-readable output

use crate::{GenreCount, ScoreReport, Section, YearlyAverage};
use serde::Serialize;
use std::path::PathBuf;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a grading run with per-section subtotals
    pub fn report(&self, report: &ScoreReport) -> String {
        let sections = Section::ALL
            .iter()
            .map(|&section| {
                let (earned, possible) = report.section_totals(section);
                JsonSection {
                    section,
                    earned,
                    possible,
                }
            })
            .collect();
        let output = JsonOutput {
            report,
            percent: report.percent(),
            grade: report.grade().to_string(),
            sections,
        };
        self.encode(&output, "{}")
    }

    /// Report the output of `marquee analyze`
    pub fn report_analysis(&self, analysis: &AnalysisOutput) -> String {
        self.encode(analysis, "{}")
    }

    fn encode<T: Serialize>(&self, value: &T, fallback: &str) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of running one implementation directly
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub module: String,
    pub records: usize,
    pub top_genres: Vec<GenreCount>,
    pub average_by_year: YearlyAverage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a ScoreReport,
    percent: u8,
    grade: String,
    sections: Vec<JsonSection>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSection {
    section: Section,
    earned: u32,
    possible: u32,
}
