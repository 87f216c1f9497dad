//! Accumulating check results into a score

use super::checks::CheckSpec;
use super::GradingError;
use crate::{CheckOutcome, CheckResult, FailureKind, ScoreReport, Section};

/// Results of one grading run, in the order the checks ran
#[derive(Debug)]
pub struct ScoreSheet {
    module: String,
    results: Vec<CheckResult>,
}

impl ScoreSheet {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            results: Vec::new(),
        }
    }

    /// Record the outcome of running `spec`
    pub fn record(&mut self, spec: &CheckSpec, outcome: Result<(), GradingError>) -> &CheckResult {
        let outcome = match outcome {
            Ok(()) => CheckOutcome::Passed,
            Err(err) => CheckOutcome::Failed {
                kind: err.kind().unwrap_or(FailureKind::ContractViolation),
                message: err.to_string(),
            },
        };
        self.push(spec, outcome)
    }

    /// Record `spec` as not run
    pub fn skip(&mut self, spec: &CheckSpec, reason: &str) -> &CheckResult {
        self.push(
            spec,
            CheckOutcome::Skipped {
                reason: reason.to_string(),
            },
        )
    }

    fn push(&mut self, spec: &CheckSpec, outcome: CheckOutcome) -> &CheckResult {
        self.results.push(CheckResult {
            id: spec.id.to_string(),
            section: spec.section,
            description: spec.description.to_string(),
            points: spec.points,
            outcome,
        });
        let last = self.results.len() - 1;
        &self.results[last]
    }

    /// Points earned so far
    pub fn earned(&self) -> u32 {
        self.results.iter().map(|r| r.earned()).sum()
    }

    pub fn results_in(&self, section: Section) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.section == section)
    }

    /// Fold the sheet into the final report. Skipped and failed checks count
    /// toward the maximum but earn nothing.
    pub fn finish(self) -> ScoreReport {
        let total = self.earned();
        let max = self.results.iter().map(|r| r.points).sum();
        ScoreReport {
            module: self.module,
            total,
            max,
            results: self.results,
            score_file: None,
        }
    }
}
