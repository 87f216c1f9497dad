//! The unfilled exercise skeleton

use super::{AnalyzerError, AnalyzerProvider, LoadRequest, MovieAnalyzer};

/// Implementation handed out before any work is done. It cannot even load
/// the data, so grading it exercises the "init failed" path.
pub struct TemplateProvider;

impl AnalyzerProvider for TemplateProvider {
    fn name(&self) -> &'static str {
        "template"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["solve_template"]
    }

    fn description(&self) -> &'static str {
        "Empty skeleton; every operation is unimplemented"
    }

    fn load(&self, _request: &LoadRequest) -> Result<Box<dyn MovieAnalyzer>, AnalyzerError> {
        Err(AnalyzerError::NotImplemented("load"))
    }
}
