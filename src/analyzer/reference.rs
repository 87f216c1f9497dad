//! Reference implementation of the analyzer contract

use super::{AnalyzerError, AnalyzerProvider, LoadRequest, MovieAnalyzer};
use crate::chart;
use crate::dataset::{stats, MovieRecord, MovieTable};
use crate::{GenreCount, YearlyAverage};
use std::collections::HashMap;
use std::path::PathBuf;

/// Count genres in first-seen order, then order by count descending. The
/// sort is stable, so equal counts keep first-seen order.
pub fn count_genres(records: &[MovieRecord]) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for genre in records.iter().filter_map(|r| r.genre.as_deref()) {
        match index.get(genre) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(genre, counts.len());
                counts.push(GenreCount::new(genre, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Analyzer backed by a fully loaded [`MovieTable`]
pub struct ReferenceAnalyzer {
    table: MovieTable,
    chart_path: PathBuf,
}

impl ReferenceAnalyzer {
    pub fn new(table: MovieTable, chart_path: PathBuf) -> Self {
        Self { table, chart_path }
    }

    pub fn load(request: &LoadRequest) -> Result<Self, AnalyzerError> {
        let table = MovieTable::load(&request.data_path)?;
        Ok(Self::new(table, request.trend_chart_path()))
    }

    pub fn table(&self) -> &MovieTable {
        &self.table
    }
}

impl MovieAnalyzer for ReferenceAnalyzer {
    fn records(&self) -> &[MovieRecord] {
        self.table.records()
    }

    fn top_genres(&self, n: usize) -> Result<Vec<GenreCount>, AnalyzerError> {
        let mut counts = count_genres(self.table.records());
        if counts.is_empty() {
            return Err(AnalyzerError::NoGenres);
        }
        counts.truncate(n);
        Ok(counts)
    }

    fn average_by_year(&self, start: i32, end: i32) -> Result<YearlyAverage, AnalyzerError> {
        Ok(stats::mean_rating_by_year(self.table.records(), start, end))
    }

    fn render_trend(&self) -> Result<(), AnalyzerError> {
        let series = stats::mean_rating_by_year(self.table.records(), i32::MIN, i32::MAX);
        chart::render_trend(&series, &self.chart_path)?;
        Ok(())
    }
}

/// Provider for [`ReferenceAnalyzer`]
pub struct ReferenceProvider;

impl AnalyzerProvider for ReferenceProvider {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["example_solve"]
    }

    fn description(&self) -> &'static str {
        "Complete implementation; defines the expected behavior"
    }

    fn load(&self, request: &LoadRequest) -> Result<Box<dyn MovieAnalyzer>, AnalyzerError> {
        Ok(Box::new(ReferenceAnalyzer::load(request)?))
    }
}
