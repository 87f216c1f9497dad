//! Yearly rating trend chart

use crate::YearlyAverage;
use plotters::prelude::*;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (1000, 600);
const POINT_RADIUS: i32 = 4;
const MAX_LABELS: usize = 12;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to clear previous chart {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("chart {} was not written", path.display())]
    NotWritten { path: std::path::PathBuf },
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Font used for the caption and axis labels, bundled so rendering does not
/// depend on system fonts
static CHART_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

fn ensure_font() -> Result<(), ChartError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        plotters::style::register_font("sans-serif", FontStyle::Normal, CHART_FONT).is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err(ChartError::Draw("bundled chart font could not be loaded".to_string()))
    }
}

/// Render `series` as a line chart ordered by year and save it as a PNG at
/// `path`. Any existing file at `path` is removed first.
pub fn render_trend(series: &YearlyAverage, path: &Path) -> Result<(), ChartError> {
    if let Some((year, value)) = series.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ChartError::Draw(format!("average for {} is {}", year, value)));
    }
    ensure_font()?;

    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed stale chart"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ChartError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let points: Vec<(i32, f64)> = series.iter().map(|(&y, &r)| (y, r)).collect();
    let (x_range, y_range) = axis_ranges(&points);

    {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Yearly Average Movie Rating Trend", ("sans-serif", 28))
            .margin(30)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        // Label counts bound the number of grid lines whatever the value range
        chart
            .configure_mesh()
            .x_labels(MAX_LABELS)
            .y_labels(MAX_LABELS)
            .max_light_lines(1)
            .x_desc("Year")
            .y_desc("Average Rating")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
            .map_err(draw_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), POINT_RADIUS, BLUE.filled())),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    let written = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        return Err(ChartError::NotWritten {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        years = points.len(),
        bytes = written,
        "rendered trend chart"
    );
    Ok(())
}

/// Padded axis ranges that always have non-zero width
fn axis_ranges(points: &[(i32, f64)]) -> (std::ops::Range<i32>, std::ops::Range<f64>) {
    if points.is_empty() {
        return (0..1, 0.0..10.0);
    }
    let min_year = points.iter().map(|p| p.0).min().unwrap_or(0);
    let max_year = points.iter().map(|p| p.0).max().unwrap_or(0);
    let min_rating = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_rating = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    (
        (min_year - 1)..(max_year + 1),
        (min_rating - 0.5).floor()..(max_rating + 0.5).ceil(),
    )
}
