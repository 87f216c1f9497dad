//! Console reporter with colored output

use crate::{CheckOutcome, CheckResult, GenreCount, Grade, ScoreReport, Section, YearlyAverage};
use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the full grading narrative
    pub fn report(&self, report: &ScoreReport) {
        print!("{}", self.render(report));
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, report: &ScoreReport) {
        println!("{}", self.render_quiet(report));
    }

    /// Full grading narrative as text
    pub fn render(&self, report: &ScoreReport) -> String {
        let mut out = String::new();
        self.write_header(&mut out, report);
        for section in Section::ALL {
            self.write_section(&mut out, report, section);
        }
        self.write_banner(&mut out, report);
        out
    }

    /// `<module>: total/max (grade)`
    pub fn render_quiet(&self, report: &ScoreReport) -> String {
        format!(
            "{}: {}/{} ({})",
            report.module,
            report.total,
            report.max,
            self.colorize_grade(report.grade())
        )
    }

    /// Print the output of `marquee analyze`
    pub fn report_analysis(
        &self,
        module: &str,
        records: usize,
        genres: &[GenreCount],
        averages: &YearlyAverage,
        chart: Option<&Path>,
    ) {
        println!();
        println!("{}", self.paint_bold(&format!("Movie analysis: {}", module)));
        println!("   Records loaded: {}", records);
        println!();
        println!("   {}", self.paint_bold("Top genres:"));
        for (rank, g) in genres.iter().enumerate() {
            println!("   {:>2}. {:<20} {}", rank + 1, g.genre, g.count);
        }
        println!();
        println!("   {}", self.paint_bold("Average rating by year:"));
        if averages.is_empty() {
            println!("   {}", self.paint_dimmed("(no rated movies in range)"));
        }
        for (year, avg) in averages {
            println!("   {}  {:.2}", year, avg);
        }
        if let Some(path) = chart {
            println!();
            println!("   Trend chart: {}", path.display());
        }
        println!();
    }

    fn write_header(&self, out: &mut String, report: &ScoreReport) {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.paint_bold(&format!("Grading module: {}", report.module))
        );
        let _ = writeln!(out);
    }

    fn write_section(&self, out: &mut String, report: &ScoreReport, section: Section) {
        let results: Vec<&CheckResult> =
            report.results.iter().filter(|r| r.section == section).collect();
        if results.is_empty() {
            return;
        }

        let _ = writeln!(out, "   {}", self.paint_bold(&format!("{}:", section)));
        for r in results {
            self.write_check(out, r);
        }

        let (earned, possible) = report.section_totals(section);
        let subtotal = format!("{}/{}", earned, possible);
        let subtotal = if !self.use_colors {
            subtotal
        } else if earned == possible {
            subtotal.green().to_string()
        } else if earned == 0 {
            subtotal.red().to_string()
        } else {
            subtotal.yellow().to_string()
        };
        let _ = writeln!(out, "   {} {}", self.paint_dimmed("subtotal"), subtotal);
        let _ = writeln!(out);
    }

    fn write_check(&self, out: &mut String, r: &CheckResult) {
        let points = format!("{:>2}/{:<2}", r.earned(), r.points);
        match &r.outcome {
            CheckOutcome::Passed => {
                let _ = writeln!(out, "   {} {} {}", self.tag_pass(), points, r.id);
                if self.verbose {
                    let _ = writeln!(out, "          {}", self.paint_dimmed(&r.description));
                }
            }
            CheckOutcome::Failed { kind, message } => {
                let _ = writeln!(out, "   {} {} {}", self.tag_fail(), points, r.id);
                let _ = writeln!(out, "          {}: {}", kind, message);
            }
            CheckOutcome::Skipped { reason } => {
                let _ = writeln!(out, "   {} {} {}", self.tag_skip(), points, r.id);
                if self.verbose {
                    let _ = writeln!(out, "          {}", self.paint_dimmed(reason));
                }
            }
        }
    }

    fn write_banner(&self, out: &mut String, report: &ScoreReport) {
        let rule = "=".repeat(60);
        let grade = report.grade();
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "   Score: {}/{} {} {}",
            report.total,
            report.max,
            self.create_score_bar(report.percent()),
            self.colorize_grade(grade)
        );
        let _ = writeln!(out, "   {}", self.paint_dimmed(grade.description()));
        let _ = writeln!(
            out,
            "   Checks passed: {}/{}",
            report.passed_count(),
            report.results.len()
        );
        if let Some(ref path) = report.score_file {
            let _ = writeln!(out, "   Score written to {}", path.display());
        }
        let _ = writeln!(out, "{}", rule);
    }

    fn tag_pass(&self) -> String {
        if self.use_colors {
            "[PASS]".green().bold().to_string()
        } else {
            "[PASS]".to_string()
        }
    }

    fn tag_fail(&self) -> String {
        if self.use_colors {
            "[FAIL]".red().bold().to_string()
        } else {
            "[FAIL]".to_string()
        }
    }

    fn tag_skip(&self) -> String {
        if self.use_colors {
            "[SKIP]".yellow().to_string()
        } else {
            "[SKIP]".to_string()
        }
    }

    fn paint_bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_dimmed(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn colorize_grade(&self, grade: Grade) -> String {
        let s = grade.to_string();
        if !self.use_colors {
            return s;
        }
        match grade {
            Grade::A => s.green().bold().to_string(),
            Grade::B => s.green().to_string(),
            Grade::C => s.yellow().to_string(),
            Grade::D => s.red().to_string(),
            Grade::F => s.red().bold().to_string(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>3}%",
            "█".repeat(filled),
            "░".repeat(empty),
            score
        );

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
