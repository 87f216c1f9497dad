//! Marquee: movie ratings analyzer and grader CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use marquee::analyzer::LoadRequest;
use marquee::config::{default_config_json, load_config, CONFIG_FILENAME};
use marquee::harness::{resolve_module, DEFAULT_TOP_N};
use marquee::logging::init_logging;
use marquee::reporter::{write_score_file, AnalysisOutput, ConsoleReporter, JsonReporter};
use marquee::{GradingHarness, GradingSettings, Registry};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Marquee: grade movie analyzer implementations against the reference
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Implementation to grade (prompted for when omitted)
    module: Option<String>,

    /// Movie CSV to grade against (default: movies.csv under the root)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory that receives the chart and the score file (default: current)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Path to config file (default: search .marqueerc.json in root and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Keep rating_trend.png after grading
    #[arg(long)]
    keep_artifacts: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registered implementations
    List,

    /// Run an implementation directly and print its results
    Analyze {
        /// Implementation to run
        #[arg(long, default_value = "reference")]
        module: String,

        /// Movie CSV to analyze
        #[arg(long)]
        data: PathBuf,

        /// Number of genres to list
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// First year of the average (default: earliest)
        #[arg(long)]
        from: Option<i32>,

        /// Last year of the average (default: latest)
        #[arg(long)]
        to: Option<i32>,

        /// Also render the yearly trend chart
        #[arg(long)]
        render: bool,

        /// Directory for the chart (default: current)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Create .marqueerc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    let registry = Registry::builtin();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::List => run_list(&registry),
            Commands::Analyze {
                module,
                data,
                top,
                from,
                to,
                render,
                out,
                json,
                verbose,
            } => {
                init_logging(verbose);
                run_analyze(
                    &registry,
                    &module,
                    &data,
                    top,
                    (from, to),
                    render.then_some(out),
                    json,
                )
            }
            Commands::Init { threshold, dir } => run_init(threshold, dir.as_deref()),
        };
    }

    init_logging(args.verbose);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let root = match args.root {
        Some(ref r) if r.is_absolute() => r.clone(),
        Some(ref r) => cwd.join(r),
        None => cwd.clone(),
    };
    if !root.is_dir() {
        anyhow::bail!("Root directory not found: {}", root.display());
    }

    let module = match args.module {
        Some(ref m) => m.clone(),
        None => prompt_module(&registry)?,
    };
    let provider = resolve_module(&registry, &module)?;

    // CLI data paths are relative to the working directory, config ones to the root
    let cli_data = args.data.as_ref().map(|d| {
        if d.is_absolute() {
            d.clone()
        } else {
            cwd.join(d)
        }
    });
    let config = load_config(&root, args.config.as_deref())?.merge_with_cli(
        cli_data,
        args.threshold,
        args.keep_artifacts,
    );
    let settings = GradingSettings::from_config(&config, &root);
    tracing::debug!(?settings, "grading settings");

    let mut report = GradingHarness::new(provider, settings).run();
    write_score_file(&mut report, &root).with_context(|| {
        format!("Failed to write score file for {} in {}", report.module, root.display())
    })?;

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else {
        let mut console = ConsoleReporter::new();
        if args.verbose {
            console = console.verbose();
        }
        if args.quiet {
            console.report_quiet(&report);
        } else {
            console.report(&report);
        }
    }

    if let Some(threshold) = config.threshold {
        if report.percent() < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "{}: score {} is below threshold {}",
                    "Failed".red().bold(),
                    report.percent(),
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Ask for the module name on stdin
fn prompt_module(registry: &Registry) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Module to grade ({}): ", registry.names().join(", "))?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read module name from stdin")?;
    let name = line.trim();
    if name.is_empty() {
        anyhow::bail!("No module name given");
    }
    Ok(name.to_string())
}

fn run_list(registry: &Registry) -> Result<ExitCode> {
    for provider in registry.providers() {
        let aliases = provider.aliases();
        if aliases.is_empty() {
            println!("{:<12} {}", provider.name().bold(), provider.description());
        } else {
            println!(
                "{:<12} {} {}",
                provider.name().bold(),
                provider.description(),
                format!("(alias: {})", aliases.join(", ")).dimmed()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_analyze(
    registry: &Registry,
    module: &str,
    data: &Path,
    top: usize,
    (from, to): (Option<i32>, Option<i32>),
    render: Option<Option<PathBuf>>,
    json: bool,
) -> Result<ExitCode> {
    let provider = resolve_module(registry, module)?;
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let out_dir = render.clone().flatten().unwrap_or_else(|| cwd.clone());

    let request = LoadRequest::new(data).with_output_dir(&out_dir);
    let analyzer = provider
        .load(&request)
        .with_context(|| format!("{} could not load {}", provider.name(), data.display()))?;

    let top_genres = analyzer
        .top_genres(top)
        .with_context(|| format!("{}: top_genres failed", provider.name()))?;
    let average_by_year = analyzer
        .average_by_year(from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX))
        .with_context(|| format!("{}: average_by_year failed", provider.name()))?;

    let chart = if render.is_some() {
        analyzer
            .render_trend()
            .with_context(|| format!("{}: render_trend failed", provider.name()))?;
        Some(request.trend_chart_path())
    } else {
        None
    };

    let output = AnalysisOutput {
        module: provider.name().to_string(),
        records: analyzer.records().len(),
        top_genres,
        average_by_year,
        chart,
    };

    if json {
        println!("{}", JsonReporter::new().pretty().report_analysis(&output));
    } else {
        ConsoleReporter::new().report_analysis(
            &output.module,
            output.records,
            &output.top_genres,
            &output.average_by_year,
            output.chart.as_deref(),
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = default_config_json(threshold.unwrap_or(70));
    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Created {}", "Done".green().bold(), config_path.display());
    println!("   Put your movie CSV next to it as movies.csv, or set \"data\" to its path.");
    Ok(ExitCode::SUCCESS)
}
