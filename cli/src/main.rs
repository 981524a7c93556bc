use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use log_census_core::{
    Classification, ClassifierMode, LogKind, MatchedRule, explain, flag_keywords,
};
use log_census_summary::config::CensusConfig;
use log_census_summary::output::{OutputFormat, format_plot_report, format_scan_report};
use log_census_summary::scan::START_SENTINEL;
use log_census_summary::{batch, plot, scan};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "log-census")]
#[command(version, about = "Classify sandboxed sample logs and chart their outcomes")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify one log kind of every sample and write the summary CSV.
    Scan(ScanArgs),
    /// Derive bucket counts from a summary CSV and render a chart.
    Plot(PlotArgs),
    /// Classify a single log from a file or stdin.
    Classify(ClassifyArgs),
    /// Run every scan/plot pass from a YAML config.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Directory containing one subdirectory per sample.
    #[arg(long)]
    root: PathBuf,
    /// Which log to read from each sample (build or run).
    #[arg(long)]
    log_kind: LogKind,
    /// Assign one error category per log instead of keyword flags.
    #[arg(long)]
    parser: bool,
    /// Summary CSV path (default: <root>/summary_<kind>.csv).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format for the scan report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct PlotArgs {
    /// Summary CSV produced by `scan`.
    #[arg(long)]
    summary: PathBuf,
    /// The summary was produced with --parser.
    #[arg(long)]
    parser: bool,
    /// SVG chart path (default: summary path with .svg extension).
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Skip writing the SVG chart.
    #[arg(long, conflicts_with = "svg")]
    no_chart: bool,
    /// Output format for the bucket report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Log file to classify (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Assign one error category instead of keyword flags.
    #[arg(long)]
    parser: bool,
    /// Apply the availability rules of this log kind first.
    #[arg(long)]
    log_kind: Option<LogKind>,
    /// Output format (json, or text for anything else).
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// YAML batch configuration.
    #[arg(long)]
    config: PathBuf,
    /// Output format for the reports.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Scan(args) => run_scan(args),
        Command::Plot(args) => run_plot(args),
        Command::Classify(args) => run_classify(args),
        Command::Batch(args) => run_batch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_scan(args: ScanArgs) -> Result<(), String> {
    let mode = ClassifierMode::from_use_parser(args.parser);
    debug!(root = %args.root.display(), log_kind = %args.log_kind, ?mode, "scan");
    let report =
        scan::summarize_folder_to_file(&args.root, args.log_kind, mode, args.output.as_deref())
            .map_err(|err| format!("scan of '{}' failed: {err}", args.root.display()))?;
    print!(
        "{}",
        format_scan_report(&report, args.format).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<(), String> {
    let mode = ClassifierMode::from_use_parser(args.parser);
    let chart = if args.no_chart {
        None
    } else {
        Some(
            args.svg
                .clone()
                .unwrap_or_else(|| plot::default_chart_path(&args.summary)),
        )
    };
    let report = plot::plot_summary(&args.summary, mode, chart.as_deref())
        .map_err(|err| format!("plot of '{}' failed: {err}", args.summary.display()))?;
    print!(
        "{}",
        format_plot_report(&report, args.format).map_err(|e| e.to_string())?
    );
    Ok(())
}

/// Verdict for one log as printed by `classify`.
#[derive(serde::Serialize)]
struct ClassifyOutput {
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<Vec<&'static str>>,
}

fn run_classify(args: ClassifyArgs) -> Result<(), String> {
    let text = match &args.input {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    let available = match args.log_kind {
        None => true,
        Some(LogKind::Build) => !text.is_empty(),
        Some(LogKind::Run) => !text.is_empty() && text.contains(START_SENTINEL),
    };

    let mut output = ClassifyOutput {
        available,
        classification: None,
        keywords: None,
    };
    if available {
        if args.parser {
            output.classification = Some(explain(&text));
        } else {
            output.keywords = Some(flag_keywords(&text).found());
        }
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        _ => println!("{}", describe(&output)),
    }
    Ok(())
}

fn describe(output: &ClassifyOutput) -> String {
    if !output.available {
        return "unavailable".to_string();
    }
    if let Some(ref classification) = output.classification {
        let rule = match classification.rule {
            MatchedRule::Marker { index, marker } => format!("rule {index}: \"{marker}\""),
            MatchedRule::EmptyLog { index } => format!("rule {index}: empty log"),
            MatchedRule::Fallthrough => "no rule matched".to_string(),
        };
        return format!("{} ({rule})", classification.category);
    }
    match output.keywords.as_deref() {
        Some([]) | None => "no keywords".to_string(),
        Some(found) => found.join(", "),
    }
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    let config = CensusConfig::load(&args.config)
        .map_err(|err| format!("Failed to load '{}': {err}", args.config.display()))?;
    let report = batch::run_batch(&config).map_err(|err| format!("batch failed: {err}"))?;

    for scan in &report.scans {
        print!(
            "{}",
            format_scan_report(scan, args.format).map_err(|e| e.to_string())?
        );
    }
    for plot in &report.plots {
        print!(
            "{}",
            format_plot_report(plot, args.format).map_err(|e| e.to_string())?
        );
    }
    Ok(())
}
