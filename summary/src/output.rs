//! Output formatting for scan and plot reports.

use crate::chart::render_terminal;
use crate::error::Result;
use crate::report::{PlotReport, ScanReport};

/// Width of terminal bars in table output.
const TABLE_BAR_WIDTH: usize = 40;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Markdown,
}

/// Formats a plot report in the requested output format.
pub fn format_plot_report(report: &PlotReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Markdown => Ok(plot_to_markdown(report)),
        OutputFormat::Table => Ok(plot_to_table(report)),
    }
}

/// Formats a scan report in the requested output format.
pub fn format_scan_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Markdown => Ok(scan_to_markdown(report)),
        OutputFormat::Table => Ok(scan_to_table(report)),
    }
}

fn plot_to_markdown(report: &PlotReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Summary: {}\n\n", report.summary_file));
    out.push_str(&format!("- **Total rows:** {}\n", report.total_rows));
    if report.skipped_rows > 0 {
        out.push_str(&format!("- **Skipped rows:** {}\n", report.skipped_rows));
    }
    if let Some(ref chart) = report.chart_path {
        out.push_str(&format!("- **Chart:** {chart}\n"));
    }
    out.push('\n');

    out.push_str("| Bucket | Count | Color |\n");
    out.push_str("|--------|-------|-------|\n");
    for bucket in &report.buckets {
        out.push_str(&format!(
            "| `{}` | {} | {} |\n",
            bucket.label,
            bucket.count,
            bucket.color.name()
        ));
    }
    out
}

fn plot_to_table(report: &PlotReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Summary: {}\n\n", report.summary_file));
    out.push_str(&render_terminal(&report.counts(), TABLE_BAR_WIDTH));
    if let Some(ref chart) = report.chart_path {
        out.push_str(&format!("\nChart written to {chart}\n"));
    }
    out
}

fn scan_to_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Scan: {} ({})\n\n", report.root, report.log_kind));
    out.push_str(&format!("- **Output:** {}\n", report.output));
    out.push_str(&format!("- **Rows:** {}\n", report.rows));
    out.push_str(&format!("- **Available:** {}\n", report.available));
    out.push_str(&format!("- **Unavailable:** {}\n", report.unavailable));
    out
}

fn scan_to_table(report: &ScanReport) -> String {
    format!(
        "{:<6} {:<40} rows={} available={} unavailable={}  -> {}\n",
        report.log_kind, report.root, report.rows, report.available, report.unavailable, report.output
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::{BarColor, Bucket, BucketCounts};
    use log_census_core::{ClassifierMode, LogKind};
    use std::path::Path;

    fn sample_plot() -> PlotReport {
        let counts = BucketCounts {
            mode: ClassifierMode::Parser,
            buckets: vec![
                Bucket {
                    label: "no_error".to_string(),
                    count: 2,
                    color: BarColor::Green,
                },
                Bucket {
                    label: "unavailable".to_string(),
                    count: 1,
                    color: BarColor::Red,
                },
            ],
            total_rows: 3,
        };
        PlotReport::new(Path::new("summary_run.csv"), &counts, 0)
    }

    fn sample_scan() -> ScanReport {
        ScanReport::new(
            Path::new("/data"),
            LogKind::Build,
            ClassifierMode::Flags,
            Path::new("/data/summary_build.csv"),
            &[],
        )
    }

    #[test]
    fn test_format_plot_json() {
        let json = format_plot_report(&sample_plot(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"total_rows\": 3"));
        assert!(json.contains("\"label\": \"no_error\""));
    }

    #[test]
    fn test_format_plot_yaml() {
        let yaml = format_plot_report(&sample_plot(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("total_rows: 3"));
    }

    #[test]
    fn test_format_plot_markdown() {
        let mut report = sample_plot();
        report.chart_path = Some("summary_run.svg".to_string());
        let md = format_plot_report(&report, OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Summary: summary_run.csv"));
        assert!(md.contains("| `no_error` | 2 | green |"));
        assert!(md.contains("**Chart:** summary_run.svg"));
        assert!(!md.contains("Skipped"));
    }

    #[test]
    fn test_format_plot_table() {
        let table = format_plot_report(&sample_plot(), OutputFormat::Table).unwrap();
        assert!(table.contains("no_error"));
        assert!(table.contains("total rows: 3"));
    }

    #[test]
    fn test_format_scan_outputs() {
        let report = sample_scan();
        let table = format_scan_report(&report, OutputFormat::Table).unwrap();
        assert!(table.starts_with("build"));
        assert!(table.contains("rows=0"));
        let md = format_scan_report(&report, OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Scan: /data (build)"));
        let json = format_scan_report(&report, OutputFormat::Json).unwrap();
        assert!(json.contains("\"log_kind\": \"build\""));
    }
}
