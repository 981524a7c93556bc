//! Plot pipeline: summary table → bucket counts → chart.

use std::fs;
use std::path::{Path, PathBuf};

use log_census_core::ClassifierMode;
use tracing::info;

use crate::buckets::BucketCounts;
use crate::chart::{ChartOptions, render_svg};
use crate::error::Result;
use crate::report::PlotReport;
use crate::table::SummaryTable;

/// Default chart location: the summary path with an `svg` extension.
pub fn default_chart_path(summary_file: &Path) -> PathBuf {
    summary_file.with_extension("svg")
}

/// Reads `summary_file` and derives its bucket counts without rendering.
pub fn summarize_table(summary_file: &Path, mode: ClassifierMode) -> Result<PlotReport> {
    let table = SummaryTable::read(summary_file, mode)?;
    let counts = BucketCounts::from_table(&table);
    Ok(PlotReport::new(summary_file, &counts, table.skipped_rows))
}

/// Reads `summary_file`, derives buckets, and writes the SVG chart to
/// `chart_path` when one is given.
pub fn plot_summary(
    summary_file: &Path,
    mode: ClassifierMode,
    chart_path: Option<&Path>,
) -> Result<PlotReport> {
    let mut report = summarize_table(summary_file, mode)?;

    if let Some(chart_path) = chart_path {
        let options = ChartOptions {
            title: summary_file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            ..ChartOptions::default()
        };
        if let Some(parent) = chart_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(chart_path, render_svg(&report.counts(), &options))?;
        report.chart_path = Some(chart_path.display().to_string());
    }

    info!(
        summary = %summary_file.display(),
        buckets = report.buckets.len(),
        total_rows = report.total_rows,
        "plot complete"
    );
    Ok(report)
}
