//! Structured reports for scan and plot runs.

use chrono::Utc;
use log_census_core::{ClassifierMode, LogKind, LogRecord};
use serde::Serialize;

use crate::buckets::{Bucket, BucketCounts};

/// Outcome of one folder scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: String,
    pub root: String,
    pub log_kind: LogKind,
    pub mode: ClassifierMode,
    /// Summary CSV that was written.
    pub output: String,
    pub rows: usize,
    pub available: usize,
    pub unavailable: usize,
}

impl ScanReport {
    pub fn new(
        root: &std::path::Path,
        log_kind: LogKind,
        mode: ClassifierMode,
        output: &std::path::Path,
        records: &[LogRecord],
    ) -> Self {
        let available = records.iter().filter(|r| r.is_available()).count();
        Self {
            generated_at: Utc::now().to_rfc3339(),
            root: root.display().to_string(),
            log_kind,
            mode,
            output: output.display().to_string(),
            rows: records.len(),
            available,
            unavailable: records.len() - available,
        }
    }
}

/// Outcome of plotting one summary table.
#[derive(Debug, Clone, Serialize)]
pub struct PlotReport {
    pub generated_at: String,
    pub summary_file: String,
    pub mode: ClassifierMode,
    pub total_rows: usize,
    /// Rows dropped as malformed while reading the table.
    pub skipped_rows: usize,
    pub buckets: Vec<Bucket>,
    /// SVG written for this plot, when one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<String>,
}

impl PlotReport {
    pub fn new(summary_file: &std::path::Path, counts: &BucketCounts, skipped_rows: usize) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            summary_file: summary_file.display().to_string(),
            mode: counts.mode,
            total_rows: counts.total_rows,
            skipped_rows,
            buckets: counts.buckets.clone(),
            chart_path: None,
        }
    }

    /// Bucket counts carried by this report.
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            mode: self.mode,
            buckets: self.buckets.clone(),
            total_rows: self.total_rows,
        }
    }
}

/// Reports from a batch run, in pass order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub scans: Vec<ScanReport>,
    pub plots: Vec<PlotReport>,
}
