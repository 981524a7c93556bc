//! Bucket counts derived from a summary table.
//!
//! A bucket is one bar of the summary chart. Primary buckets come straight
//! from the data (distinct labels in parser mode, keyword columns in flag
//! mode); the synthesized ones (`no_error`, `success`, `warning_only`,
//! `unavailable`) are only emitted when their count is positive.

use std::collections::BTreeMap;

use log_census_core::{ClassifierMode, ErrorCategory, WARNING_KEYWORD};
use serde::Serialize;

use crate::table::{Availability, SummaryTable, is_true_cell};

pub const NO_ERROR_BUCKET: &str = "no_error";
pub const SUCCESS_BUCKET: &str = "success";
pub const WARNING_ONLY_BUCKET: &str = "warning_only";
pub const UNAVAILABLE_BUCKET: &str = "unavailable";

/// Fill color of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarColor {
    /// Default series color for primary buckets.
    Primary,
    Green,
    Red,
    Olive,
    Wheat,
}

impl BarColor {
    /// Short color name as shown in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "C0",
            Self::Green => "green",
            Self::Red => "red",
            Self::Olive => "olive",
            Self::Wheat => "wheat",
        }
    }

    /// SVG fill value.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Primary => "#1f77b4",
            Self::Green => "#008000",
            Self::Red => "#ff0000",
            Self::Olive => "#808000",
            Self::Wheat => "#f5deb3",
        }
    }
}

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
    pub color: BarColor,
}

impl Bucket {
    fn new(label: impl Into<String>, count: usize, color: BarColor) -> Self {
        Self {
            label: label.into(),
            count,
            color,
        }
    }
}

/// Buckets of one summary table, sorted by count descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub mode: ClassifierMode,
    pub buckets: Vec<Bucket>,
    /// Every parsed row, available or not. Drawn as the reference line.
    pub total_rows: usize,
}

impl BucketCounts {
    /// Derives buckets for the mode the table was read in.
    pub fn from_table(table: &SummaryTable) -> Self {
        let mut buckets = match table.mode {
            ClassifierMode::Parser => parser_buckets(table),
            ClassifierMode::Flags => flag_buckets(table),
        };
        // Stable: ties keep derivation order.
        buckets.sort_by(|a, b| b.count.cmp(&a.count));
        Self {
            mode: table.mode,
            buckets,
            total_rows: table.len(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    /// Count of `label`, zero when the bucket is absent.
    pub fn count(&self, label: &str) -> usize {
        self.get(label).map_or(0, |b| b.count)
    }

    /// Largest bucket count.
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

fn push_positive(buckets: &mut Vec<Bucket>, label: &str, count: usize, color: BarColor) {
    if count > 0 {
        buckets.push(Bucket::new(label, count, color));
    }
}

fn parser_buckets(table: &SummaryTable) -> Vec<Bucket> {
    let mut labels: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unavailable = 0usize;

    for row in &table.rows {
        match row.available {
            Availability::Available => {
                let label = row.verdict_cells.first().map_or("", |c| c.trim());
                if !label.is_empty() {
                    *labels.entry(label).or_default() += 1;
                }
            }
            Availability::Unavailable => unavailable += 1,
            Availability::Unknown => {}
        }
    }

    let no_error = labels.remove(ErrorCategory::OtherPass.as_str()).unwrap_or(0);

    let mut buckets: Vec<Bucket> = labels
        .into_iter()
        .map(|(label, count)| Bucket::new(label, count, BarColor::Primary))
        .collect();
    push_positive(&mut buckets, NO_ERROR_BUCKET, no_error, BarColor::Green);
    push_positive(&mut buckets, UNAVAILABLE_BUCKET, unavailable, BarColor::Red);
    buckets
}

fn flag_buckets(table: &SummaryTable) -> Vec<Bucket> {
    let warning_idx = table.verdict_index(WARNING_KEYWORD);
    let mut per_column = vec![0usize; table.verdict_columns.len()];
    let mut no_error = 0usize;
    let mut success = 0usize;
    let mut warning_only = 0usize;

    for row in table
        .rows
        .iter()
        .filter(|row| row.available == Availability::Available)
    {
        let mut any_hit = false;
        let mut non_warning_hit = false;
        for (idx, cell) in row.verdict_cells.iter().enumerate() {
            if !is_true_cell(cell) {
                continue;
            }
            per_column[idx] += 1;
            any_hit = true;
            if Some(idx) != warning_idx {
                non_warning_hit = true;
            }
        }

        if !any_hit {
            no_error += 1;
        }
        if !non_warning_hit {
            success += 1;
            if warning_idx.is_some_and(|idx| is_true_cell(&row.verdict_cells[idx])) {
                warning_only += 1;
            }
        }
    }

    let mut buckets: Vec<Bucket> = table
        .verdict_columns
        .iter()
        .zip(per_column)
        .map(|(column, count)| Bucket::new(column.as_str(), count, BarColor::Primary))
        .collect();
    push_positive(&mut buckets, NO_ERROR_BUCKET, no_error, BarColor::Green);
    push_positive(&mut buckets, SUCCESS_BUCKET, success, BarColor::Olive);
    push_positive(&mut buckets, WARNING_ONLY_BUCKET, warning_only, BarColor::Wheat);
    buckets
}
