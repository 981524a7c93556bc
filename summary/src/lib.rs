//! Folder aggregation and summary charts for sandboxed sample logs.
//!
//! A sample root holds one directory per sample, each with a `build.log`
//! and a `run.log`. This crate covers both pipelines on top of
//! [`log_census_core`]:
//!
//! - [`scan::summarize_folder_to_file`] — classify one log kind of every
//!   sample and write `summary_{kind}.csv`.
//! - [`plot::plot_summary`] — read a summary back, derive
//!   [`buckets::BucketCounts`], and render an SVG bar chart.
//! - [`batch::run_batch`] — both steps for each pass of a
//!   [`config::CensusConfig`].
//!
//! # Example
//!
//! ```
//! use std::fs;
//! use log_census_core::{ClassifierMode, LogKind};
//! use log_census_summary::{plot, scan};
//!
//! let root = tempfile::tempdir().unwrap();
//! fs::create_dir(root.path().join("a")).unwrap();
//! fs::write(root.path().join("a/run.log"), "START\nok\n").unwrap();
//!
//! let report = scan::summarize_folder_to_file(
//!     root.path(),
//!     LogKind::Run,
//!     ClassifierMode::Parser,
//!     None,
//! )
//! .unwrap();
//! assert_eq!(report.available, 1);
//!
//! let summary = root.path().join("summary_run.csv");
//! let plotted = plot::plot_summary(&summary, ClassifierMode::Parser, None).unwrap();
//! assert_eq!(plotted.buckets[0].label, "no_error");
//! ```

pub mod batch;
pub mod buckets;
pub mod chart;
pub mod config;
mod error;
pub mod output;
pub mod plot;
pub mod report;
pub mod scan;
pub mod table;

pub use error::{Result, SummaryError};
