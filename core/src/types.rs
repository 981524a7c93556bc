//! Log outcome type definitions.
//!
//! This module defines the data model shared by the classifier, the folder
//! aggregator and the summary plotter. The types serialize with [`serde`] so
//! scan reports can be emitted as JSON or YAML.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordFlags;

/// Which log of a sample is being inspected.
///
/// # Examples
///
/// ```
/// use log_census_core::LogKind;
///
/// let kind: LogKind = "run".parse().unwrap();
/// assert_eq!(kind, LogKind::Run);
/// assert_eq!(kind.log_file_name(), "run.log");
/// assert_eq!(kind.summary_file_name(), "summary_run.csv");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Output of the environment build step.
    Build,
    /// Output of executing the sample itself.
    Run,
}

impl LogKind {
    /// Lowercase token used in file names and the `log_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Run => "run",
        }
    }

    /// File name of this log inside a sample directory.
    pub fn log_file_name(self) -> String {
        format!("{}.log", self.as_str())
    }

    /// Default file name of the summary table for this log kind.
    pub fn summary_file_name(self) -> String {
        format!("summary_{}.csv", self.as_str())
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a log kind token is not `build` or `run`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log kind '{0}': expected 'build' or 'run'")]
pub struct ParseLogKindError(pub String);

impl FromStr for LogKind {
    type Err = ParseLogKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "build" => Ok(Self::Build),
            "run" => Ok(Self::Run),
            other => Err(ParseLogKindError(other.to_string())),
        }
    }
}

/// Classification strategy applied to a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// One boolean per entry of [`KEYWORDS`](crate::KEYWORDS).
    #[default]
    Flags,
    /// One [`ErrorCategory`] chosen by the ordered rule table.
    Parser,
}

impl ClassifierMode {
    /// Maps the `use_parser` switch onto a mode.
    pub fn from_use_parser(use_parser: bool) -> Self {
        if use_parser { Self::Parser } else { Self::Flags }
    }

    /// Names of the verdict columns written for this mode.
    pub fn verdict_columns(self) -> Vec<&'static str> {
        match self {
            Self::Flags => crate::KEYWORDS.to_vec(),
            Self::Parser => vec![ERROR_TYPE_COLUMN],
        }
    }
}

/// Name of the single verdict column in parser mode.
pub const ERROR_TYPE_COLUMN: &str = "error_type";

/// Columns that precede the verdict columns in every summary table.
pub const STANDARD_COLUMNS: [&str; 4] = ["gist_id", "path", "log_type", "available"];

/// Closed set of labels produced by [`classify_error`](crate::classify_error).
///
/// Display and serde both use the bare variant name, which is also the text
/// written to the `error_type` column.
///
/// # Examples
///
/// ```
/// use log_census_core::ErrorCategory;
///
/// assert_eq!(ErrorCategory::ModuleNotFound.to_string(), "ModuleNotFound");
/// assert_eq!(ErrorCategory::default(), ErrorCategory::OtherPass);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCategory {
    ModuleNotFound,
    ImportError,
    NoMatchingDistribution,
    CouldNotBuildWheels,
    InvalidRequirement,
    AttributeError,
    NameError,
    TypeError,
    SyntaxError,
    /// Everything not singled out above, including clean logs.
    #[default]
    OtherPass,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModuleNotFound => "ModuleNotFound",
            Self::ImportError => "ImportError",
            Self::NoMatchingDistribution => "NoMatchingDistribution",
            Self::CouldNotBuildWheels => "CouldNotBuildWheels",
            Self::InvalidRequirement => "InvalidRequirement",
            Self::AttributeError => "AttributeError",
            Self::NameError => "NameError",
            Self::TypeError => "TypeError",
            Self::SyntaxError => "SyntaxError",
            Self::OtherPass => "OtherPass",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of classifying one available log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Keyword presence flags (flag mode).
    Flags(KeywordFlags),
    /// Single category label (parser mode).
    Category(ErrorCategory),
}

impl Verdict {
    /// Mode that produced this verdict.
    pub fn mode(&self) -> ClassifierMode {
        match self {
            Self::Flags(_) => ClassifierMode::Flags,
            Self::Category(_) => ClassifierMode::Parser,
        }
    }
}

/// Per-sample summary of one log.
///
/// `verdict` is `None` exactly when the log is unavailable: missing, empty,
/// or a `run` log without the start sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Sample identifier taken from the directory name.
    pub sample_id: String,
    /// Sample directory.
    pub path: PathBuf,
    pub log_kind: LogKind,
    pub verdict: Option<Verdict>,
}

impl LogRecord {
    /// Creates a record for an unavailable log.
    pub fn unavailable(
        sample_id: impl Into<String>,
        path: impl Into<PathBuf>,
        log_kind: LogKind,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            path: path.into(),
            log_kind,
            verdict: None,
        }
    }

    /// Attaches a verdict, marking the log available.
    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    pub fn is_available(&self) -> bool {
        self.verdict.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_kind_parse_and_display() {
        assert_eq!("build".parse::<LogKind>().unwrap(), LogKind::Build);
        assert_eq!(" run ".parse::<LogKind>().unwrap(), LogKind::Run);
        assert_eq!(LogKind::Build.to_string(), "build");
        let err = "deploy".parse::<LogKind>().unwrap_err();
        assert!(err.to_string().contains("deploy"));
    }

    #[test]
    fn test_log_kind_file_names() {
        assert_eq!(LogKind::Build.log_file_name(), "build.log");
        assert_eq!(LogKind::Build.summary_file_name(), "summary_build.csv");
    }

    #[test]
    fn test_mode_from_use_parser() {
        assert_eq!(ClassifierMode::from_use_parser(true), ClassifierMode::Parser);
        assert_eq!(ClassifierMode::from_use_parser(false), ClassifierMode::Flags);
    }

    #[test]
    fn test_verdict_columns_per_mode() {
        assert_eq!(ClassifierMode::Parser.verdict_columns(), vec!["error_type"]);
        let flags = ClassifierMode::Flags.verdict_columns();
        assert_eq!(flags.len(), 19);
        assert_eq!(flags[0], "Error");
        assert_eq!(flags[18], "KeyboardInterrupt");
    }

    #[test]
    fn test_error_category_serde_uses_variant_name() {
        let json = serde_json::to_string(&ErrorCategory::CouldNotBuildWheels).unwrap();
        assert_eq!(json, "\"CouldNotBuildWheels\"");
        for category in crate::RULES.iter().map(|rule| rule.category) {
            assert_eq!(
                serde_json::to_string(&category).unwrap(),
                format!("\"{category}\"")
            );
        }
    }

    #[test]
    fn test_unavailable_record_has_no_verdict() {
        let record = LogRecord::unavailable("abc", "/tmp/abc", LogKind::Run);
        assert!(!record.is_available());
        let record = record.with_verdict(Verdict::Category(ErrorCategory::NameError));
        assert!(record.is_available());
        assert_eq!(record.verdict.unwrap().mode(), ClassifierMode::Parser);
    }
}
