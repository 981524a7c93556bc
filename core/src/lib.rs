//! Log outcome model and classifiers for sandboxed sample runs.
//!
//! Each sample gets a `build.log` and a `run.log` from its isolated
//! environment. This crate turns the text of one such log into a verdict:
//!
//! - [`flag_keywords`] — flag mode, one case-insensitive presence flag per
//!   entry of [`KEYWORDS`].
//! - [`classify_error`] — parser mode, one [`ErrorCategory`] picked by the
//!   first matching entry of the ordered [`RULES`] table.
//! - [`explain`] — parser mode with the deciding rule attached.
//!
//! [`LogRecord`] ties a verdict to its sample. A record without a verdict is
//! an unavailable log.
//!
//! # Example
//!
//! ```
//! use log_census_core::*;
//!
//! let log = "Traceback (most recent call last):\nSyntaxError: invalid syntax";
//!
//! let flags = flag_keywords(log);
//! assert_eq!(flags.found(), vec!["Error", "SyntaxError"]);
//!
//! assert_eq!(classify_error(log), ErrorCategory::SyntaxError);
//!
//! let record = LogRecord::unavailable("b", "/samples/b", LogKind::Build)
//!     .with_verdict(classify(log, ClassifierMode::Parser));
//! assert!(record.is_available());
//! ```

mod keywords;
mod rules;
mod types;

pub use keywords::{KEYWORD_COUNT, KEYWORDS, KeywordFlags, WARNING_KEYWORD, flag_keywords};
pub use rules::{Classification, MatchedRule, Predicate, RULES, Rule, classify, classify_error, explain};
pub use types::*;
