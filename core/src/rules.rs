//! Ordered substring rules for parser mode.
//!
//! The first rule whose predicate holds decides the category. Rules are not
//! mutually exclusive; table order is the tie-break. Matching is
//! case-sensitive.

use serde::Serialize;

use crate::keywords::flag_keywords;
use crate::types::{ClassifierMode, ErrorCategory, Verdict};

/// Test applied to the full log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Holds when any marker is a substring of the text.
    AnyOf(&'static [&'static str]),
    /// Holds only for the exact empty string.
    Empty,
}

impl Predicate {
    /// Returns the matching marker, `Some("")` for [`Predicate::Empty`], or
    /// `None` when the predicate does not hold.
    fn find(&self, text: &str) -> Option<&'static str> {
        match self {
            Self::AnyOf(markers) => markers.iter().copied().find(|m| text.contains(m)),
            Self::Empty => text.is_empty().then_some(""),
        }
    }
}

/// One entry of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    pub category: ErrorCategory,
}

const fn any_of(markers: &'static [&'static str], category: ErrorCategory) -> Rule {
    Rule {
        predicate: Predicate::AnyOf(markers),
        category,
    }
}

const fn pass(markers: &'static [&'static str]) -> Rule {
    any_of(markers, ErrorCategory::OtherPass)
}

/// Classification table in priority order.
///
/// Everything after the `SyntaxError` entry resolves to
/// [`ErrorCategory::OtherPass`]; those entries only identify which known
/// failure was seen.
pub const RULES: &[Rule] = &[
    any_of(
        &["ModuleNotFound", "DependencyNotInstalled"],
        ErrorCategory::ModuleNotFound,
    ),
    any_of(&["ImportError"], ErrorCategory::ImportError),
    any_of(
        &["No matching distribution", "DistributionNotFound"],
        ErrorCategory::NoMatchingDistribution,
    ),
    any_of(
        &["Could not build wheels", "Failed building wheel"],
        ErrorCategory::CouldNotBuildWheels,
    ),
    any_of(&["Invalid requirement"], ErrorCategory::InvalidRequirement),
    any_of(&["AttributeError"], ErrorCategory::AttributeError),
    any_of(&["NameError"], ErrorCategory::NameError),
    any_of(&["TypeError"], ErrorCategory::TypeError),
    any_of(&["SyntaxError", "SyntaxWarning"], ErrorCategory::SyntaxError),
    Rule {
        predicate: Predicate::Empty,
        category: ErrorCategory::OtherPass,
    },
    pass(&[
        "snippet.py: error",
        "FileNotFoundError",
        "Python 2 is no longer supported",
        "IOError",
    ]),
    pass(&[
        "IndexError",
        "UserWarning",
        "ValueError",
        "EOFError",
        "django.core.exceptions",
    ]),
    pass(&[
        "Requires the full path to a file",
        "ImproperlyConfigured",
        "DatabaseError",
        "DeprecationWarning",
    ]),
    pass(&[
        "MySQLInterfaceError",
        "UnparsedFlagAccessError",
        "TabError",
        "OSError",
        "TclError",
    ]),
    pass(&[
        "NoBackendError",
        "MySQLdb",
        "AssertionError",
        "meowexception",
        "WARNING:tensorflow",
    ]),
    pass(&[
        "redis.exceptions",
        "ConnectionRefusedError",
        "FeatureNotFound",
        "urllib.error",
    ]),
    pass(&[
        "git.exc",
        "RuntimeError",
        "DJANGO_PROJECT_PATH",
        "pygame.error",
        "smi.error",
        "Using TensorFlow backend",
    ]),
    pass(&[
        "ZeroDivisionError",
        "KeyError",
        "pymongo.errors",
        "JAVA_HOME",
        "cv2.error",
        "infinite attractor",
    ]),
    pass(&[
        "ansible.errors",
        "tensorflow/stream_executor",
        "OAuthException",
        "socket.error",
        "GITHUB_TOKEN",
    ]),
    pass(&[
        "Usage: /app/snippet.py",
        "usage: /app/snippet.py",
        "usage: snippet.py",
        "theano.tensor.blas",
        "sqlite3",
    ]),
    pass(&[
        "TelegramError",
        "reddit-like system",
        "JSONDecodeError",
        "LookupError",
        "ParseError",
        "gaierror",
    ]),
    pass(&["ReadError", "APIError"]),
];

/// Which table entry decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchedRule {
    /// Rule at `index` in [`RULES`] matched via `marker`.
    Marker { index: usize, marker: &'static str },
    /// The log text was empty.
    EmptyLog { index: usize },
    /// No rule matched.
    Fallthrough,
}

/// Category plus the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: ErrorCategory,
    pub rule: MatchedRule,
}

/// Classifies `text` and reports which rule fired.
///
/// # Examples
///
/// ```
/// use log_census_core::{ErrorCategory, MatchedRule, explain};
///
/// let c = explain("ImportError: cannot import name 'x'\nModuleNotFoundError: y");
/// assert_eq!(c.category, ErrorCategory::ModuleNotFound);
/// assert_eq!(c.rule, MatchedRule::Marker { index: 0, marker: "ModuleNotFound" });
/// ```
pub fn explain(text: &str) -> Classification {
    for (index, rule) in RULES.iter().enumerate() {
        let Some(marker) = rule.predicate.find(text) else {
            continue;
        };
        let matched = match rule.predicate {
            Predicate::Empty => MatchedRule::EmptyLog { index },
            Predicate::AnyOf(_) => MatchedRule::Marker { index, marker },
        };
        return Classification {
            category: rule.category,
            rule: matched,
        };
    }
    Classification {
        category: ErrorCategory::OtherPass,
        rule: MatchedRule::Fallthrough,
    }
}

/// Assigns exactly one [`ErrorCategory`] to `text`.
///
/// # Examples
///
/// ```
/// use log_census_core::{ErrorCategory, classify_error};
///
/// assert_eq!(classify_error("SyntaxError: invalid syntax"), ErrorCategory::SyntaxError);
/// assert_eq!(classify_error(""), ErrorCategory::OtherPass);
/// // case-sensitive
/// assert_eq!(classify_error("syntaxerror"), ErrorCategory::OtherPass);
/// ```
pub fn classify_error(text: &str) -> ErrorCategory {
    explain(text).category
}

/// Classifies `text` in the requested mode.
pub fn classify(text: &str, mode: ClassifierMode) -> Verdict {
    match mode {
        ClassifierMode::Flags => Verdict::Flags(flag_keywords(text)),
        ClassifierMode::Parser => Verdict::Category(classify_error(text)),
    }
}
