//! Case-insensitive keyword flags for flag mode.

use serde::{Deserialize, Serialize};

/// Number of keywords checked in flag mode.
pub const KEYWORD_COUNT: usize = 19;

/// Keywords checked in flag mode, in column order.
pub const KEYWORDS: [&str; KEYWORD_COUNT] = [
    "Error",
    "Failed",
    "Skipped",
    "Warning",
    "Exception",
    "ImportError",
    "ModuleNotFoundError",
    "AttributeError",
    "KeyError",
    "IndexError",
    "TypeError",
    "ValueError",
    "NameError",
    "SyntaxError",
    "IndentationError",
    "TabError",
    "EOFError",
    "SystemExit",
    "KeyboardInterrupt",
];

/// Keyword excluded from the "non-warning" set when deriving success buckets.
pub const WARNING_KEYWORD: &str = "Warning";

/// Presence flag for each entry of [`KEYWORDS`], in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordFlags([bool; KEYWORD_COUNT]);

impl KeywordFlags {
    pub fn new(flags: [bool; KEYWORD_COUNT]) -> Self {
        Self(flags)
    }

    /// Flag for `keyword`, or `None` when it is not a known keyword.
    pub fn get(&self, keyword: &str) -> Option<bool> {
        KEYWORDS
            .iter()
            .position(|k| *k == keyword)
            .map(|idx| self.0[idx])
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Pairs each keyword with its flag.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        KEYWORDS.iter().copied().zip(self.0.iter().copied())
    }

    /// Keywords whose flag is set.
    pub fn found(&self) -> Vec<&'static str> {
        self.iter()
            .filter_map(|(keyword, hit)| hit.then_some(keyword))
            .collect()
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|hit| *hit)
    }
}

/// Flags every keyword whose lowercase form occurs in the lowercased text.
///
/// Matching is plain substring containment, so `Error` is also set by
/// `TypeError` or `errors`.
///
/// # Examples
///
/// ```
/// use log_census_core::flag_keywords;
///
/// let flags = flag_keywords("Traceback...\nkeyerror: 'x'");
/// assert_eq!(flags.get("KeyError"), Some(true));
/// assert_eq!(flags.get("Error"), Some(true));
/// assert_eq!(flags.get("Warning"), Some(false));
/// ```
pub fn flag_keywords(text: &str) -> KeywordFlags {
    let lower = text.to_lowercase();
    let mut flags = [false; KEYWORD_COUNT];
    for (flag, keyword) in flags.iter_mut().zip(KEYWORDS) {
        *flag = lower.contains(&keyword.to_lowercase());
    }
    KeywordFlags::new(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_list_order() {
        assert_eq!(KEYWORDS.len(), KEYWORD_COUNT);
        assert_eq!(KEYWORDS[3], WARNING_KEYWORD);
        assert_eq!(KEYWORDS[13], "SyntaxError");
    }

    #[test]
    fn test_flags_match_lowercase_substring() {
        let text = "SyntaxError: invalid syntax";
        let flags = flag_keywords(text);
        for (keyword, hit) in flags.iter() {
            let expected = text.to_lowercase().contains(&keyword.to_lowercase());
            assert_eq!(hit, expected, "keyword {keyword}");
        }
        assert_eq!(flags.found(), vec!["Error", "SyntaxError"]);
    }

    #[test]
    fn test_flags_ignore_case_on_both_sides() {
        let flags = flag_keywords("WARNING: pip is outdated\nskipped 2 tests");
        assert_eq!(flags.get("Warning"), Some(true));
        assert_eq!(flags.get("Skipped"), Some(true));
        assert_eq!(flags.get("Error"), Some(false));
    }

    #[test]
    fn test_no_word_boundaries() {
        let flags = flag_keywords("3 errors, 1 unfailed");
        assert_eq!(flags.get("Error"), Some(true));
        assert_eq!(flags.get("Failed"), Some(true));
    }

    #[test]
    fn test_empty_text_sets_nothing() {
        let flags = flag_keywords("");
        assert!(!flags.any());
        assert_eq!(flags, KeywordFlags::default());
    }

    #[test]
    fn test_unknown_keyword_lookup() {
        assert_eq!(flag_keywords("Error").get("Panic"), None);
    }
}
