//! Keyword handling for project search.
//!
//! A query is split on whitespace; every keyword must appear (as a
//! substring) in the project name, its description, or one of its tag
//! labels. The SQL itself lives in the repository layer; this module owns
//! tokenization and LIKE-pattern escaping.

/// Escape character used in generated LIKE patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Whether keyword matching distinguishes upper and lower case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchCase {
    /// ASCII case folding (SQLite `LIKE`).
    #[default]
    Insensitive,
    /// Exact byte-wise substring match.
    Sensitive,
}

impl MatchCase {
    pub fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            MatchCase::Sensitive
        } else {
            MatchCase::Insensitive
        }
    }
}

/// Split a free-text query into keywords. Blank queries yield no keywords.
///
/// # Examples
///
/// ```
/// use yarnstash_core::search::split_keywords;
/// assert_eq!(split_keywords(" blue  yarn "), vec!["blue", "yarn"]);
/// assert!(split_keywords("   ").is_empty());
/// ```
pub fn split_keywords(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Build a `%keyword%` LIKE pattern, escaping `%`, `_` and the escape
/// character itself so the keyword matches literally.
///
/// # Examples
///
/// ```
/// use yarnstash_core::search::like_pattern;
/// assert_eq!(like_pattern("wool"), "%wool%");
/// assert_eq!(like_pattern("50%"), "%50\\%%");
/// ```
pub fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
