//! Pattern matching for expect operations

mod matcher;

pub use matcher::Matcher;

use regex::bytes::Regex;
use std::fmt;

/// Pattern types for matching process output.
///
/// # Examples
///
/// ```
/// use portcfg::Pattern;
///
/// // Exact string (fastest)
/// let p1 = Pattern::exact("==>");
///
/// // Regular expression
/// let p2 = Pattern::regex(r"range 0-\d+").unwrap();
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact string match.
    ///
    /// Uses Boyer-Moore-Horspool. Prefer it whenever the prompt is a fixed
    /// string.
    Exact(String),

    /// Regular expression match over raw bytes.
    ///
    /// The matched text and all capture groups are returned in the
    /// `MatchResult`.
    Regex(Regex),
}

impl Pattern {
    /// Create an exact string pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::Pattern;
    ///
    /// let pattern = Pattern::exact("Goodbye");
    /// ```
    pub fn exact(s: impl Into<String>) -> Self {
        Pattern::Exact(s.into())
    }

    /// Create a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns a regex error if the pattern is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::Pattern;
    ///
    /// let pattern = Pattern::regex(r"Enter (?:Host|SOC) Port").unwrap();
    /// ```
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// Convert pattern to a matcher implementation
    pub(crate) fn to_matcher(&self) -> Result<Box<dyn Matcher>, crate::result::PatternError> {
        use matcher::{ExactMatcher, RegexMatcher};

        match self {
            Pattern::Exact(s) => Ok(Box::new(ExactMatcher::new(s.as_bytes())?)),
            Pattern::Regex(r) => Ok(Box::new(RegexMatcher::new(r.clone()))),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Exact(s) => write!(f, "{:?}", s),
            Pattern::Regex(r) => write!(f, "/{}/", r.as_str()),
        }
    }
}
