//! Pattern matcher implementations

use crate::result::PatternError;
use regex::bytes::Regex;

/// Result of a pattern match
#[derive(Debug, Clone)]
pub struct Match {
    /// Start position of the match
    pub start: usize,
    /// End position of the match
    pub end: usize,
    /// Captured groups (for regex)
    pub captures: Vec<String>,
}

/// Trait for pattern matching
pub trait Matcher: Send + Sync {
    /// Find the first match in the buffer
    fn find(&self, buffer: &[u8]) -> Option<Match>;
}

/// Exact string matcher using Boyer-Moore-Horspool algorithm
pub struct ExactMatcher {
    pattern: Vec<u8>,
    bad_char_table: [usize; 256],
}

impl ExactMatcher {
    /// Create a new exact matcher
    pub fn new(pattern: impl Into<Vec<u8>>) -> Result<Self, PatternError> {
        let pattern = pattern.into();

        if pattern.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        let mut bad_char_table = [pattern.len(); 256];
        for (i, &byte) in pattern.iter().enumerate().take(pattern.len() - 1) {
            bad_char_table[byte as usize] = pattern.len() - 1 - i;
        }

        Ok(Self {
            pattern,
            bad_char_table,
        })
    }
}

impl Matcher for ExactMatcher {
    fn find(&self, buffer: &[u8]) -> Option<Match> {
        let len = self.pattern.len();
        let mut pos = 0;
        while pos + len <= buffer.len() {
            if buffer[pos..pos + len] == self.pattern[..] {
                return Some(Match {
                    start: pos,
                    end: pos + len,
                    captures: vec![],
                });
            }

            let shift_char = buffer[pos + len - 1];
            pos += self.bad_char_table[shift_char as usize];
        }

        None
    }
}

/// Regex matcher
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Wrap an already compiled regex
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Matcher for RegexMatcher {
    fn find(&self, buffer: &[u8]) -> Option<Match> {
        let captures = self.regex.captures(buffer)?;
        let full_match = captures.get(0)?;

        let capture_strings = captures
            .iter()
            .flatten()
            .map(|cap| String::from_utf8_lossy(cap.as_bytes()).into_owned())
            .collect();

        Some(Match {
            start: full_match.start(),
            end: full_match.end(),
            captures: capture_strings,
        })
    }
}
