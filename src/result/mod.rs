//! Result types for expect operations

mod error;

pub use error::{ExpectError, PatternError};

/// Result of a successful pattern match.
///
/// `before` holds everything that arrived after the previous match and ahead
/// of this one. It never includes the matched delimiter itself, which makes it
/// the unit of text handed to [`crate::Menu::parse`].
///
/// # Examples
///
/// ```no_run
/// use portcfg::{Pattern, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let mut session = Session::spawn::<&str>("some-tool", &[])?;
/// session.send_line("1").await?;
/// let result = session.expect(Pattern::exact("==>")).await?;
///
/// println!("Menu text: {}", result.before);
/// # Ok(())
/// # }
/// ```
///
/// # Regex Captures
///
/// For regex patterns, `captures[0]` is the full match and `captures[1..]` are
/// the capture groups that participated in the match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matched text.
    pub matched: String,

    /// Text that arrived since the previous match, up to the start of this one.
    pub before: String,

    /// Captured groups (for regex patterns).
    ///
    /// For non-regex patterns, this vector is empty.
    pub captures: Vec<String>,
}
