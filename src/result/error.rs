//! Error types for the session transport

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while driving a spawned process.
///
/// The two synchronization failures, [`ExpectError::Timeout`] and
/// [`ExpectError::Eof`], carry the unmatched output seen so far. Callers use
/// it for diagnostics only; the session is unusable for navigation once either
/// has been returned.
///
/// # Examples
///
/// ```no_run
/// use portcfg::{ExpectError, Pattern, Session};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::builder()
///     .timeout(Duration::from_secs(5))
///     .spawn("some-tool", &["--flag"])?;
///
/// match session.expect(Pattern::exact("==>")).await {
///     Ok(result) => println!("Menu: {}", result.before),
///     Err(ExpectError::Timeout { duration, before }) => {
///         eprintln!("Timed out after {:?}, saw {:?}", duration, before);
///     }
///     Err(ExpectError::Eof { before }) => {
///         eprintln!("Process exited: {}", before);
///     }
///     Err(e) => return Err(e.into()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum ExpectError {
    /// Timeout waiting for pattern.
    #[error("Timeout waiting for pattern (after {duration:?})")]
    Timeout {
        /// Duration that was waited before timeout
        duration: Duration,
        /// Unmatched output received before giving up
        before: String,
    },

    /// EOF reached before pattern matched.
    ///
    /// Returned when the process exits and closes its output stream before the
    /// expected pattern is found.
    #[error("EOF reached before pattern matched")]
    Eof {
        /// Unmatched output received before the stream closed
        before: String,
    },

    /// Invalid pattern.
    #[error("Invalid pattern: {0}")]
    PatternError(#[from] PatternError),

    /// I/O error.
    ///
    /// Returned when an underlying I/O operation fails (writing to the PTY,
    /// waiting for the child, etc.).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// PTY error.
    #[error("PTY error: {0}")]
    PtyError(String),

    /// Process spawning error.
    ///
    /// Returned when the specified program cannot be spawned (not found,
    /// permission denied, etc.).
    #[error("Failed to spawn process: {0}")]
    SpawnError(String),

    /// Process already exited.
    ///
    /// Returned when attempting to wait on a process that has already been
    /// reaped via `Session::wait()`.
    #[error("Process has already exited")]
    ProcessExited,
}

/// Errors related to pattern creation.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Invalid regex pattern.
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Empty pattern.
    ///
    /// Returned when attempting to match an empty exact string.
    #[error("Pattern cannot be empty")]
    EmptyPattern,
}
