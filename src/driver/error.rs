//! Driver-level errors

use crate::result::ExpectError;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while launching or navigating the configuration tool.
///
/// `LaunchFailure` and `LaunchTimeout` are fatal at startup. `LabelNotFound`
/// aborts the current workflow and is reported through
/// [`crate::WorkflowOutcome::failure`]. `PatternTimeout`, `StreamClosed` and
/// `Transport` are fatal for the driver: the session's menu position is no
/// longer known, so nothing is retried.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The tool exited before printing its top-level prompt.
    #[error("tool exited before reaching its prompt: {output}")]
    LaunchFailure {
        /// Output produced before exit
        output: String,
    },

    /// The tool never printed its top-level prompt.
    #[error("timed out after {duration:?} waiting for the tool's prompt: {output}")]
    LaunchTimeout {
        /// How long launch waited
        duration: Duration,
        /// Output produced so far
        output: String,
    },

    /// The current menu has no option with this label.
    #[error("menu label {label:?} not found")]
    LabelNotFound {
        /// Label that was looked up
        label: String,
    },

    /// An expected prompt never appeared.
    #[error("timed out after {duration:?} waiting for {prompt}")]
    PatternTimeout {
        /// Description of the awaited prompt
        prompt: String,
        /// Timeout that elapsed
        duration: Duration,
        /// Output seen while waiting
        before: String,
    },

    /// The tool exited in the middle of a workflow.
    #[error("tool exited while waiting for {prompt}")]
    StreamClosed {
        /// Description of the awaited prompt
        prompt: String,
        /// Output seen before the stream closed
        before: String,
    },

    /// The tool was told to quit but was still running when the timeout
    /// elapsed; it has been killed.
    #[error("tool did not exit within {duration:?}")]
    ExitTimeout {
        /// How long the driver waited
        duration: Duration,
    },

    /// The tool rejected one or more selections.
    #[error("tool rejected {count} selection(s)")]
    RejectedChoice {
        /// Number of captures carrying the rejection message
        count: usize,
    },

    /// A request cannot be expressed through the tool's menus.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Underlying transport error.
    #[error(transparent)]
    Transport(#[from] ExpectError),
}

impl DriverError {
    /// Map a transport error raised while waiting for `prompt`.
    pub(crate) fn awaiting(prompt: impl ToString, err: ExpectError) -> Self {
        match err {
            ExpectError::Timeout { duration, before } => DriverError::PatternTimeout {
                prompt: prompt.to_string(),
                duration,
                before,
            },
            ExpectError::Eof { before } => DriverError::StreamClosed {
                prompt: prompt.to_string(),
                before,
            },
            other => DriverError::Transport(other),
        }
    }

    /// Map a transport error raised while waiting for the launch prompt.
    pub(crate) fn launching(err: ExpectError) -> Self {
        match err {
            ExpectError::Timeout { duration, before } => DriverError::LaunchTimeout {
                duration,
                output: before,
            },
            ExpectError::Eof { before } => DriverError::LaunchFailure { output: before },
            other => DriverError::Transport(other),
        }
    }

    /// Whether the failure only aborts the current workflow.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, DriverError::LabelNotFound { .. })
    }
}
