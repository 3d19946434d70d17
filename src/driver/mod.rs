//! Menu navigation and configuration workflows
//!
//! A [`PytoolDriver`] owns one transport to the configuration tool. Every
//! workflow takes the screen text captured at the previous synchronization
//! point and hands back the next one in [`WorkflowOutcome::captured`], so the
//! caller threads the tool's state explicitly from one call to the next.
//!
//! ```no_run
//! use portcfg::{PortConfigRequest, PortType, PytoolDriver, ToolCommand};
//! use indexmap::IndexMap;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let command = ToolCommand::pytool("python3", "/opt/lek/", "1");
//! let (mut driver, screen) = PytoolDriver::launch(&command, Duration::from_secs(30)).await?;
//!
//! let request = PortConfigRequest::new(PortType::Host, IndexMap::from([(1, 2000), (2, 2000)]));
//! let outcome = driver.configure_mtu_size(&screen, &request, true).await?;
//! assert!(outcome.success);
//! # Ok(())
//! # }
//! ```

mod error;
mod lifecycle;
mod navigator;
pub mod protocol;
mod request;
mod workflows;

#[cfg(test)]
mod sim;

pub use error::DriverError;
pub use lifecycle::ToolCommand;
pub use navigator::select;
pub use request::{needs_destination, ImtToggle, PortConfigRequest, PortMappingRequest, PortType};

use crate::session::{Session, Transport};

/// Result of one workflow.
///
/// `success` is false when a menu label was missing; the workflow stopped at
/// that step and `failure` holds the lookup error. Timeouts and stream
/// closure are not reported here: they are returned as `Err` because the
/// session cannot be used afterwards.
#[derive(Debug)]
pub struct WorkflowOutcome {
    /// Every selection found its label
    pub success: bool,
    /// Text captured at the last synchronization point reached
    pub captured: String,
    /// Lookup error that aborted the workflow
    pub failure: Option<DriverError>,
    /// Number of captures in which the tool reported an invalid choice
    pub rejected_choices: usize,
}

impl WorkflowOutcome {
    /// Turn an aborted workflow or any rejected choice into an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::{DriverError, WorkflowOutcome};
    ///
    /// let outcome = WorkflowOutcome {
    ///     success: true,
    ///     captured: String::new(),
    ///     failure: None,
    ///     rejected_choices: 2,
    /// };
    /// assert!(matches!(outcome.strict(), Err(DriverError::RejectedChoice { count: 2 })));
    /// ```
    pub fn strict(self) -> Result<Self, DriverError> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        if self.rejected_choices > 0 {
            return Err(DriverError::RejectedChoice {
                count: self.rejected_choices,
            });
        }
        Ok(self)
    }
}

/// Drives the menu-based configuration tool over a [`Transport`].
///
/// Operations are strictly sequential: each send is followed by exactly one
/// wait before anything else is sent.
pub struct PytoolDriver<T = Session> {
    transport: T,
}

impl<T: Transport> PytoolDriver<T> {
    /// Access the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the driver and return its transport
    pub fn into_transport(self) -> T {
        self.transport
    }
}
