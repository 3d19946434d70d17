//! portcfg: drive the LEK port configuration tool from code
//!
//! The configuration tool is an interactive, menu-driven program. portcfg runs
//! it inside a pseudo-terminal, reads the menus it prints, and answers them the
//! way an operator would: MTU changes for host and SOC ports, IMT toggles,
//! port mappings, then save and apply.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use indexmap::IndexMap;
//! use portcfg::{PortConfigRequest, PortType, PytoolDriver, ToolCommand};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let command = ToolCommand::pytool("python3", "/opt/lek/", "1");
//!     let (mut driver, screen) = PytoolDriver::launch(&command, Duration::from_secs(30)).await?;
//!
//!     let host = PortConfigRequest::new(PortType::Host, IndexMap::from([(1, 2000)]));
//!     let outcome = driver.configure_mtu_size(&screen, &host, true).await?;
//!     if !outcome.success {
//!         eprintln!("configuration stopped: {:?}", outcome.failure);
//!     }
//!
//!     driver.finish().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`Session`] spawns a program on a PTY and offers send/expect primitives.
//!   It implements [`Transport`], the seam the driver is generic over.
//! - [`Menu`] turns a captured screen into a label to selector table.
//! - [`PytoolDriver`] selects options by label and runs the workflows.
//!
//! The session layer is usable on its own:
//!
//! ```rust,no_run
//! use portcfg::{Pattern, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::spawn("sh", &["-c", "read x; echo got $x"])?;
//! session.send_line("hello").await?;
//! session.expect(Pattern::regex(r"got \w+")?).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod buffer;
pub mod config;
pub mod driver;
mod menu;
mod pattern;
mod result;
mod session;

// Public API exports
pub use driver::protocol::{Label, Prompt};
pub use driver::{
    needs_destination, DriverError, ImtToggle, PortConfigRequest, PortMappingRequest, PortType,
    PytoolDriver, ToolCommand, WorkflowOutcome,
};
pub use menu::{Menu, REJECTED_CHOICE_MARKER};
pub use pattern::Pattern;
pub use result::{ExpectError, MatchResult, PatternError};
pub use session::{Session, SessionBuilder, Transport};

// Re-export commonly used types
pub use portable_pty::ExitStatus;
