//! Launching the tool and tearing it down

use crate::driver::error::DriverError;
use crate::driver::protocol::Prompt;
use crate::driver::PytoolDriver;
use crate::result::ExpectError;
use crate::session::{Session, Transport};
use portable_pty::ExitStatus;
use std::path::Path;
use std::time::Duration;

/// Location of the tool's entry script under the LEK path.
const PYTOOL_SCRIPT: &str = "cli/pytool/management_config/config.py";

/// Program and arguments that start the configuration tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable to spawn
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Command for an arbitrary executable.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `<interpreter> <lek_path>/cli/pytool/management_config/config.py --lekpath <lek_path> --bitstream <bitstream>`
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::ToolCommand;
    ///
    /// let command = ToolCommand::pytool("python3", "/opt/lek/", "1");
    /// assert_eq!(command.program, "python3");
    /// assert_eq!(command.args[0], "/opt/lek/cli/pytool/management_config/config.py");
    /// ```
    pub fn pytool(interpreter: &str, lek_path: &str, bitstream: &str) -> Self {
        let script = Path::new(lek_path).join(PYTOOL_SCRIPT);
        Self::new(
            interpreter,
            [
                script.to_string_lossy().into_owned(),
                "--lekpath".to_string(),
                lek_path.to_string(),
                "--bitstream".to_string(),
                bitstream.to_string(),
            ],
        )
    }
}

impl<T: Transport> PytoolDriver<T> {
    /// Wrap a transport whose tool is starting up.
    ///
    /// Waits for the top-level prompt and returns the driver together with
    /// the startup screen, which is the input to the first workflow.
    ///
    /// # Errors
    ///
    /// [`DriverError::LaunchFailure`] when the tool exits first,
    /// [`DriverError::LaunchTimeout`] when the prompt never shows up. Both
    /// carry the output seen so far.
    pub async fn attach(mut transport: T) -> Result<(Self, String), DriverError> {
        let ready = transport
            .await_pattern(Prompt::TopLevel.pattern())
            .await
            .map_err(DriverError::launching)?;

        log::info!("configuration tool ready");
        Ok((Self { transport }, ready.before))
    }
}

impl PytoolDriver<Session> {
    /// Spawn the tool and wait until it is ready.
    pub async fn launch(command: &ToolCommand, timeout: Duration) -> Result<(Self, String), DriverError> {
        log::info!("launching {} {}", command.program, command.args.join(" "));

        let session = Session::builder()
            .timeout(timeout)
            .spawn(&command.program, command.args.as_slice())
            .map_err(|e| match e {
                ExpectError::SpawnError(reason) => DriverError::LaunchFailure { output: reason },
                other => DriverError::Transport(other),
            })?;

        Self::attach(session).await
    }

    /// Reap the tool after it has been told to quit.
    ///
    /// # Errors
    ///
    /// [`DriverError::ExitTimeout`] when the tool outlives the session
    /// timeout. The tool is killed in that case.
    pub async fn finish(mut self) -> Result<ExitStatus, DriverError> {
        let status = self.transport.wait().await.map_err(|e| match e {
            ExpectError::Timeout { duration, .. } => DriverError::ExitTimeout { duration },
            other => DriverError::Transport(other),
        })?;
        log::debug!("tool exited with {}", status.exit_code());
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::sim::SimulatedTool;
    use crate::menu::Menu;

    #[test]
    fn test_pytool_command_without_trailing_slash() {
        let command = ToolCommand::pytool("python3", "/opt/lek", "2");
        assert_eq!(
            command.args,
            [
                "/opt/lek/cli/pytool/management_config/config.py",
                "--lekpath",
                "/opt/lek",
                "--bitstream",
                "2"
            ]
        );
    }

    #[tokio::test]
    async fn test_attach_returns_startup_menu() {
        let (driver, screen) = PytoolDriver::attach(SimulatedTool::new()).await.unwrap();

        let menu = Menu::parse(&screen);
        assert_eq!(menu.selector("Configure Host Port"), Some("1"));
        assert!(driver.transport().sends().is_empty());
    }

    #[tokio::test]
    async fn test_attach_reports_early_exit() {
        let tool = SimulatedTool::crashing("Traceback: bitstream 9 not found\r\n");

        let err = PytoolDriver::attach(tool).await.err().unwrap();

        assert!(matches!(
            err,
            DriverError::LaunchFailure { ref output } if output.contains("bitstream 9")
        ));
    }

    #[tokio::test]
    async fn test_attach_reports_missing_prompt() {
        let tool = SimulatedTool::hanging("Loading...\r\n");

        let err = PytoolDriver::attach(tool).await.err().unwrap();

        assert!(matches!(err, DriverError::LaunchTimeout { ref output, .. } if output == "Loading...\r\n"));
    }
}
