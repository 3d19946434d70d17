//! Session builder for configuration

use crate::buffer::BufferManager;
use crate::result::ExpectError;
use crate::session::{spawn, Session};
use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default timeout for expect operations (in seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum buffer size (in bytes)
const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Default PTY rows
const DEFAULT_PTY_ROWS: u16 = 24;

/// Default PTY columns
const DEFAULT_PTY_COLS: u16 = 80;

/// Builder for configuring and spawning sessions.
///
/// # Defaults
///
/// - Timeout: 30 seconds
/// - Max buffer size: 64 KiB
/// - PTY size: 24 rows × 80 columns
///
/// # Examples
///
/// ```no_run
/// use portcfg::Session;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::builder()
///     .timeout(Duration::from_secs(60))
///     .pty_size(40, 120)
///     .spawn("python3", &["config.py", "--bitstream", "1"])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    timeout: Option<Duration>,
    max_buffer_size: usize,
    pty_size: PtySize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Create a new session builder with default configuration.
    pub fn new() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            pty_size: PtySize {
                rows: DEFAULT_PTY_ROWS,
                cols: DEFAULT_PTY_COLS,
                pixel_width: 0,
                pixel_height: 0,
            },
        }
    }

    /// Set the timeout for expect operations.
    ///
    /// If a pattern is not matched within this duration, `expect()` returns
    /// [`ExpectError::Timeout`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable timeout (wait until the pattern matches or the stream closes).
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set maximum buffer size in bytes.
    ///
    /// When unmatched output would exceed this size, the oldest third is
    /// discarded.
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    /// Set PTY (terminal) size.
    pub fn pty_size(mut self, rows: u16, cols: u16) -> Self {
        self.pty_size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        self
    }

    /// Spawn `program` with `args` and return a configured session.
    ///
    /// Arguments are passed through verbatim, so paths containing spaces
    /// need no quoting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The program name is empty
    /// - The PTY cannot be created
    /// - The process cannot be spawned
    pub fn spawn<S: AsRef<OsStr>>(self, program: &str, args: &[S]) -> Result<Session, ExpectError> {
        if program.trim().is_empty() {
            return Err(ExpectError::SpawnError("Empty command".to_string()));
        }

        let pty_system = native_pty_system();
        let pty_pair = pty_system
            .openpty(self.pty_size)
            .map_err(|e| ExpectError::PtyError(e.to_string()))?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);

        let child = pty_pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| ExpectError::SpawnError(e.to_string()))?;

        // Only the child may hold the slave end, otherwise its exit never
        // reaches the reader as end of stream.
        drop(pty_pair.slave);

        let reader = pty_pair
            .master
            .try_clone_reader()
            .map_err(|e| ExpectError::PtyError(e.to_string()))?;

        let writer = pty_pair
            .master
            .take_writer()
            .map_err(|e| ExpectError::PtyError(e.to_string()))?;

        log::debug!("spawned {} {:?}", program, cmd_display(args));

        Ok(Session {
            _master: pty_pair.master,
            child: Some(child),
            output: spawn::spawn_reader(reader),
            master_writer: Arc::new(Mutex::new(writer)),
            buffer: BufferManager::new(self.max_buffer_size),
            timeout: self.timeout,
            eof_reached: false,
        })
    }
}

fn cmd_display<S: AsRef<OsStr>>(args: &[S]) -> Vec<String> {
    args.iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect()
}
