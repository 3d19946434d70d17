//! Session management for PTY-based process automation

mod builder;
mod spawn;

pub use builder::SessionBuilder;

use crate::buffer::BufferManager;
use crate::pattern::Pattern;
use crate::result::{ExpectError, MatchResult};
use portable_pty::{Child, ChildKiller, ExitStatus, MasterPty};
use std::ffi::OsStr;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

/// How often `wait` checks whether the process has exited.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The send/expect primitives the menu driver is built on.
///
/// Every `send_line` must be followed by exactly one `await_pattern` that
/// consumes the response before the next send. [`Session`] is the production
/// implementation; tests drive the workflows through a simulated tool.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Write `line` followed by a line terminator. Does not wait for output.
    async fn send_line(&mut self, line: &str) -> Result<(), ExpectError>;

    /// Block until `pattern` appears in output that arrived since the
    /// previous match, the timeout elapses, or the stream closes.
    async fn await_pattern(&mut self, pattern: Pattern) -> Result<MatchResult, ExpectError>;
}

/// Main session for interacting with a spawned process.
///
/// A `Session` represents a running process with an attached PTY. Output is
/// pumped by a background thread into a channel and accumulated in a bounded
/// buffer until a pattern consumes it.
///
/// # Examples
///
/// ```no_run
/// use portcfg::{Pattern, Session};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::builder()
///     .timeout(Duration::from_secs(30))
///     .spawn("python3", &["config.py"])?;
///
/// session.expect(Pattern::exact("==>")).await?;
/// session.send_line("1").await?;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    _master: Box<dyn MasterPty + Send>,
    child: Option<Box<dyn Child + Send + Sync>>,
    output: UnboundedReceiver<Vec<u8>>,
    master_writer: Arc<Mutex<Box<dyn Write + Send>>>,
    buffer: BufferManager,
    timeout: Option<Duration>,
    eof_reached: bool,
}

impl Session {
    /// Create a new session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Spawn a program and return a session with default options.
    ///
    /// This is a shorthand for `Session::builder().spawn(program, args)`.
    pub fn spawn<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<Self, ExpectError> {
        SessionBuilder::new().spawn(program, args)
    }

    /// Wait for a pattern to appear in the output.
    ///
    /// On success the buffer is consumed through the end of the match, so the
    /// next call only sees output that arrived afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Timeout occurs before the pattern matches
    /// - EOF is reached before the pattern matches
    /// - The pattern is an empty exact string
    pub async fn expect(&mut self, pattern: Pattern) -> Result<MatchResult, ExpectError> {
        let matcher = pattern.to_matcher()?;
        let start_time = Instant::now();

        loop {
            if let Some(m) = matcher.find(self.buffer.pending()) {
                let (before, matched) = self.buffer.consume(m.start, m.end);
                log::trace!("matched {} after {} bytes", pattern, before.len());
                return Ok(MatchResult {
                    matched,
                    before,
                    captures: m.captures,
                });
            }

            if self.eof_reached {
                return Err(ExpectError::Eof {
                    before: self.buffer.pending_lossy(),
                });
            }

            let chunk = match self.timeout {
                Some(timeout) => {
                    let remaining = timeout.saturating_sub(start_time.elapsed());
                    match tokio::time::timeout(remaining, self.output.recv()).await {
                        Ok(chunk) => chunk,
                        Err(_) => {
                            return Err(ExpectError::Timeout {
                                duration: timeout,
                                before: self.buffer.pending_lossy(),
                            });
                        }
                    }
                }
                None => self.output.recv().await,
            };

            match chunk {
                Some(data) => {
                    self.buffer.append(&data);
                    log::debug!(
                        "<< {} ({} bytes pending)",
                        String::from_utf8_lossy(&data),
                        self.buffer.len()
                    );
                }
                None => self.eof_reached = true,
            }
        }
    }

    /// Send raw bytes to the process and flush them.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), ExpectError> {
        let writer = self.master_writer.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut writer = writer.blocking_lock();
            writer.write_all(&data)?;
            writer.flush()
        })
        .await
        .map_err(|e| ExpectError::IoError(std::io::Error::other(e)))??;

        Ok(())
    }

    /// Send a line to the process (appends newline).
    pub async fn send_line(&mut self, line: &str) -> Result<(), ExpectError> {
        log::debug!(">> {}", line);
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.send(&data).await
    }

    /// Wait for the process to exit and return its exit status.
    ///
    /// The wait is bounded by the session timeout. A process still running
    /// when it elapses is killed.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::Timeout`] if the process outlived the timeout,
    /// or [`ExpectError::ProcessExited`] if it was already reaped by a
    /// previous call.
    pub async fn wait(&mut self) -> Result<ExitStatus, ExpectError> {
        let start_time = Instant::now();

        loop {
            let child = self.child.as_mut().ok_or(ExpectError::ProcessExited)?;
            if let Some(status) = child.try_wait()? {
                self.child = None;
                return Ok(status);
            }

            if let Some(timeout) = self.timeout {
                if start_time.elapsed() >= timeout {
                    log::warn!("process still running after {:?}, killing it", timeout);
                    child.kill()?;
                    return Err(ExpectError::Timeout {
                        duration: timeout,
                        before: self.buffer.pending_lossy(),
                    });
                }
            }

            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        }
    }
}

impl Transport for Session {
    async fn send_line(&mut self, line: &str) -> Result<(), ExpectError> {
        Session::send_line(self, line).await
    }

    async fn await_pattern(&mut self, pattern: Pattern) -> Result<MatchResult, ExpectError> {
        self.expect(pattern).await
    }
}
