//! Process spawning utilities

use std::io::Read;
use std::thread;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// Forward everything the child writes to the PTY into an async channel.
///
/// The channel closes when the child's side of the PTY goes away. On Linux
/// that surfaces as `EIO` rather than a zero-length read, so any
/// non-recoverable read error is treated as end of stream.
pub fn spawn_reader(mut reader: Box<dyn Read + Send>) -> UnboundedReceiver<Vec<u8>> {
    let (tx, rx) = unbounded_channel();

    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    log::debug!("PTY read EOF");
                    break;
                }
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        log::debug!("PTY output receiver dropped, stopping reader");
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::debug!("PTY read ended: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_reader_forwards_then_closes() {
        let mut rx = spawn_reader(Box::new(Cursor::new(b"1) Modify MTU\r\n==>".to_vec())));

        let mut collected = Vec::new();
        while let Some(chunk) = rx.recv().await {
            collected.extend_from_slice(&chunk);
        }
        assert_eq!(collected, b"1) Modify MTU\r\n==>");
    }
}
