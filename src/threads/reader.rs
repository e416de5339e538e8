//! Inbound side of the bridge: JSON lines to [`Inbound`] messages.

use std::io::BufRead;

use crossbeam_channel::Sender;

use crate::wire::{Inbound, decode_line};

/// Reads JSON lines and forwards decoded messages to the node loop.
pub struct ReaderThread<R> {
    input: R,
    tx: Sender<Inbound>,
    forwarded: u64,
    skipped: u64,
}

impl<R: BufRead> ReaderThread<R> {
    pub fn new(input: R, tx: Sender<Inbound>) -> Self {
        Self {
            input,
            tx,
            forwarded: 0,
            skipped: 0,
        }
    }

    /// Run until end of input or until the node loop goes away.
    ///
    /// Returns `(forwarded, skipped)` line counts.
    pub fn run(mut self) -> (u64, u64) {
        tracing::info!("Reader thread started");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.input.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    tracing::info!("Input closed");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Input read failed: {}", e);
                    break;
                }
            }
            // read_until has consumed the line either way
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!("Skipping line with invalid UTF-8: {}", e);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match decode_line(line) {
                Ok(message) => {
                    if self.tx.send(message).is_err() {
                        tracing::warn!("Node loop gone, reader thread exiting");
                        break;
                    }
                    self.forwarded += 1;
                }
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!("Skipping malformed line: {}", e);
                }
            }
        }

        tracing::info!(
            "Reader thread finished: {} forwarded, {} skipped",
            self.forwarded,
            self.skipped
        );
        (self.forwarded, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    #[test]
    fn test_malformed_lines_skipped() {
        let input = concat!(
            "{\"type\":\"twist\",\"topic\":\"cmdvel_in\",\"linear\":0.1,\"angular\":0.0}\n",
            "garbage\n",
            "\n",
            "{\"type\":\"lidar\",\"topic\":\"scan\",\"angles\":[0.0],\"distances\":[1.0]}\n",
        );
        let (tx, rx) = unbounded();
        let (forwarded, skipped) = ReaderThread::new(Cursor::new(input), tx).run();

        assert_eq!((forwarded, skipped), (2, 1));
        let messages: Vec<_> = rx.try_iter().collect();
        assert!(matches!(messages[0], Inbound::Twist { .. }));
        assert!(matches!(messages[1], Inbound::Lidar { .. }));
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(b"{\"type\":\"twist\",\"topic\":\"cmdvel_in\",\"linear\":0.2,\"angular\":0.0}\n");
        let (tx, rx) = unbounded();
        let (forwarded, skipped) = ReaderThread::new(Cursor::new(input), tx).run();

        assert_eq!((forwarded, skipped), (1, 1));
        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], Inbound::Twist { .. }));
    }

    #[test]
    fn test_stops_when_receiver_dropped() {
        let input = "{\"type\":\"twist\",\"topic\":\"a\",\"linear\":0.1,\"angular\":0.0}\n".repeat(3);
        let (tx, rx) = unbounded();
        drop(rx);
        assert_eq!(ReaderThread::new(Cursor::new(input), tx).run(), (0, 0));
    }
}
