//! Outbound side of the bridge: [`Outbound`] messages to JSON lines.

use std::io::Write;

use crossbeam_channel::Receiver;

use crate::error::Result;
use crate::wire::{Outbound, encode};

/// Writes every published message as one JSON line.
pub struct WriterThread<W> {
    output: W,
    rx: Receiver<Outbound>,
}

impl<W: Write> WriterThread<W> {
    pub fn new(output: W, rx: Receiver<Outbound>) -> Self {
        Self { output, rx }
    }

    /// Run until every publisher is dropped. Returns the number of lines written.
    pub fn run(mut self) -> Result<u64> {
        tracing::info!("Writer thread started");

        let mut written = 0;
        for message in self.rx.iter() {
            let line = encode(&message)?;
            writeln!(self.output, "{}", line)?;
            self.output.flush()?;
            written += 1;
        }

        tracing::info!("Writer thread finished: {} lines", written);
        Ok(written)
    }
}
