//! Threads of the `raksha` binary.
//!
//! - Reader thread: stdin JSON lines → inbound channel
//! - Writer thread: outbound channel → stdout JSON lines
//! - Node loop (caller's thread): sole owner of the [`AvoidanceNode`]

mod reader;
mod writer;

pub use reader::ReaderThread;
pub use writer::WriterThread;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

use crate::error::Result;
use crate::node::AvoidanceNode;
use crate::shared::Publisher;
use crate::wire::{Inbound, Outbound};

/// Inbound queue depth; lidar frames are large, so keep it short.
const INBOUND_CAPACITY: usize = 32;
const OUTBOUND_CAPACITY: usize = 256;

/// How often the node loop checks the shutdown flag while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handles and channel ends of the I/O threads.
pub struct IoThreads {
    pub reader: JoinHandle<()>,
    pub writer: JoinHandle<()>,
    pub inbound: Receiver<Inbound>,
    pub outbound: Sender<Outbound>,
}

/// Spawn the stdin reader and stdout writer threads.
pub fn spawn_io_threads() -> Result<IoThreads> {
    let (inbound_tx, inbound_rx) = bounded::<Inbound>(INBOUND_CAPACITY);
    let (outbound_tx, outbound_rx) = bounded::<Outbound>(OUTBOUND_CAPACITY);

    let reader = thread::Builder::new()
        .name("reader".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            ReaderThread::new(stdin.lock(), inbound_tx).run();
        })?;

    let writer = thread::Builder::new()
        .name("writer".into())
        .spawn(move || {
            let stdout = std::io::stdout();
            if let Err(e) = WriterThread::new(stdout.lock(), outbound_rx).run() {
                tracing::error!("Writer thread error: {}", e);
            }
        })?;

    Ok(IoThreads {
        reader,
        writer,
        inbound: inbound_rx,
        outbound: outbound_tx,
    })
}

/// Dispatch inbound messages until input closes or `running` is cleared.
///
/// Returns the number of messages handled.
pub fn run_node_loop<P: Publisher<Outbound>>(
    node: &mut AvoidanceNode<P>,
    inbound: &Receiver<Inbound>,
    running: &Arc<AtomicBool>,
) -> u64 {
    tracing::info!("Node loop started");

    let mut handled = 0;
    while running.load(Ordering::Relaxed) {
        match inbound.recv_timeout(POLL_INTERVAL) {
            Ok(message) => {
                node.handle(message, Instant::now());
                handled += 1;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("Inbound channel closed, node loop exiting");
                break;
            }
        }
    }

    handled
}
