//! Raksha - obstacle avoidance node for VacuumTiger
//!
//! Reads lidar frames and command twists as JSON lines on stdin and writes
//! gated twists (plus faults and, optionally, obstacles) as JSON lines on
//! stdout. Logs go to stderr.
//!
//! ## Threads
//!
//! - **Reader**: stdin → inbound channel
//! - **Node loop** (main thread): fusion, clustering, arbitration, gating
//! - **Writer**: outbound channel → stdout

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::{error, info};

use raksha::threads::{run_node_loop, spawn_io_threads};
use raksha::{AvoidanceNode, RakshaConfig, Result};

#[derive(Parser, Debug)]
#[command(name = "raksha", version, about = "Reactive obstacle avoidance node")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not publish fused points and obstacle sets on stdout
    #[arg(long)]
    no_obstacles: bool,
}

fn load_config(args: &Args) -> Result<RakshaConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            RakshaConfig::load(path)?
        }
        None if Path::new("raksha.toml").exists() => {
            info!("Loading configuration from raksha.toml");
            RakshaConfig::load(Path::new("raksha.toml"))?
        }
        None => {
            info!("Using default configuration");
            RakshaConfig::default()
        }
    };

    if args.no_obstacles {
        config.topics.publish_obstacles = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Logs on stderr; stdout carries data
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("raksha=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    info!("Raksha v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Lidar sources: {}",
        config
            .perception
            .lidars
            .iter()
            .map(|s| s.topic.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!(
        "Gate: {} -> {} (stop->run {}, run->stop {}, watchdog {}ms, smart {})",
        config.topics.cmd_vel_in,
        config.topics.cmd_vel_out,
        config.gatekeeper.stop_to_run_count,
        config.gatekeeper.run_to_stop_count,
        config.gatekeeper.sensor_timeout_ms,
        config.gatekeeper.smart_choice
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(std::io::Error::other)?;

    let io = spawn_io_threads()?;
    let mut node = AvoidanceNode::new(&config, io.outbound);

    let handled = run_node_loop(&mut node, &io.inbound, &running);
    info!("Handled {} messages", handled);

    node.shutdown();
    // Dropping the node closes the outbound channel and lets the writer finish
    drop(node);
    if let Err(e) = io.writer.join() {
        error!("Writer thread panicked: {:?}", e);
    }
    // The reader may still be blocked on stdin; it is not joined.
    drop(io.reader);

    info!("Raksha finished");
    Ok(())
}
