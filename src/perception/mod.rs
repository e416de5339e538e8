//! Perception side: from raw lidar frames to a published obstacle set.
//!
//! - [`LidarExtrinsics`]: Per-sensor mounting calibration
//! - [`AngleFilter`]: Optional angular window per source
//! - [`LidarFrameAggregator`]: Multi-source fusion with freshness gating
//! - [`cluster`]: DBSCAN-style grouping
//! - [`ObstacleDetector`]: The pipeline, writer of the obstacle board

mod aggregator;
mod cluster;
mod detector;
mod extrinsics;
mod filter;

pub use aggregator::{Ingest, LidarFrame, LidarFrameAggregator, LidarSource};
pub use cluster::{ClusterConfig, Clusters, cluster};
pub use detector::{Detection, ObstacleDetector, build_obstacles};
pub use extrinsics::LidarExtrinsics;
pub use filter::AngleFilter;
