//! Obstacle detection pipeline.
//!
//! lidar frames → aggregator → clustering → hulls → published [`ObstacleSet`].

use std::sync::Arc;
use std::time::Instant;

use super::aggregator::{Ingest, LidarFrame, LidarFrameAggregator};
use super::cluster::{ClusterConfig, Clusters, cluster};
use crate::core::Point2D;
use crate::geometry::convex_hull;
use crate::obstacle::{Obstacle, ObstacleSet};
use crate::shared::ObstacleBoard;

/// Output of one merge cycle.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Fused robot-frame points, before clustering
    pub points: Vec<Point2D>,
    /// The set that was just published to the board
    pub obstacles: Arc<ObstacleSet>,
}

/// Turn clustering output into obstacles.
///
/// Groups of three or more points become hull polygons; smaller groups and
/// noise become discrete point obstacles. Groups come first, then noise.
pub fn build_obstacles(clusters: &Clusters) -> ObstacleSet {
    let mut obstacles = Vec::with_capacity(clusters.groups.len() + clusters.noise.len());

    for group in &clusters.groups {
        if group.len() >= 3 {
            obstacles.push(Obstacle::polygon(convex_hull(group)));
        } else {
            obstacles.extend(group.iter().copied().map(Obstacle::point));
        }
    }
    obstacles.extend(clusters.noise.iter().copied().map(Obstacle::point));

    ObstacleSet::new(obstacles)
}

/// Owner of the perception side. Sole writer of the [`ObstacleBoard`].
pub struct ObstacleDetector {
    aggregator: LidarFrameAggregator,
    cluster_config: ClusterConfig,
    board: ObstacleBoard,
    cycles: u64,
}

impl ObstacleDetector {
    pub fn new(
        aggregator: LidarFrameAggregator,
        cluster_config: ClusterConfig,
        board: ObstacleBoard,
    ) -> Self {
        Self {
            aggregator,
            cluster_config,
            board,
            cycles: 0,
        }
    }

    /// Board readers can subscribe to.
    pub fn board(&self) -> &ObstacleBoard {
        &self.board
    }

    pub fn aggregator(&self) -> &LidarFrameAggregator {
        &self.aggregator
    }

    /// Number of merge cycles completed.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Feed one frame; runs a merge cycle when every source is fresh.
    pub fn on_frame(&mut self, topic: &str, frame: LidarFrame, now: Instant) -> Option<Detection> {
        let Ingest::Merged(points) = self.aggregator.ingest(topic, frame, now) else {
            return None;
        };

        let clusters = cluster(&points, &self.cluster_config);
        let obstacles = build_obstacles(&clusters);
        self.cycles += 1;

        tracing::trace!(
            "Merge cycle {}: {} points, {} groups, {} noise",
            self.cycles,
            points.len(),
            clusters.groups.len(),
            clusters.noise.len()
        );

        let obstacles = self.board.publish(obstacles, now);

        Some(Detection { points, obstacles })
    }
}
