//! Test utilities for Raksha integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use raksha::avoidance::ArbiterConfig;
use raksha::perception::{ClusterConfig, LidarExtrinsics, LidarFrameAggregator, LidarSource};
use raksha::{ObstacleBoard, ObstacleDetector, Point2D};

/// 0.4 x 0.4 square footprint centered on the robot.
pub fn square_outline() -> Vec<Point2D> {
    vec![
        Point2D::new(0.2, 0.2),
        Point2D::new(0.2, -0.2),
        Point2D::new(-0.2, -0.2),
        Point2D::new(-0.2, 0.2),
    ]
}

pub fn square_arbiter_config() -> ArbiterConfig {
    ArbiterConfig {
        outline: square_outline(),
        prediction_time: 0.3,
        delta_omega: 0.05,
        delta_number: 3,
        ..ArbiterConfig::default()
    }
}

/// Detector with a single lidar `scan` in frame `laser` at the robot center.
pub fn single_lidar_detector(board: ObstacleBoard) -> ObstacleDetector {
    let extrinsics = HashMap::from([("laser".to_string(), LidarExtrinsics::default())]);
    let aggregator = LidarFrameAggregator::new(
        vec![LidarSource::new("scan", "laser")],
        extrinsics,
        Duration::from_millis(50),
    );
    ObstacleDetector::new(aggregator, ClusterConfig::default(), board)
}

/// JSON line for a lidar frame on `scan`.
pub fn lidar_line(angles: &[f32], distances: &[f32]) -> String {
    serde_json::json!({
        "type": "lidar",
        "topic": "scan",
        "frame_id": "laser",
        "angles": angles,
        "distances": distances,
    })
    .to_string()
}

/// JSON line for a command twist on `cmdvel_in`.
pub fn twist_line(linear: f32, angular: f32) -> String {
    serde_json::json!({
        "type": "twist",
        "topic": "cmdvel_in",
        "linear": linear,
        "angular": angular,
    })
    .to_string()
}
