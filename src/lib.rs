//! Raksha - reactive obstacle avoidance for VacuumTiger
//!
//! Fuses lidar frames into robot-frame obstacles and gates commanded
//! velocities so the robot never drives into a predicted collision.
//!
//! ## Pipeline
//!
//! ```text
//! lidar frames ──► LidarFrameAggregator ──► cluster ──► convex_hull ──► ObstacleBoard
//!                                                                           │
//! command twist ──────────────────────────► VelocityArbiter ◄───────────────┘
//!                                                  │
//!                                           TwistGatekeeper ──► output twist
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Points, poses, twists and angle helpers
//! - [`geometry`]: Convex hull and collision tests
//! - [`perception`]: Extrinsics, angle filter, fusion, clustering, detector
//! - [`avoidance`]: Arbiter, gatekeeper, fault monitor
//! - [`node`]: Message dispatch over the JSON-lines bridge

pub mod avoidance;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod node;
pub mod obstacle;
pub mod perception;
pub mod shared;
pub mod threads;
pub mod wire;

pub use avoidance::{GateDecision, GateMode, TwistGatekeeper, VelocityArbiter};
pub use config::RakshaConfig;
pub use core::{Point2D, Pose2D, Twist};
pub use error::{Fault, FaultEvent, RakshaError, Result};
pub use node::AvoidanceNode;
pub use obstacle::{CollisionChecker, Obstacle, ObstacleSet};
pub use perception::{LidarFrame, ObstacleDetector};
pub use shared::{ObstacleBoard, ObstacleProvider, Publisher};
