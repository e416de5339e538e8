//! Configuration loading for Raksha

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::avoidance::{ArbiterConfig, GatekeeperConfig};
use crate::error::{RakshaError, Result};
use crate::geometry::ring_vertices;
use crate::perception::{ClusterConfig, LidarExtrinsics, LidarSource};

/// Main configuration structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RakshaConfig {
    #[serde(default)]
    pub perception: PerceptionConfig,

    /// Mounting calibration per lidar frame id
    #[serde(default = "default_extrinsics")]
    pub extrinsics: HashMap<String, LidarExtrinsics>,

    #[serde(default)]
    pub avoidance: ArbiterConfig,

    #[serde(default)]
    pub gatekeeper: GatekeeperConfig,

    #[serde(default)]
    pub topics: TopicConfig,
}

/// Lidar fusion and clustering settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptionConfig {
    /// Maximum age of any source frame for a merge cycle (ms)
    #[serde(default = "default_fusion_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Declared lidar sources, merged in this order
    #[serde(default = "default_lidars")]
    pub lidars: Vec<LidarSource>,
}

/// Topic names on the message bridge
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Commanded velocity input (default: cmdvel_in)
    #[serde(default = "default_cmd_vel_in")]
    pub cmd_vel_in: String,

    /// Gated velocity output (default: cmdvel)
    #[serde(default = "default_cmd_vel_out")]
    pub cmd_vel_out: String,

    /// Raw fused points (default: obstacle_points)
    #[serde(default = "default_obstacle_points")]
    pub obstacle_points: String,

    /// Obstacle set (default: obstacles)
    #[serde(default = "default_obstacles")]
    pub obstacles: String,

    /// Emit obstacle points and sets on the bridge (default: true)
    #[serde(default = "default_publish_obstacles")]
    pub publish_obstacles: bool,
}

// Default value functions
fn default_fusion_timeout_ms() -> u64 {
    50
}
fn default_lidars() -> Vec<LidarSource> {
    vec![LidarSource::new("scan", "laser")]
}
fn default_extrinsics() -> HashMap<String, LidarExtrinsics> {
    HashMap::from([("laser".to_string(), LidarExtrinsics::default())])
}
fn default_cmd_vel_in() -> String {
    "cmdvel_in".to_string()
}
fn default_cmd_vel_out() -> String {
    "cmdvel".to_string()
}
fn default_obstacle_points() -> String {
    "obstacle_points".to_string()
}
fn default_obstacles() -> String {
    "obstacles".to_string()
}
fn default_publish_obstacles() -> bool {
    true
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_fusion_timeout_ms(),
            cluster: ClusterConfig::default(),
            lidars: default_lidars(),
        }
    }
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            cmd_vel_in: default_cmd_vel_in(),
            cmd_vel_out: default_cmd_vel_out(),
            obstacle_points: default_obstacle_points(),
            obstacles: default_obstacles(),
            publish_obstacles: default_publish_obstacles(),
        }
    }
}

impl Default for RakshaConfig {
    fn default() -> Self {
        Self {
            perception: PerceptionConfig::default(),
            extrinsics: default_extrinsics(),
            avoidance: ArbiterConfig::default(),
            gatekeeper: GatekeeperConfig::default(),
            topics: TopicConfig::default(),
        }
    }
}

impl PerceptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn invalid(message: impl Into<String>) -> RakshaError {
    RakshaError::Config(message.into())
}

impl RakshaConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RakshaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let avoidance = &self.avoidance;
        if avoidance.prediction_time <= 0.0 {
            return Err(invalid("avoidance.prediction_time must be positive"));
        }
        if avoidance.delta_omega <= 0.0 {
            return Err(invalid("avoidance.delta_omega must be positive"));
        }
        if avoidance.delta_rotation <= 0.0 {
            return Err(invalid("avoidance.delta_rotation must be positive"));
        }
        if avoidance.smart_delta_omega <= 0.0 {
            return Err(invalid("avoidance.smart_delta_omega must be positive"));
        }
        if avoidance.smart_min_omega > avoidance.smart_max_omega {
            return Err(invalid("avoidance.smart_min_omega exceeds smart_max_omega"));
        }
        if ring_vertices(&avoidance.outline).len() < 3 {
            return Err(invalid("avoidance.outline needs at least 3 vertices"));
        }
        if let Some(probe) = &avoidance.probe_outline
            && ring_vertices(probe).len() < 3
        {
            return Err(invalid("avoidance.probe_outline needs at least 3 vertices"));
        }

        let cluster = &self.perception.cluster;
        if cluster.max_distance <= 0.0 {
            return Err(invalid("perception.cluster.max_distance must be positive"));
        }
        if cluster.max_points == 0 {
            return Err(invalid("perception.cluster.max_points must be at least 1"));
        }

        if self.perception.lidars.is_empty() {
            return Err(invalid("perception.lidars must declare at least one source"));
        }
        for source in &self.perception.lidars {
            if !self.extrinsics.contains_key(&source.frame_id) {
                return Err(invalid(format!(
                    "lidar {} uses frame {:?} with no extrinsics entry",
                    source.topic, source.frame_id
                )));
            }
        }
        Ok(())
    }
}
