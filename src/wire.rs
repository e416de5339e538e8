//! Line-delimited JSON message bridge.
//!
//! One JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"lidar","topic":"scan","frame_id":"laser","angles":[0.0],"distances":[1.0]}
//! {"type":"twist","topic":"cmdvel_in","linear":0.2,"angular":0.0}
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Twist};
use crate::error::{FaultEvent, Result};
use crate::obstacle::ObstacleSet;
use crate::perception::LidarFrame;

/// Message read from the bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    Lidar {
        topic: String,
        /// Falls back to the source's declared frame when absent
        #[serde(default)]
        frame_id: Option<String>,
        angles: Vec<f32>,
        distances: Vec<f32>,
    },
    Twist {
        topic: String,
        linear: f32,
        angular: f32,
    },
}

/// Fault transition kind on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    Occurred,
    Recovered,
}

/// Message written to the bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Twist {
        topic: String,
        linear: f32,
        angular: f32,
    },
    ObstaclePoints {
        topic: String,
        points: Vec<Point2D>,
    },
    Obstacles {
        topic: String,
        obstacles: ObstacleSet,
    },
    Fault {
        event: FaultKind,
        what: String,
        message: String,
    },
}

impl Inbound {
    /// Split a lidar message into its topic and frame.
    ///
    /// `default_frame` is used when the message does not name one.
    pub fn into_lidar_frame(self, default_frame: impl FnOnce(&str) -> Option<String>) -> Option<(String, LidarFrame)> {
        match self {
            Inbound::Lidar {
                topic,
                frame_id,
                angles,
                distances,
            } => {
                let frame_id = frame_id.or_else(|| default_frame(&topic)).unwrap_or_default();
                Some((topic, LidarFrame::new(frame_id, angles, distances)))
            }
            Inbound::Twist { .. } => None,
        }
    }
}

impl Outbound {
    pub fn twist(topic: &str, twist: Twist) -> Self {
        Outbound::Twist {
            topic: topic.to_string(),
            linear: twist.linear,
            angular: twist.angular,
        }
    }

    pub fn fault(event: &FaultEvent) -> Self {
        let (kind, fault) = match event {
            FaultEvent::Occurred(f) => (FaultKind::Occurred, f),
            FaultEvent::Recovered(f) => (FaultKind::Recovered, f),
        };
        Outbound::Fault {
            event: kind,
            what: fault.what().to_string(),
            message: fault.to_string(),
        }
    }
}

/// Decode one inbound line.
pub fn decode_line(line: &str) -> Result<Inbound> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Encode one outbound message, without the trailing newline.
pub fn encode(message: &Outbound) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}
