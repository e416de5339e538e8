//! Lidar mounting calibration.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

/// Fixed mounting offset of a lidar relative to the robot base frame.
///
/// `reverse` marks a sensor mounted upside down, whose angles run clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LidarExtrinsics {
    /// Mount X offset (meters)
    #[serde(default)]
    pub x: f32,
    /// Mount Y offset (meters)
    #[serde(default)]
    pub y: f32,
    /// Mount yaw (radians)
    #[serde(default)]
    pub theta: f32,
    /// Mirror the angle axis
    #[serde(default)]
    pub reverse: bool,
}

impl LidarExtrinsics {
    pub fn new(x: f32, y: f32, theta: f32, reverse: bool) -> Self {
        Self {
            x,
            y,
            theta,
            reverse,
        }
    }

    /// Convert one polar reading to a robot-frame point.
    #[inline]
    pub fn transform(&self, angle: f32, distance: f32) -> Point2D {
        let a = if self.reverse { -angle } else { angle };
        let (sin_a, cos_a) = a.sin_cos();
        let local_x = distance * cos_a;
        let local_y = distance * sin_a;

        let (sin_t, cos_t) = self.theta.sin_cos();
        Point2D::new(
            self.x + local_x * cos_t - local_y * sin_t,
            self.y + local_x * sin_t + local_y * cos_t,
        )
    }
}
