//! Pose and velocity types.
//!
//! Coordinate frame follows ROS REP-103:
//! - X-forward, Y-left, Z-up (right-handed)
//! - Counter-clockwise positive rotation

use serde::{Deserialize, Serialize};

use super::math::normalize_angle;
use super::point::Point2D;

/// A 2D pose representing position and orientation.
///
/// All poses handled by the avoidance core are expressed in the robot base
/// frame at the current instant, so the identity pose is "where the robot is now".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Heading angle in radians [-π, π), CCW positive from X-axis.
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose. `theta` is normalized to [-π, π).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Create an identity pose (origin, facing forward).
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Pure rotation about the origin.
    #[inline]
    pub fn rotation(theta: f32) -> Self {
        Self::new(0.0, 0.0, theta)
    }

    /// Get the position as a Point2D.
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Transform a point from this pose's local frame to the parent frame.
    #[inline]
    pub fn transform_point(self, point: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        Point2D {
            x: self.x + point.x * cos - point.y * sin,
            y: self.y + point.x * sin + point.y * cos,
        }
    }

    /// Transform every vertex of a local-frame outline into the parent frame.
    pub fn transform_outline(self, outline: &[Point2D]) -> Vec<Point2D> {
        outline.iter().map(|&p| self.transform_point(p)).collect()
    }
}

/// Velocity command for a differential-drive base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    /// Forward speed (m/s)
    pub linear: f32,
    /// Yaw rate (rad/s), CCW positive
    pub angular: f32,
}

impl Twist {
    /// Create a new twist.
    #[inline]
    pub const fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// The stop command.
    pub const ZERO: Twist = Twist {
        linear: 0.0,
        angular: 0.0,
    };

    /// Same forward speed with a different yaw rate.
    #[inline]
    pub fn with_angular(self, angular: f32) -> Self {
        Self {
            linear: self.linear,
            angular,
        }
    }

    /// Check if this is the stop command.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }

    /// Pose reached after holding this twist for `horizon` seconds.
    ///
    /// Unicycle model starting at the identity pose:
    /// - straight line when `angular == 0`: `(v·T, 0, 0)`
    /// - otherwise an arc of radius `d = v/ω`:
    ///   `(d·sin(ωT), d·(1 − cos(ωT)), ωT)`
    pub fn predict(self, horizon: f32) -> Pose2D {
        if self.angular == 0.0 {
            Pose2D::new(self.linear * horizon, 0.0, 0.0)
        } else {
            let radius = self.linear / self.angular;
            let theta = self.angular * horizon;
            Pose2D::new(radius * theta.sin(), radius * (1.0 - theta.cos()), theta)
        }
    }
}
