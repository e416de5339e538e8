//! Velocity arbitration by forward simulation.
//!
//! A candidate twist is held for `prediction_time`, the robot outline is
//! placed at the predicted pose, and the footprint is tested against the
//! current obstacles. Blocked candidates may be bent left or right by small
//! yaw-rate offsets before being rejected.

use serde::{Deserialize, Serialize};

use crate::core::math::complementary_rotation;
use crate::core::{Point2D, Pose2D, Twist};
use crate::obstacle::CollisionChecker;

/// Upper bound on poses sampled by a single sweep (smart yaw rates or a
/// rotation in place), whatever the configured step.
pub const MAX_SWEEP_SAMPLES: usize = 1024;

/// Which outline a check places at the predicted pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlineKind {
    /// The real robot footprint
    Real,
    /// The outline used by the dense smart sweep
    Probe,
}

/// Arbitration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// Robot footprint in the base frame
    #[serde(default = "default_outline")]
    pub outline: Vec<Point2D>,

    /// Outline for the smart sweep (defaults to `outline`)
    #[serde(default)]
    pub probe_outline: Option<Vec<Point2D>>,

    /// Forward simulation horizon (seconds)
    #[serde(default = "default_prediction_time")]
    pub prediction_time: f32,

    /// Yaw-rate offset step for the left/right search (rad/s)
    #[serde(default = "default_delta_omega")]
    pub delta_omega: f32,

    /// Offsets tried on each side
    #[serde(default = "default_delta_number")]
    pub delta_number: usize,

    /// Yaw sampling step for in-place rotation checks (radians)
    #[serde(default = "default_delta_rotation")]
    pub delta_rotation: f32,

    /// Smart sweep lower bound (rad/s)
    #[serde(default = "default_smart_min_omega")]
    pub smart_min_omega: f32,

    /// Smart sweep upper bound (rad/s)
    #[serde(default = "default_smart_max_omega")]
    pub smart_max_omega: f32,

    /// Smart sweep step (rad/s)
    #[serde(default = "default_smart_delta_omega")]
    pub smart_delta_omega: f32,
}

fn default_outline() -> Vec<Point2D> {
    vec![
        Point2D::new(0.4, 0.2),
        Point2D::new(0.4, -0.2),
        Point2D::new(-0.4, -0.2),
        Point2D::new(-0.4, 0.2),
    ]
}
fn default_prediction_time() -> f32 {
    0.3
}
fn default_delta_omega() -> f32 {
    0.05
}
fn default_delta_number() -> usize {
    3
}
fn default_delta_rotation() -> f32 {
    0.2
}
fn default_smart_min_omega() -> f32 {
    -1.0
}
fn default_smart_max_omega() -> f32 {
    1.0
}
fn default_smart_delta_omega() -> f32 {
    0.1
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            outline: default_outline(),
            probe_outline: None,
            prediction_time: default_prediction_time(),
            delta_omega: default_delta_omega(),
            delta_number: default_delta_number(),
            delta_rotation: default_delta_rotation(),
            smart_min_omega: default_smart_min_omega(),
            smart_max_omega: default_smart_max_omega(),
            smart_delta_omega: default_smart_delta_omega(),
        }
    }
}

/// Accepts, bends or rejects candidate twists.
#[derive(Clone, Debug)]
pub struct VelocityArbiter {
    config: ArbiterConfig,
}

impl VelocityArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    fn outline(&self, kind: OutlineKind) -> &[Point2D] {
        match kind {
            OutlineKind::Real => &self.config.outline,
            OutlineKind::Probe => self
                .config
                .probe_outline
                .as_deref()
                .unwrap_or(&self.config.outline),
        }
    }

    /// Outline placed at `pose`.
    pub fn footprint(&self, pose: Pose2D, kind: OutlineKind) -> Vec<Point2D> {
        pose.transform_outline(self.outline(kind))
    }

    /// True iff the footprint at `pose` is collision-free.
    pub fn pose_is_clear<C>(&self, pose: Pose2D, obstacles: &C, kind: OutlineKind) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        !obstacles.collides_with(&self.footprint(pose, kind))
    }

    /// True iff holding `twist` for the horizon keeps the footprint clear.
    pub fn is_clear<C>(&self, twist: Twist, obstacles: &C, kind: OutlineKind) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        self.pose_is_clear(twist.predict(self.config.prediction_time), obstacles, kind)
    }

    /// Accept `candidate`, or the first clear yaw-rate offset, or nothing.
    ///
    /// Offsets are tried alternately left then right, growing by
    /// `delta_omega` up to `delta_number` steps. Rotations in place
    /// (`linear == 0`) are never bent.
    pub fn arbitrate<C>(&self, candidate: Twist, obstacles: &C) -> Option<Twist>
    where
        C: CollisionChecker + ?Sized,
    {
        if self.is_clear(candidate, obstacles, OutlineKind::Real) {
            return Some(candidate);
        }
        if candidate.linear == 0.0 {
            return None;
        }

        (1..=self.config.delta_number)
            .flat_map(|i| {
                let offset = i as f32 * self.config.delta_omega;
                [candidate.angular + offset, candidate.angular - offset]
            })
            .map(|angular| candidate.with_angular(angular))
            .find(|&twist| self.is_clear(twist, obstacles, OutlineKind::Real))
    }

    /// Yaw rates visited by the smart sweep, inclusive of both bounds.
    fn smart_omegas(&self) -> impl Iterator<Item = f32> + '_ {
        let min = self.config.smart_min_omega;
        let step = self.config.smart_delta_omega;
        let span = (self.config.smart_max_omega - min) / step;
        // Index-based so accumulated rounding never drops the upper bound
        let count = if step > 0.0 && span >= 0.0 {
            ((span + 1e-4).floor() as usize).min(MAX_SWEEP_SAMPLES - 1) + 1
        } else {
            0
        };
        (0..count).map(move |i| min + i as f32 * step)
    }

    /// Sweep the whole yaw-rate window with the probe outline and take the
    /// middle of the clear rates. Falls back to [`arbitrate`](Self::arbitrate)
    /// for rotations in place or when nothing in the window is clear.
    pub fn smart_arbitrate<C>(&self, candidate: Twist, obstacles: &C) -> Option<Twist>
    where
        C: CollisionChecker + ?Sized,
    {
        if candidate.linear != 0.0 {
            let clear: Vec<f32> = self
                .smart_omegas()
                .filter(|&w| self.is_clear(candidate.with_angular(w), obstacles, OutlineKind::Probe))
                .collect();
            if !clear.is_empty() {
                return Some(candidate.with_angular(clear[(clear.len() - 1) / 2]));
            }
        }
        self.arbitrate(candidate, obstacles)
    }

    /// True iff rotating in place from heading 0 to `angle` stays clear.
    fn rotation_is_clear<C>(&self, angle: f32, obstacles: &C, kind: OutlineKind) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        let step = self.config.delta_rotation;
        let sign = if angle < 0.0 { -1.0 } else { 1.0 };
        let samples = if step > 0.0 {
            ((angle.abs() / step).ceil() as usize).min(MAX_SWEEP_SAMPLES)
        } else {
            0
        };

        for i in 0..samples {
            let yaw = i as f32 * step;
            if yaw >= angle.abs() {
                break;
            }
            if !self.pose_is_clear(Pose2D::rotation(sign * yaw), obstacles, kind) {
                return false;
            }
        }
        self.pose_is_clear(Pose2D::rotation(angle), obstacles, kind)
    }

    /// Rotation that reaches the heading `angle` without collision.
    ///
    /// Returns `angle` if the direct turn is clear, otherwise the turn the
    /// other way around, otherwise `0.0` (blocked both ways). A non-finite
    /// `angle` is never admissible.
    pub fn admissible_rotation<C>(&self, angle: f32, obstacles: &C, kind: OutlineKind) -> f32
    where
        C: CollisionChecker + ?Sized,
    {
        if !angle.is_finite() {
            tracing::warn!("Rejecting non-finite rotation {}", angle);
            return 0.0;
        }
        if self.rotation_is_clear(angle, obstacles, kind) {
            return angle;
        }
        let reverse = complementary_rotation(angle);
        if self.rotation_is_clear(reverse, obstacles, kind) {
            return reverse;
        }
        0.0
    }

    /// Keep the poses whose footprint is clear, in order.
    ///
    /// Without obstacle data nothing can be vouched for, so the result is empty.
    pub fn filter_poses<C>(&self, poses: &[Pose2D], obstacles: Option<&C>, kind: OutlineKind) -> Vec<Pose2D>
    where
        C: CollisionChecker + ?Sized,
    {
        let Some(obstacles) = obstacles else {
            return Vec::new();
        };
        poses
            .iter()
            .copied()
            .filter(|&pose| self.pose_is_clear(pose, obstacles, kind))
            .collect()
    }
}
