//! Core types shared by the perception and avoidance layers.
//!
//! - [`Point2D`]: Robot-frame coordinates
//! - [`Pose2D`]: Position + heading
//! - [`Twist`]: Velocity command with unicycle prediction

pub mod math;
mod point;
mod pose;

pub use point::{Point2D, cross};
pub use pose::{Pose2D, Twist};
