//! Angle helpers.
//!
//! All angles are in radians. Coordinate frame follows ROS REP-103:
//! - X-forward, Y-left, Z-up
//! - Counter-clockwise positive rotation

use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Normalize angle to [-π, π).
///
/// # Example
/// ```
/// use raksha::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-6);
/// assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a >= PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}

/// Rotation of the same heading change taken the other way around.
///
/// A request to turn by `angle` ends at the same heading as turning by
/// `angle - 2π·sign(angle)`. Zero stays zero.
#[inline]
pub fn complementary_rotation(angle: f32) -> f32 {
    if angle == 0.0 {
        0.0
    } else {
        angle - angle.signum() * TWO_PI
    }
}
