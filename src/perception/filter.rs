//! Angular window filter for raw lidar frames.

use serde::{Deserialize, Serialize};

fn default_include() -> bool {
    true
}

/// Keeps or drops readings by their raw sensor angle.
///
/// A reading survives iff, for every range, `include == (lo <= angle <= hi)`.
/// With `include = true` this is the intersection of the ranges; with
/// `include = false` the reading must lie outside all of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleFilter {
    /// Inclusive `[lo, hi]` windows in radians
    #[serde(default)]
    pub ranges: Vec<[f32; 2]>,

    /// Keep readings inside (true) or outside (false) the windows
    #[serde(default = "default_include")]
    pub include: bool,
}

impl Default for AngleFilter {
    fn default() -> Self {
        Self {
            ranges: Vec::new(),
            include: default_include(),
        }
    }
}

impl AngleFilter {
    pub fn new(ranges: Vec<[f32; 2]>, include: bool) -> Self {
        Self { ranges, include }
    }

    #[inline]
    pub fn accepts(&self, angle: f32) -> bool {
        self.ranges
            .iter()
            .all(|&[lo, hi]| self.include == (lo <= angle && angle <= hi))
    }

    /// Filter paired angle/distance sequences, keeping pair order.
    pub fn apply(&self, angles: &[f32], distances: &[f32]) -> (Vec<f32>, Vec<f32>) {
        angles
            .iter()
            .zip(distances)
            .filter(|&(&a, _)| self.accepts(a))
            .map(|(&a, &d)| (a, d))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_window() {
        let filter = AngleFilter::new(vec![[-1.0, 1.0]], true);
        let (angles, distances) = filter.apply(&[-2.0, -0.5, 0.0, 1.0, 1.5], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(angles, vec![-0.5, 0.0, 1.0]);
        assert_eq!(distances, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_exclude_windows() {
        // Mask two struts behind the sensor
        let filter = AngleFilter::new(vec![[2.0, 2.5], [-2.5, -2.0]], false);
        assert!(filter.accepts(0.0));
        assert!(!filter.accepts(2.2));
        assert!(!filter.accepts(-2.0));
        assert!(filter.accepts(3.0));
    }

    #[test]
    fn test_include_requires_every_window() {
        let filter = AngleFilter::new(vec![[-1.0, 1.0], [0.0, 2.0]], true);
        assert!(filter.accepts(0.5));
        assert!(!filter.accepts(-0.5));
        assert!(!filter.accepts(1.5));
    }

    #[test]
    fn test_default_keeps_everything() {
        let filter = AngleFilter::default();
        assert!(filter.accepts(-3.0));
        assert!(filter.accepts(3.0));
    }

    #[test]
    fn test_mismatched_lengths_zip() {
        let filter = AngleFilter::default();
        let (angles, distances) = filter.apply(&[0.0, 0.1, 0.2], &[1.0]);
        assert_eq!(angles, vec![0.0]);
        assert_eq!(distances, vec![1.0]);
    }
}
