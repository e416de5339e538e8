//! Convex hull of an obstacle cluster.
//!
//! Monotone chain (Andrew's algorithm). The result is a closed,
//! counter-clockwise ring: the first vertex is repeated at the end.

use crate::core::{Point2D, cross};

/// Compute the closed convex hull of `points`.
///
/// - Sorted by `(x, y)`, lower chain left to right, upper chain right to left.
/// - A vertex is popped while the last turn is not strictly left
///   (`cross <= 0`), so collinear and duplicate points never survive.
/// - Points that all share the same `x` take a separate branch returning the
///   two extreme points plus the closing repeat.
///
/// Returns an empty ring for empty input. Callers are expected to treat
/// clusters of one or two points as discrete obstacles instead.
pub fn convex_hull(points: &[Point2D]) -> Vec<Point2D> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    // Vertical line (or a single repeated point)
    if first.x == last.x {
        let mut ring = Vec::with_capacity(3);
        ring.push(first);
        if last.y != first.y {
            ring.push(last);
        }
        ring.push(first);
        return ring;
    }

    let mut hull: Vec<Point2D> = Vec::with_capacity(sorted.len() + 1);

    // Lower chain
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper chain; never pops into the lower chain
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // The upper chain ends on the leftmost point, which closes the ring.
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2D {
        Point2D::new(x, y)
    }

    fn signed_area(ring: &[Point2D]) -> f32 {
        ring.windows(2).map(|w| w[0].cross(&w[1])).sum::<f32>() / 2.0
    }

    #[test]
    fn test_unit_square_any_order() {
        let expected = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];

        let orders = [
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
            vec![p(1.0, 1.0), p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)],
            vec![p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 0.0)],
        ];
        for order in &orders {
            assert_eq!(convex_hull(order), expected);
        }
    }

    #[test]
    fn test_interior_points_dropped() {
        let points = vec![
            p(0.0, 0.0),
            p(0.5, 0.5),
            p(1.0, 0.0),
            p(0.2, 0.7),
            p(1.0, 1.0),
            p(0.0, 1.0),
            p(0.5, 0.0), // on an edge
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 5);
        assert!(!hull.contains(&p(0.5, 0.5)));
        assert!(!hull.contains(&p(0.5, 0.0)));
    }

    #[test]
    fn test_counter_clockwise_and_closed() {
        let points = vec![p(2.0, 1.0), p(0.0, 0.0), p(3.0, -1.0), p(1.0, 2.0), p(1.0, 0.5)];
        let hull = convex_hull(&points);
        assert_eq!(hull.first(), hull.last());
        assert!(signed_area(&hull) > 0.0);
    }

    #[test]
    fn test_vertical_line_branch() {
        let points = vec![p(1.0, 0.3), p(1.0, -0.2), p(1.0, 0.1)];
        let hull = convex_hull(&points);
        assert_eq!(hull, vec![p(1.0, -0.2), p(1.0, 0.3), p(1.0, -0.2)]);
    }

    #[test]
    fn test_identical_points() {
        let points = vec![p(0.4, 0.4), p(0.4, 0.4)];
        assert_eq!(convex_hull(&points), vec![p(0.4, 0.4), p(0.4, 0.4)]);
    }

    #[test]
    fn test_diagonal_collinear() {
        let points = vec![p(0.0, 0.0), p(2.0, 2.0), p(1.0, 1.0)];
        let hull = convex_hull(&points);
        assert_eq!(hull, vec![p(0.0, 0.0), p(2.0, 2.0), p(0.0, 0.0)]);
    }

    #[test]
    fn test_empty() {
        assert!(convex_hull(&[]).is_empty());
    }
}
