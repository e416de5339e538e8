//! Shape-versus-shape collision tests.
//!
//! Shapes are plain vertex lists:
//! - one vertex: a discrete point
//! - two vertices: a zero-area segment
//! - three or more: a polygon ring
//!
//! Rings are treated as closed whether or not the first vertex is repeated
//! at the end, so hulls (closed) and robot outlines (open) mix freely.

use crate::core::{Point2D, cross};

/// Distinct vertices of a ring, without the closing repeat.
#[inline]
pub fn ring_vertices(ring: &[Point2D]) -> &[Point2D] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Closed edge sequence of a ring, including the edge back to the start.
pub fn ring_edges(ring: &[Point2D]) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
    let vertices = ring_vertices(ring);
    let n = if vertices.len() >= 2 { vertices.len() } else { 0 };
    (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
}

/// Even-odd point-in-polygon test.
///
/// A single-vertex shape "contains" only an identical point. Shapes with
/// fewer than three distinct vertices have no interior.
pub fn point_in_polygon(point: Point2D, ring: &[Point2D]) -> bool {
    let vertices = ring_vertices(ring);
    match vertices.len() {
        0 => false,
        1 => vertices[0] == point,
        2 => false,
        _ => {
            let mut inside = false;
            for (a, b) in ring_edges(ring) {
                if (a.y > point.y) != (b.y > point.y)
                    && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
                {
                    inside = !inside;
                }
            }
            inside
        }
    }
}

/// Check whether segment `a–b` crosses or touches segment `c–d`.
///
/// Bounding boxes are compared first; overlapping boxes fall through to the
/// dual cross-product sign test.
pub fn segments_cross(a: Point2D, b: Point2D, c: Point2D, d: Point2D) -> bool {
    if c.x.max(d.x) < a.x.min(b.x)
        || c.y.max(d.y) < a.y.min(b.y)
        || a.x.max(b.x) < c.x.min(d.x)
        || a.y.max(b.y) < c.y.min(d.y)
    {
        return false;
    }

    cross(a, c, d) * cross(b, c, d) <= 0.0 && cross(c, a, b) * cross(d, a, b) <= 0.0
}

/// Check whether two shapes collide.
///
/// - Point vs. anything: point-in-polygon (exact equality for two points).
/// - Polygon vs. polygon: a vertex of either lies inside the other, or any
///   pair of edges cross.
///
/// Empty shapes never collide. The test is symmetric in its arguments.
pub fn collides(a: &[Point2D], b: &[Point2D]) -> bool {
    let va = ring_vertices(a);
    let vb = ring_vertices(b);

    if va.is_empty() || vb.is_empty() {
        return false;
    }
    if va.len() == 1 {
        return point_in_polygon(va[0], vb);
    }
    if vb.len() == 1 {
        return point_in_polygon(vb[0], va);
    }

    if va.iter().any(|&p| point_in_polygon(p, vb)) || vb.iter().any(|&p| point_in_polygon(p, va)) {
        return true;
    }

    ring_edges(va).any(|(p1, p2)| ring_edges(vb).any(|(q1, q2)| segments_cross(p1, p2, q1, q2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2D {
        Point2D::new(x, y)
    }

    fn square(cx: f32, cy: f32, half: f32) -> Vec<Point2D> {
        vec![
            p(cx + half, cy + half),
            p(cx + half, cy - half),
            p(cx - half, cy - half),
            p(cx - half, cy + half),
        ]
    }

    fn closed(mut ring: Vec<Point2D>) -> Vec<Point2D> {
        ring.push(ring[0]);
        ring
    }

    #[test]
    fn test_ring_vertices_strips_closing_repeat() {
        let ring = closed(square(0.0, 0.0, 1.0));
        assert_eq!(ring_vertices(&ring).len(), 4);
        assert_eq!(ring_vertices(&square(0.0, 0.0, 1.0)).len(), 4);
        assert_eq!(ring_vertices(&[p(1.0, 1.0), p(1.0, 1.0)]), &[p(1.0, 1.0)]);
    }

    #[test]
    fn test_ring_edges_closed() {
        let edges: Vec<_> = ring_edges(&square(0.0, 0.0, 1.0)).collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].1, edges[0].0);

        assert_eq!(ring_edges(&[p(0.0, 0.0)]).count(), 0);
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square(0.0, 0.0, 0.2);
        assert!(point_in_polygon(p(0.0, 0.0), &sq));
        assert!(point_in_polygon(p(0.19, -0.19), &sq));
        assert!(!point_in_polygon(p(0.3, 0.0), &sq));
        assert!(!point_in_polygon(p(0.0, -0.21), &sq));

        // Closed and open rings agree
        assert!(point_in_polygon(p(0.1, 0.1), &closed(sq.clone())));
    }

    #[test]
    fn test_point_in_degenerate_shapes() {
        assert!(point_in_polygon(p(1.0, 2.0), &[p(1.0, 2.0)]));
        assert!(!point_in_polygon(p(1.0, 2.0), &[p(1.0, 2.1)]));
        assert!(!point_in_polygon(p(0.5, 0.0), &[p(0.0, 0.0), p(1.0, 0.0)]));
        assert!(!point_in_polygon(p(0.0, 0.0), &[]));
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_cross(p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(1.0, 0.0)));
        assert!(!segments_cross(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
        // Boxes overlap but segments do not meet
        assert!(!segments_cross(p(0.0, 0.0), p(1.0, 1.0), p(0.6, 0.0), p(1.0, 0.3)));
        // Touching at an endpoint
        assert!(segments_cross(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
    }

    #[test]
    fn test_overlapping_polygons() {
        let a = square(0.0, 0.0, 0.5);
        let b = square(0.8, 0.0, 0.5);
        assert!(collides(&a, &b));

        let far = square(3.0, 0.0, 0.5);
        assert!(!collides(&a, &far));
    }

    #[test]
    fn test_crossing_without_contained_vertices() {
        // A plus-sign arrangement: no vertex of either is inside the other
        let wide = vec![p(-1.0, -0.1), p(1.0, -0.1), p(1.0, 0.1), p(-1.0, 0.1)];
        let tall = vec![p(-0.1, -1.0), p(0.1, -1.0), p(0.1, 1.0), p(-0.1, 1.0)];
        assert!(collides(&wide, &tall));
    }

    #[test]
    fn test_containment_is_collision() {
        let outer = square(0.0, 0.0, 1.0);
        let inner = closed(square(0.1, 0.1, 0.2));
        assert!(collides(&outer, &inner));
        assert!(collides(&inner, &outer));
    }

    #[test]
    fn test_point_shapes() {
        let sq = square(0.0, 0.0, 0.2);
        assert!(collides(&[p(0.1, 0.0)], &sq));
        assert!(collides(&sq, &[p(0.1, 0.0)]));
        assert!(!collides(&[p(0.3, 0.0)], &sq));

        assert!(collides(&[p(1.0, 1.0)], &[p(1.0, 1.0)]));
        assert!(!collides(&[p(1.0, 1.0)], &[p(1.0, 1.000_1)]));
    }

    #[test]
    fn test_segment_shape_crossing_polygon() {
        let sq = square(0.0, 0.0, 0.2);
        let segment = vec![p(-1.0, 0.0), p(1.0, 0.0)];
        assert!(collides(&sq, &segment));
        assert!(collides(&segment, &sq));

        let away = vec![p(-1.0, 0.5), p(1.0, 0.5)];
        assert!(!collides(&sq, &away));
    }

    #[test]
    fn test_empty_never_collides() {
        assert!(!collides(&[], &square(0.0, 0.0, 1.0)));
        assert!(!collides(&[p(0.0, 0.0)], &[]));
    }

    #[test]
    fn test_symmetry() {
        let shapes: Vec<Vec<Point2D>> = vec![
            vec![p(0.0, 0.0)],
            vec![p(0.3, 0.0)],
            vec![p(-1.0, 0.05), p(1.0, 0.05)],
            square(0.0, 0.0, 0.2),
            closed(square(0.25, 0.1, 0.1)),
            square(0.0, 0.0, 1.0),
            vec![p(-1.0, -0.1), p(1.0, -0.1), p(1.0, 0.1), p(-1.0, 0.1)],
            square(5.0, 5.0, 0.5),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(collides(a, b), collides(b, a), "a={a:?} b={b:?}");
            }
        }
    }
}
