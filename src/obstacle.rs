//! Obstacles in the robot base frame.
//!
//! An [`Obstacle`] is a plain vertex list:
//! - one vertex: a discrete (noise) point
//! - three or more: a closed convex hull
//!
//! Two-vertex obstacles are never produced by the detector but are accepted
//! as zero-area segments.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;
use crate::geometry::{collides, ring_vertices};

/// Shape class of an obstacle, derived from its vertex count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// No vertices
    Empty,
    /// Single isolated point
    Point,
    /// Two distinct vertices, no area
    Segment,
    /// Closed ring with an interior
    Polygon,
}

/// A single obstacle in the robot frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Obstacle(Vec<Point2D>);

impl Obstacle {
    /// Discrete point obstacle.
    pub fn point(point: Point2D) -> Self {
        Self(vec![point])
    }

    /// Polygon obstacle from a (closed or open) vertex ring.
    pub fn polygon(ring: Vec<Point2D>) -> Self {
        Self(ring)
    }

    /// Vertices as stored.
    #[inline]
    pub fn vertices(&self) -> &[Point2D] {
        &self.0
    }

    pub fn kind(&self) -> ObstacleKind {
        match ring_vertices(&self.0).len() {
            0 => ObstacleKind::Empty,
            1 => ObstacleKind::Point,
            2 => ObstacleKind::Segment,
            _ => ObstacleKind::Polygon,
        }
    }

    /// Check whether `shape` collides with this obstacle.
    #[inline]
    pub fn collides_with(&self, shape: &[Point2D]) -> bool {
        collides(&self.0, shape)
    }
}

impl From<Vec<Point2D>> for Obstacle {
    fn from(points: Vec<Point2D>) -> Self {
        Self(points)
    }
}

/// Capability to test a shape against a set of obstacles.
pub trait CollisionChecker {
    /// True iff `shape` collides with any obstacle.
    fn collides_with(&self, shape: &[Point2D]) -> bool;
}

/// Ordered obstacle list produced by one merge cycle.
///
/// Replaced wholesale on every cycle; never mutated after publication.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// An empty set (nothing in sight).
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Number of obstacles of the given kind.
    pub fn count(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| o.kind() == kind).count()
    }
}

impl CollisionChecker for ObstacleSet {
    fn collides_with(&self, shape: &[Point2D]) -> bool {
        self.obstacles.iter().any(|o| o.collides_with(shape))
    }
}

impl FromIterator<Obstacle> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
