//! Planar geometry used by obstacle detection and avoidance.
//!
//! - [`convex_hull`]: Monotone chain hull of a point cluster
//! - [`collides`]: Shape-versus-shape collision test

mod collision;
mod hull;

pub use collision::{collides, point_in_polygon, ring_edges, ring_vertices, segments_cross};
pub use hull::convex_hull;
