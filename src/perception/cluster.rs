//! Density-based clustering of obstacle points.
//!
//! DBSCAN variant with a hard per-cluster cap. Expansion walks a FIFO queue
//! and only core points (enough neighbors) join a cluster and extend it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

/// Clustering thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Neighbors needed for a core point
    #[serde(default = "default_min_points")]
    pub min_points: usize,

    /// Hard cap on points per cluster
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Neighborhood radius (meters)
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

fn default_min_points() -> usize {
    2
}
fn default_max_points() -> usize {
    30
}
fn default_max_distance() -> f32 {
    0.4
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_points: default_min_points(),
            max_points: default_max_points(),
            max_distance: default_max_distance(),
        }
    }
}

/// Clustering result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Clusters {
    /// Isolated and border points
    pub noise: Vec<Point2D>,
    /// Dense groups, in discovery order
    pub groups: Vec<Vec<Point2D>>,
}

/// Indices of all other points within squared distance `radius_sq`.
fn region_query(points: &[Point2D], index: usize, radius_sq: f32) -> Vec<usize> {
    let center = points[index];
    points
        .iter()
        .enumerate()
        .filter(|&(_, p)| {
            let d = center.distance_squared(p);
            d > 0.0 && d <= radius_sq
        })
        .map(|(i, _)| i)
        .collect()
}

/// Cluster `points`.
///
/// - A point with no neighbors is always noise.
/// - A point with fewer than `min_points` neighbors is noise when first seen.
/// - Non-core points reached during expansion are kept as noise instead of
///   being discarded, so border points still reach collision checks.
/// - Expansion stops once a cluster holds `max_points`; points still queued
///   at that moment are picked up later by the outer scan.
///
/// Deterministic for a given input order.
pub fn cluster(points: &[Point2D], config: &ClusterConfig) -> Clusters {
    let radius_sq = config.max_distance * config.max_distance;
    let is_core = |neighbors: &[usize]| !neighbors.is_empty() && neighbors.len() >= config.min_points;

    let mut visited = vec![false; points.len()];
    let mut result = Clusters::default();

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let neighbors = region_query(points, i, radius_sq);
        if !is_core(&neighbors) {
            result.noise.push(points[i]);
            continue;
        }

        let mut group = vec![points[i]];
        let mut queue: VecDeque<usize> = neighbors.into();

        while group.len() < config.max_points {
            let Some(j) = queue.pop_front() else {
                break;
            };
            if visited[j] {
                continue;
            }
            visited[j] = true;

            let expansion = region_query(points, j, radius_sq);
            if is_core(&expansion) {
                queue.extend(expansion);
                group.push(points[j]);
            } else {
                result.noise.push(points[j]);
            }
        }

        result.groups.push(group);
    }

    result
}
