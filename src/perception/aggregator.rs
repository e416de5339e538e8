//! Multi-lidar fusion with per-source freshness gating.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::extrinsics::LidarExtrinsics;
use super::filter::AngleFilter;
use crate::core::Point2D;
use crate::shared::LatestReading;

/// One lidar revolution as received from a source topic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LidarFrame {
    /// Coordinate frame the readings are expressed in
    pub frame_id: String,
    /// Beam angles (radians), paired by index with `distances`
    pub angles: Vec<f32>,
    /// Ranges (meters)
    pub distances: Vec<f32>,
}

impl LidarFrame {
    pub fn new(frame_id: impl Into<String>, angles: Vec<f32>, distances: Vec<f32>) -> Self {
        Self {
            frame_id: frame_id.into(),
            angles,
            distances,
        }
    }

    /// Number of usable (angle, distance) pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.angles.len().min(self.distances.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A declared lidar source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LidarSource {
    /// Topic the frames arrive on
    pub topic: String,

    /// Frame id assumed when a message does not carry one
    pub frame_id: String,

    /// Optional angular window applied before fusion
    #[serde(default)]
    pub filter: Option<AngleFilter>,
}

impl LidarSource {
    pub fn new(topic: impl Into<String>, frame_id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            frame_id: frame_id.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: AngleFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Outcome of feeding one frame to the aggregator.
#[derive(Clone, Debug, PartialEq)]
pub enum Ingest {
    /// Topic is not a declared source
    UnknownTopic,
    /// Frame id has no extrinsics entry
    UnknownFrame,
    /// Stored, but some source is missing or stale
    Waiting,
    /// All sources fresh: robot-frame points in declaration order
    Merged(Vec<Point2D>),
}

struct SourceSlot {
    source: LidarSource,
    latest: LatestReading<(LidarFrame, LidarExtrinsics)>,
}

/// Fuses the latest frame of every declared source into one point set.
pub struct LidarFrameAggregator {
    slots: Vec<SourceSlot>,
    extrinsics: HashMap<String, LidarExtrinsics>,
    timeout: Duration,
}

impl LidarFrameAggregator {
    pub fn new(
        sources: Vec<LidarSource>,
        extrinsics: HashMap<String, LidarExtrinsics>,
        timeout: Duration,
    ) -> Self {
        let slots = sources
            .into_iter()
            .map(|source| SourceSlot {
                source,
                latest: LatestReading::new(),
            })
            .collect();
        Self {
            slots,
            extrinsics,
            timeout,
        }
    }

    /// Declared sources, in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = &LidarSource> {
        self.slots.iter().map(|s| &s.source)
    }

    /// Store `frame` for `topic` and merge if every source is fresh.
    pub fn ingest(&mut self, topic: &str, frame: LidarFrame, now: Instant) -> Ingest {
        let Some(index) = self.slots.iter().position(|s| s.source.topic == topic) else {
            tracing::debug!("Dropping lidar frame on undeclared topic {}", topic);
            return Ingest::UnknownTopic;
        };
        let Some(&extrinsics) = self.extrinsics.get(&frame.frame_id) else {
            tracing::debug!(
                "Dropping lidar frame from {}: no extrinsics for frame {:?}",
                topic,
                frame.frame_id
            );
            return Ingest::UnknownFrame;
        };

        let slot = &mut self.slots[index];
        let frame = match &slot.source.filter {
            Some(filter) => {
                let (angles, distances) = filter.apply(&frame.angles, &frame.distances);
                LidarFrame::new(frame.frame_id, angles, distances)
            }
            None => frame,
        };
        slot.latest.update((frame, extrinsics), now);

        if self.all_fresh(now) {
            Ingest::Merged(self.merge())
        } else {
            Ingest::Waiting
        }
    }

    fn all_fresh(&self, now: Instant) -> bool {
        self.slots
            .iter()
            .all(|s| s.latest.is_fresh(now, self.timeout))
    }

    /// Transform every stored frame into the robot frame.
    fn merge(&self) -> Vec<Point2D> {
        let capacity = self
            .slots
            .iter()
            .filter_map(|s| s.latest.get())
            .map(|((frame, _), _)| frame.len())
            .sum();
        let mut points = Vec::with_capacity(capacity);

        for slot in &self.slots {
            if let Some(((frame, extrinsics), _)) = slot.latest.get() {
                points.extend(
                    frame
                        .angles
                        .iter()
                        .zip(&frame.distances)
                        .map(|(&a, &d)| extrinsics.transform(a, d)),
                );
            }
        }
        points
    }
}
