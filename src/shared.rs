//! Shared state between the perception and avoidance sides of the node.
//!
//! - [`LatestReading`]: last value of a stream plus its receipt time
//! - [`ObstacleBoard`]: single-writer holder of the published obstacle snapshot
//! - [`Publisher`]: outbound side of a topic

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::obstacle::ObstacleSet;

/// A value together with the instant it was received or produced.
#[derive(Clone, Debug)]
pub struct Stamped<T> {
    pub value: T,
    pub at: Instant,
}

impl<T> Stamped<T> {
    pub fn new(value: T, at: Instant) -> Self {
        Self { value, at }
    }

    /// Time elapsed since stamping, saturating at zero.
    #[inline]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.at)
    }
}

/// Most recent value of a stream.
#[derive(Clone, Debug)]
pub struct LatestReading<T> {
    slot: Option<Stamped<T>>,
}

impl<T> Default for LatestReading<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> LatestReading<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored value.
    pub fn update(&mut self, value: T, now: Instant) {
        self.slot = Some(Stamped::new(value, now));
    }

    /// Latest value and its receipt time, if any was received.
    pub fn get(&self) -> Option<(&T, Instant)> {
        self.slot.as_ref().map(|s| (&s.value, s.at))
    }

    /// True iff a value was received within `timeout` of `now`.
    pub fn is_fresh(&self, now: Instant, timeout: Duration) -> bool {
        self.slot.as_ref().is_some_and(|s| s.age(now) <= timeout)
    }
}

/// Published obstacle set and its publication time.
pub type ObstacleSnapshot = Stamped<Arc<ObstacleSet>>;

/// Capability to read the latest obstacle snapshot.
pub trait ObstacleProvider {
    fn current_obstacles(&self) -> Option<ObstacleSnapshot>;
}

/// Copy-on-publish holder of the latest [`ObstacleSet`].
///
/// The detector is the only writer. Readers get a cloned `Arc`, so they
/// always see a complete set even while a new one is being published.
#[derive(Clone, Debug, Default)]
pub struct ObstacleBoard {
    inner: Arc<RwLock<Option<ObstacleSnapshot>>>,
}

impl ObstacleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot and return the published set.
    pub fn publish(&self, obstacles: ObstacleSet, now: Instant) -> Arc<ObstacleSet> {
        let obstacles = Arc::new(obstacles);
        *self.inner.write() = Some(Stamped::new(Arc::clone(&obstacles), now));
        obstacles
    }
}

impl ObstacleProvider for ObstacleBoard {
    fn current_obstacles(&self) -> Option<ObstacleSnapshot> {
        self.inner.read().clone()
    }
}

/// Outbound side of a topic.
pub trait Publisher<T> {
    fn publish(&self, message: T);
}

impl<T> Publisher<T> for crossbeam_channel::Sender<T> {
    fn publish(&self, message: T) {
        if self.send(message).is_err() {
            tracing::debug!("Publish dropped: receiver disconnected");
        }
    }
}
