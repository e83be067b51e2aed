//! A location source that plays back a fixed list of fixes.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::fix::Location;
use super::source::{LocationSource, LocationUpdate};

/// Channel capacity for a subscription.
const SUBSCRIPTION_BUFFER: usize = 16;

/// Plays back a predefined sequence of updates.
///
/// The first update is delivered immediately, each following update after
/// `interval`. The stream closes after the last update. Every subscription
/// replays the full sequence from the start.
#[derive(Clone)]
pub struct StaticLocationSource {
    updates: Arc<Vec<LocationUpdate>>,
    interval: Duration,
    last: Arc<Mutex<Option<Location>>>,
}

impl StaticLocationSource {
    /// Create a source from a list of fixes.
    pub fn new(fixes: Vec<Location>) -> Self {
        Self::from_updates(fixes.into_iter().map(Ok).collect())
    }

    /// Create a source from a list of updates, which may include errors.
    pub fn from_updates(updates: Vec<LocationUpdate>) -> Self {
        Self {
            updates: Arc::new(updates),
            interval: Duration::ZERO,
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// Set the delay between consecutive updates.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Seed the last known fix reported before any subscription.
    pub fn with_last_location(self, location: Location) -> Self {
        *self.last.lock() = Some(location);
        self
    }

    /// Number of updates in the sequence.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Delay between consecutive updates.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl LocationSource for StaticLocationSource {
    fn subscribe(&self, cancellation: CancellationToken) -> mpsc::Receiver<LocationUpdate> {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let updates = Arc::clone(&self.updates);
        let last = Arc::clone(&self.last);
        let interval = self.interval;

        tokio::spawn(async move {
            for (index, update) in updates.iter().enumerate() {
                if index > 0 && !interval.is_zero() {
                    tokio::select! {
                        _ = cancellation.cancelled() => break,
                        _ = tokio::time::sleep(interval) => {}
                    }
                }
                if cancellation.is_cancelled() {
                    break;
                }

                if let Ok(fix) = update {
                    *last.lock() = Some(*fix);
                }
                trace!(index, "Delivering location update");

                if tx.send(update.clone()).await.is_err() {
                    debug!("Location subscriber dropped");
                    break;
                }
            }
            debug!("Static location playback finished");
        });

        rx
    }

    fn last_location(&self) -> Option<Location> {
        *self.last.lock()
    }
}
