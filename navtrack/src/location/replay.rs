//! Simulated travel along a route's geometry.
//!
//! Used by the CLI and tests to drive a full navigation session without a
//! real positioning device.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::fix::{now_millis, Location};
use super::source::{LocationSource, LocationUpdate};
use super::static_source::StaticLocationSource;
use crate::geometry::{along, bearing, line_length, Point, PolylineError};
use crate::route::Route;

/// Default replay speed (m/s), roughly 50 km/h.
pub const DEFAULT_REPLAY_SPEED: f64 = 14.0;

/// Default interval between replayed fixes.
pub const DEFAULT_REPLAY_INTERVAL: Duration = Duration::from_secs(1);

/// Replays a route as a sequence of fixes travelling at constant speed.
///
/// Fixes are sampled every `speed * interval` meters along the concatenated
/// step geometry of all legs, each carrying the bearing of the travelled line
/// and a timestamp advancing by `interval`. The final fix is always the end of
/// the route.
pub struct ReplayRouteLocationSource {
    inner: StaticLocationSource,
}

impl ReplayRouteLocationSource {
    /// Build a replay of `route` at `speed` m/s with one fix per `interval`.
    ///
    /// Speeds at or below zero fall back to [`DEFAULT_REPLAY_SPEED`].
    pub fn new(route: &Route, speed: f64, interval: Duration) -> Result<Self, PolylineError> {
        let speed = if speed > 0.0 {
            speed
        } else {
            DEFAULT_REPLAY_SPEED
        };
        let line = route_line(route)?;
        let fixes = sample_fixes(&line, speed, interval, now_millis());

        debug!(
            fixes = fixes.len(),
            speed,
            interval_ms = interval.as_millis() as u64,
            "Built route replay"
        );

        Ok(Self {
            inner: StaticLocationSource::new(fixes).with_interval(interval),
        })
    }

    /// Number of fixes in the replay.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the replay has no fixes (empty route geometry).
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl LocationSource for ReplayRouteLocationSource {
    fn subscribe(&self, cancellation: CancellationToken) -> mpsc::Receiver<LocationUpdate> {
        self.inner.subscribe(cancellation)
    }

    fn last_location(&self) -> Option<Location> {
        self.inner.last_location()
    }
}

/// Concatenate every step geometry, dropping repeated joints.
fn route_line(route: &Route) -> Result<Vec<Point>, PolylineError> {
    let mut line: Vec<Point> = Vec::new();
    for step in route.legs.iter().flat_map(|leg| leg.steps.iter()) {
        for point in step.decode_geometry()? {
            if line.last() != Some(&point) {
                line.push(point);
            }
        }
    }
    Ok(line)
}

fn sample_fixes(line: &[Point], speed: f64, interval: Duration, start_ms: u64) -> Vec<Location> {
    let total = line_length(line);
    let spacing = speed * interval.as_secs_f64();
    let interval_ms = interval.as_millis() as u64;

    let mut fixes = Vec::new();
    let mut traveled: f64 = 0.0;
    let mut index: u64 = 0;

    loop {
        let clamped = traveled.min(total);
        let Some(position) = along(line, clamped) else {
            break;
        };
        let ahead = along(line, clamped + 1.0).unwrap_or(position);
        let behind = along(line, (clamped - 1.0).max(0.0)).unwrap_or(position);
        let course = if ahead != position {
            bearing(position, ahead)
        } else {
            bearing(behind, position)
        };

        fixes.push(
            Location::at(position)
                .with_bearing(course)
                .with_speed(speed)
                .with_accuracy(5.0)
                .with_timestamp_ms(start_ms + index * interval_ms),
        );

        if clamped >= total || spacing <= 0.0 {
            break;
        }
        traveled += spacing;
        index += 1;
    }

    fixes
}
