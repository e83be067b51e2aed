//! Faster-route detection.
//!
//! The engine asks [`FasterRouteDetector::should_check_faster_route`] every
//! tick. When it returns true an optional [`RouteRequester`] is asked to fetch
//! a candidate route; candidates come back through the engine and are judged
//! by [`FasterRouteDetector::is_faster_route`].

use tracing::debug;

use crate::config::NavigationOptions;
use crate::location::Location;
use crate::route::{LegStep, Route};

use super::progress::RouteProgress;

/// Candidate duration must be at most this share of the duration remaining.
const FASTER_ROUTE_DURATION_RATIO: f64 = 0.9;

/// A candidate's first step must be shorter than this to join the current route (meters).
const MAXIMUM_FIRST_STEP_DISTANCE: f64 = 70.0;

/// Fetches candidate routes from the traveler's position.
///
/// Implementations are expected to return quickly and deliver results later
/// through `NavigationEngine::submit_candidate_route`.
pub trait RouteRequester: Send + Sync {
    /// Request a route from `location` to the remaining waypoints of `progress`.
    fn request_route(&self, location: &Location, progress: &RouteProgress);
}

impl<F> RouteRequester for F
where
    F: Fn(&Location, &RouteProgress) + Send + Sync,
{
    fn request_route(&self, location: &Location, progress: &RouteProgress) {
        self(location, progress)
    }
}

/// Rate-limits and judges faster-route checks.
pub struct FasterRouteDetector {
    options: NavigationOptions,
    last_check_ms: Option<u64>,
}

impl FasterRouteDetector {
    /// Create a detector.
    pub fn new(options: NavigationOptions) -> Self {
        Self {
            options,
            last_check_ms: None,
        }
    }

    /// Forget the last check time.
    pub fn clear(&mut self) {
        self.last_check_ms = None;
    }

    /// Whether a faster route should be looked for now.
    ///
    /// The first call only starts the interval clock. Afterwards a check is
    /// due once per interval, measured by fix timestamps, and only while the
    /// current step has enough duration remaining.
    pub fn should_check_faster_route(
        &mut self,
        location: &Location,
        progress: &RouteProgress,
        off_route: bool,
    ) -> bool {
        if !self.options.enable_faster_route_check() || off_route {
            return false;
        }

        let Some(last) = self.last_check_ms else {
            self.last_check_ms = Some(location.timestamp_ms);
            return false;
        };

        let elapsed_ms = location.timestamp_ms.saturating_sub(last);
        if elapsed_ms < self.options.faster_route_check_interval().as_millis() as u64 {
            return false;
        }

        self.last_check_ms = Some(location.timestamp_ms);
        let step_duration_remaining = progress.step_duration_remaining();
        let due = step_duration_remaining > self.options.faster_route_minimum_step_duration();
        debug!(elapsed_ms, step_duration_remaining, due, "Faster route interval elapsed");
        due
    }

    /// Whether `candidate` is faster than continuing on the current route.
    pub fn is_faster_route(&self, progress: &RouteProgress, candidate: &Route) -> bool {
        if candidate.duration > FASTER_ROUTE_DURATION_RATIO * progress.duration_remaining() {
            return false;
        }

        if let Some(leg) = candidate.legs.first() {
            if let [first, second, ..] = leg.steps.as_slice() {
                if first.distance >= MAXIMUM_FIRST_STEP_DISTANCE {
                    return false;
                }
                if !progress
                    .upcoming_step()
                    .is_some_and(|upcoming| same_step(upcoming, second))
                {
                    return false;
                }
            }
        }

        true
    }
}

/// Steps from different responses are the same when they follow the same
/// line from the same maneuver.
fn same_step(a: &LegStep, b: &LegStep) -> bool {
    a.geometry == b.geometry && a.maneuver.location == b.maneuver.location
}
