//! Off-route detection.
//!
//! Decides per fix whether the traveler has left the route, and notices when
//! they have progressed onto a later step without the maneuver-completion
//! heuristic firing.
//!
//! # Heuristics
//!
//! 1. **Reroute lock-out** - after an off-route decision the traveler must
//!    move `minimum_distance_before_rerouting` before the next one.
//! 2. **Radius** - off-route when the fix is further from the current step
//!    than `max(tolerance, speed * dead_reckoning)`. The tolerance is halved
//!    near an intersection.
//! 3. **Nearby steps** - an off-route fix close to the upcoming step requests
//!    an advance; close to a later step in the look-ahead window, a jump.
//! 4. **Moving away** - an on-route fix whose distance to the maneuver keeps
//!    growing by at least the backup distance is off-route.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::NavigationOptions;
use crate::geometry::{distance, nearest_point_on_line, Point};
use crate::location::Location;
use crate::route::LegStep;

use super::indices::NavigationIndices;
use super::progress::RouteProgress;

/// Distances to the maneuver kept for moving-away detection.
const MAXIMUM_DISTANCES_AWAY: usize = 3;

/// Outcome of an off-route check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffRouteStatus {
    /// Following the route.
    OnRoute,
    /// Left the route.
    OffRoute,
    /// On the upcoming step; advance one step.
    RequestAdvance,
    /// On a later step of the leg; jump to it.
    RequestJump(NavigationIndices),
}

impl OffRouteStatus {
    /// Whether the traveler is considered off the route.
    pub fn is_off_route(&self) -> bool {
        matches!(self, Self::OffRoute)
    }
}

/// Stateful off-route detector.
///
/// Keeps the last reroute point and the recent distances to the maneuver;
/// both reset on [`clear`](Self::clear) and when the step changes.
pub struct OffRouteDetector {
    options: NavigationOptions,
    last_reroute_point: Option<Point>,
    distances_away_from_maneuver: VecDeque<f64>,
    last_indices: Option<NavigationIndices>,
}

impl OffRouteDetector {
    /// Create a detector.
    pub fn new(options: NavigationOptions) -> Self {
        Self {
            options,
            last_reroute_point: None,
            distances_away_from_maneuver: VecDeque::with_capacity(MAXIMUM_DISTANCES_AWAY),
            last_indices: None,
        }
    }

    /// Forget all history, e.g. for a new route.
    pub fn clear(&mut self) {
        self.last_reroute_point = None;
        self.distances_away_from_maneuver.clear();
        self.last_indices = None;
    }

    /// Check a fix against the current progress.
    pub fn check(&mut self, location: &Location, progress: &RouteProgress) -> OffRouteStatus {
        if !self.options.enable_off_route_detection() {
            return OffRouteStatus::OnRoute;
        }

        if self.last_indices != Some(progress.indices) {
            self.distances_away_from_maneuver.clear();
            self.last_indices = Some(progress.indices);
        }

        let point = location.point();
        if !self.valid_off_route(point) {
            return OffRouteStatus::OnRoute;
        }

        let Some(distance_from_step) = distance_from_line(point, &progress.current_step_points)
        else {
            return OffRouteStatus::OnRoute;
        };
        let radius = self.off_route_radius(location, progress);

        if distance_from_step <= radius {
            return if self.is_moving_away_from_maneuver(point, progress) {
                debug!(
                    leg_index = progress.leg_index(),
                    step_index = progress.step_index(),
                    "Moving away from maneuver"
                );
                self.last_reroute_point = Some(point);
                OffRouteStatus::OffRoute
            } else {
                OffRouteStatus::OnRoute
            };
        }

        if let Some(status) = self.close_to_later_step(point, progress) {
            self.last_reroute_point = Some(point);
            return status;
        }

        debug!(
            leg_index = progress.leg_index(),
            step_index = progress.step_index(),
            distance_from_step,
            radius,
            "Off route"
        );
        self.last_reroute_point = Some(point);
        OffRouteStatus::OffRoute
    }

    /// Whether the traveler moved far enough since the last reroute.
    ///
    /// The first fix only records its position.
    fn valid_off_route(&mut self, point: Point) -> bool {
        match self.last_reroute_point {
            None => {
                self.last_reroute_point = Some(point);
                false
            }
            Some(last) => distance(last, point) > self.options.minimum_distance_before_rerouting(),
        }
    }

    fn off_route_radius(&self, location: &Location, progress: &RouteProgress) -> f64 {
        let dynamic = self.dynamic_tolerance(location.point(), progress);
        let dead_reckoning = location.speed_or_zero() * self.options.dead_reckoning_time_interval();
        dynamic.max(dead_reckoning)
    }

    /// Base tolerance, halved within the maneuver zone of the nearest intersection.
    fn dynamic_tolerance(&self, point: Point, progress: &RouteProgress) -> f64 {
        let tolerance = self.options.off_route_minimum_distance_in_route();

        let Some(snapped) = nearest_point_on_line(point, &progress.current_step_points) else {
            return tolerance;
        };
        let closest = progress
            .intersections
            .iter()
            .map(|i| distance(snapped.point, i.location))
            .fold(f64::INFINITY, f64::min);

        if closest.is_finite() && closest > 0.0 && closest <= self.options.maneuver_zone_radius() {
            tolerance / 2.0
        } else {
            tolerance
        }
    }

    fn is_moving_away_from_maneuver(&mut self, point: Point, progress: &RouteProgress) -> bool {
        if progress.upcoming_step().is_none() || progress.current_step_points.len() < 2 {
            return false;
        }
        let Some(&maneuver) = progress.current_step_points.last() else {
            return false;
        };

        let to_maneuver = distance(point, maneuver);
        let history = &mut self.distances_away_from_maneuver;

        match history.back() {
            Some(&last) if to_maneuver > last => {
                if history.len() >= MAXIMUM_DISTANCES_AWAY {
                    history.pop_front();
                }
                history.push_back(to_maneuver);
            }
            _ => {
                history.clear();
                history.push_back(to_maneuver);
            }
        }

        trace!(to_maneuver, samples = history.len(), "Distance to maneuver");

        match (history.front(), history.back()) {
            (Some(first), Some(last)) if history.len() >= MAXIMUM_DISTANCES_AWAY => {
                last - first >= self.options.minimum_backup_distance_for_off_route()
            }
            _ => false,
        }
    }

    /// An advance or jump request when the fix lies on a later step of the leg.
    fn close_to_later_step(
        &self,
        point: Point,
        progress: &RouteProgress,
    ) -> Option<OffRouteStatus> {
        let zone = self.options.maneuver_zone_radius();

        if let Some(upcoming) = progress.upcoming_step_points.as_deref() {
            if distance_from_line(point, upcoming).is_some_and(|d| d < zone) {
                debug!(step_index = progress.step_index() + 1, "Close to upcoming step");
                return Some(OffRouteStatus::RequestAdvance);
            }
        }

        let leg = progress.current_leg();
        let first = progress.step_index() + 2;
        let last = (progress.step_index() + 1 + self.options.off_route_look_ahead_steps())
            .min(leg.steps.len().saturating_sub(1));

        (first..=last)
            .filter_map(|index| leg.steps.get(index).map(|step| (index, step)))
            .find(|(_, step)| step_distance(point, step).is_some_and(|d| d < zone))
            .map(|(index, _)| {
                debug!(step_index = index, "Close to later step");
                OffRouteStatus::RequestJump(NavigationIndices::new(progress.leg_index(), index))
            })
    }
}

fn distance_from_line(point: Point, line: &[Point]) -> Option<f64> {
    nearest_point_on_line(point, line).map(|nearest| nearest.distance)
}

/// Distance to a step not yet decoded; undecodable steps never match.
fn step_distance(point: Point, step: &LegStep) -> Option<f64> {
    let points = step.decode_geometry().ok()?;
    distance_from_line(point, &points)
}
