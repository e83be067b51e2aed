//! Route progress processor.
//!
//! Turns `(route, held indices, location fix)` into the next [`RouteProgress`]
//! and owns all per-session state: the current indices, the decoded geometry
//! of the current step, and the annotation resume point.
//!
//! # Per-tick flow
//!
//! ```text
//! fix ──► new route? ──► reset to (0,0)
//!              │
//!              ▼
//!       step distance remaining ──► maneuver complete? ──► increase index
//!              │
//!              ▼
//!       leg / route remaining ──► annotation ──► intersections ──► RouteProgress
//! ```
//!
//! The processor is not thread-safe: a single worker owns it and
//! feeds it one fix at a time.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::config::NavigationOptions;
use crate::geometry::Point;
use crate::location::Location;
use crate::route::{is_new_route, Route, StepIntersection};

use super::error::NavigationError;
use super::helper::{
    check_bearing_for_step_completion, create_current_annotation, create_intersection_distances,
    create_intersections_list, find_current_intersection, find_upcoming_intersection,
    increase_index, leg_distance_remaining, route_distance_remaining, step_distance_remaining,
};
use super::indices::NavigationIndices;
use super::progress::{CurrentLegAnnotation, RouteProgress};

/// A request to move the held indices outside normal maneuver completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRequest {
    /// Advance one step from the held indices.
    Advance,
    /// Move to explicit indices.
    JumpTo(NavigationIndices),
}

/// Decoded geometry and intersections for one step, rebuilt on index change.
#[derive(Debug, Clone)]
struct StepGeometry {
    indices: NavigationIndices,
    current_points: Arc<[Point]>,
    upcoming_points: Option<Arc<[Point]>>,
    intersections: Arc<[StepIntersection]>,
    intersection_distances: Arc<[f64]>,
}

/// The route-progress state machine.
pub struct NavigationRouteProcessor {
    max_turn_completion_offset: f64,
    maneuver_zone_radius: f64,
    arrival_radius: f64,
    route: Option<Arc<Route>>,
    indices: NavigationIndices,
    geometry: Option<StepGeometry>,
    annotation: Option<(usize, CurrentLegAnnotation)>,
    progress: Option<RouteProgress>,
}

impl NavigationRouteProcessor {
    /// Create a processor with no route.
    pub fn new(options: &NavigationOptions) -> Self {
        Self {
            max_turn_completion_offset: options.max_turn_completion_offset(),
            maneuver_zone_radius: options.maneuver_zone_radius(),
            arrival_radius: options.arrival_radius(),
            route: None,
            indices: NavigationIndices::START,
            geometry: None,
            annotation: None,
            progress: None,
        }
    }

    /// The route behind the held indices.
    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    /// The held indices.
    pub fn indices(&self) -> NavigationIndices {
        self.indices
    }

    /// The most recent progress snapshot.
    pub fn progress(&self) -> Option<&RouteProgress> {
        self.progress.as_ref()
    }

    /// Compute the progress for a new fix.
    ///
    /// On error the held state is left as it was before the call, apart from
    /// a new-route reset which has already taken effect.
    pub fn build_new_progress(
        &mut self,
        route: &Arc<Route>,
        location: &Location,
    ) -> Result<RouteProgress, NavigationError> {
        let is_new = is_new_route(self.route.as_ref(), route);
        if is_new {
            info!(
                legs = route.legs.len(),
                steps = route.step_count(),
                distance = route.distance,
                "New route, resetting progress"
            );
            self.route = Some(Arc::clone(route));
            self.reset_session_state();
        } else if !Arc::ptr_eq(self.route.as_ref().unwrap_or(route), route) {
            // Same route content, newer allocation
            self.route = Some(Arc::clone(route));
        }

        if !self.indices.is_valid_for(route) {
            debug!(
                leg_index = self.indices.leg_index(),
                step_index = self.indices.step_index(),
                "Indices outside route, resetting"
            );
            self.reset_session_state();
            if !self.indices.is_valid_for(route) {
                return Err(NavigationError::InvalidRoute(
                    "route has no steps".to_string(),
                ));
            }
        }

        let point = location.point();

        let mut geometry = self.step_geometry(route, self.indices)?;
        let mut indices = self.indices;
        let mut step_remaining = step_distance_remaining(
            point,
            &route.legs[indices.leg_index()],
            indices.step_index(),
            &geometry.current_points,
        );

        if !is_new {
            let leg = &route.legs[indices.leg_index()];
            let bearing_matches = check_bearing_for_step_completion(
                location.bearing_or_zero(),
                leg.steps.get(indices.step_index() + 1),
                step_remaining,
                self.max_turn_completion_offset,
            );
            let within_maneuver_zone = step_remaining < self.maneuver_zone_radius;
            let force_increase = step_remaining == 0.0 && !bearing_matches;

            if (bearing_matches && within_maneuver_zone) || force_increase {
                let next = increase_index(route, indices);
                if next != indices {
                    debug!(
                        from = %indices,
                        to = %next,
                        forced = force_increase,
                        "Maneuver completed"
                    );
                    indices = next;
                    geometry = self.step_geometry(route, indices)?;
                    step_remaining = step_distance_remaining(
                        point,
                        &route.legs[indices.leg_index()],
                        indices.step_index(),
                        &geometry.current_points,
                    );
                }
            }
        }

        let leg_index = indices.leg_index();
        let step_index = indices.step_index();
        let leg = &route.legs[leg_index];
        let step = &leg.steps[step_index];
        let upcoming_step = leg.steps.get(step_index + 1);

        let leg_remaining = leg_distance_remaining(step_remaining, leg, step_index);
        let route_remaining = route_distance_remaining(leg_remaining, route, leg_index);

        let previous_annotation = self
            .annotation
            .as_ref()
            .filter(|(annotated_leg, _)| *annotated_leg == leg_index)
            .map(|(_, annotation)| annotation);
        let leg_traveled = (leg.distance - leg_remaining).max(0.0);
        let current_leg_annotation =
            create_current_annotation(previous_annotation, leg, leg_traveled);

        let step_traveled = (step.distance - step_remaining).max(0.0);
        let current_index = find_current_intersection(&geometry.intersection_distances, step_traveled);
        let current_intersection =
            current_index.and_then(|i| geometry.intersections.get(i).cloned());
        let upcoming_intersection =
            find_upcoming_intersection(&geometry.intersections, current_index, upcoming_step);

        trace!(
            leg_index,
            step_index,
            step_distance_remaining = step_remaining,
            leg_distance_remaining = leg_remaining,
            distance_remaining = route_remaining,
            "Progress computed"
        );

        let progress = RouteProgress {
            route: Arc::clone(route),
            indices,
            step_distance_remaining: step_remaining,
            leg_distance_remaining: leg_remaining,
            distance_remaining: route_remaining,
            current_step_points: Arc::clone(&geometry.current_points),
            upcoming_step_points: geometry.upcoming_points.clone(),
            intersections: Arc::clone(&geometry.intersections),
            intersection_distances: Arc::clone(&geometry.intersection_distances),
            current_intersection,
            upcoming_intersection,
            current_leg_annotation: current_leg_annotation.clone(),
            arrival_radius: self.arrival_radius,
        };

        self.indices = indices;
        self.geometry = Some(geometry);
        self.annotation = current_leg_annotation.map(|a| (leg_index, a));
        self.progress = Some(progress.clone());

        Ok(progress)
    }

    /// Apply an index request from the off-route detector or a manual override.
    ///
    /// [`IndexRequest::Advance`] moves on from the held indices, which already
    /// include any maneuver completed by the last tick. Step geometry is
    /// rebuilt on the next tick.
    pub fn apply_request(
        &mut self,
        request: IndexRequest,
    ) -> Result<NavigationIndices, NavigationError> {
        let route = self.route.as_ref().ok_or(NavigationError::NoActiveRoute)?;

        let target = match request {
            IndexRequest::Advance => increase_index(route, self.indices),
            IndexRequest::JumpTo(target) => {
                if !target.is_valid_for(route) {
                    warn!(
                        leg_index = target.leg_index(),
                        step_index = target.step_index(),
                        "Rejected index jump outside route"
                    );
                    return Err(NavigationError::InvalidIndices {
                        leg_index: target.leg_index(),
                        step_index: target.step_index(),
                    });
                }
                target
            }
        };

        if target.leg_index() != self.indices.leg_index() {
            self.annotation = None;
        }
        debug!(from = %self.indices, to = %target, ?request, "Index request applied");
        self.indices = target;
        self.geometry = None;

        Ok(target)
    }

    fn reset_session_state(&mut self) {
        self.indices = NavigationIndices::START;
        self.geometry = None;
        self.annotation = None;
        self.progress = None;
    }

    /// Geometry for `indices`, from cache when it still matches.
    fn step_geometry(
        &self,
        route: &Route,
        indices: NavigationIndices,
    ) -> Result<StepGeometry, NavigationError> {
        if let Some(cached) = self.geometry.as_ref().filter(|g| g.indices == indices) {
            return Ok(cached.clone());
        }

        let leg = &route.legs[indices.leg_index()];
        let step = &leg.steps[indices.step_index()];
        let upcoming = leg.steps.get(indices.step_index() + 1);

        let current_points: Arc<[Point]> = step.decode_geometry()?.into();
        let upcoming_points = upcoming
            .map(|s| s.decode_geometry())
            .transpose()?
            .map(Arc::from);
        let intersections = create_intersections_list(step, upcoming);
        let intersection_distances = create_intersection_distances(&current_points, &intersections);

        trace!(%indices, points = current_points.len(), "Decoded step geometry");

        Ok(StepGeometry {
            indices,
            current_points,
            upcoming_points,
            intersections: intersections.into(),
            intersection_distances: intersection_distances.into(),
        })
    }
}
