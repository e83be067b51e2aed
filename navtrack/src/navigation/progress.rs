//! Route progress snapshot.
//!
//! A [`RouteProgress`] is produced fresh for every location fix. It holds the
//! raw distances computed by the processor; everything else (fractions,
//! durations, arrival) is derived on demand.

use std::sync::Arc;

use crate::geometry::Point;
use crate::route::{LegStep, MaxSpeed, Route, RouteLeg, StepIntersection};

use super::indices::NavigationIndices;

/// Annotation values at the traveler's position within the current leg.
///
/// `index` and `distance_to_annotation` form the resume point for the next
/// tick's annotation scan.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentLegAnnotation {
    /// Index into the leg's annotation arrays.
    pub index: usize,
    /// Cumulative leg distance up to the start of this annotation (meters).
    pub distance_to_annotation: f64,
    /// Distance of the annotated coordinate pair (meters).
    pub distance: f64,
    /// Duration of the annotated coordinate pair (seconds).
    pub duration: Option<f64>,
    /// Average speed over the pair (m/s).
    pub speed: Option<f64>,
    /// Posted speed limit.
    pub max_speed: Option<MaxSpeed>,
    /// Congestion level.
    pub congestion: Option<String>,
}

/// Immutable snapshot of the traveler's progress along a route.
#[derive(Debug, Clone)]
pub struct RouteProgress {
    /// The route being navigated.
    pub route: Arc<Route>,
    /// Current leg and step.
    pub indices: NavigationIndices,
    /// Distance to the end of the current step (meters).
    pub step_distance_remaining: f64,
    /// Distance to the end of the current leg (meters).
    pub leg_distance_remaining: f64,
    /// Distance to the end of the route (meters).
    pub distance_remaining: f64,
    /// Decoded geometry of the current step.
    pub current_step_points: Arc<[Point]>,
    /// Decoded geometry of the next step in the leg.
    pub upcoming_step_points: Option<Arc<[Point]>>,
    /// Intersections of the current step plus the first of the upcoming step.
    pub intersections: Arc<[StepIntersection]>,
    /// Cumulative distance of each intersection along the current step (meters).
    pub intersection_distances: Arc<[f64]>,
    /// The last intersection passed.
    pub current_intersection: Option<StepIntersection>,
    /// The next intersection ahead.
    pub upcoming_intersection: Option<StepIntersection>,
    /// Annotation values at the current position.
    pub current_leg_annotation: Option<CurrentLegAnnotation>,
    /// Radius at which the final waypoint counts as reached (meters).
    pub arrival_radius: f64,
}

impl RouteProgress {
    /// Current leg index.
    #[inline]
    pub fn leg_index(&self) -> usize {
        self.indices.leg_index()
    }

    /// Current step index within the leg.
    #[inline]
    pub fn step_index(&self) -> usize {
        self.indices.step_index()
    }

    /// The leg being travelled.
    ///
    /// Indices are validated by the processor before a snapshot is built,
    /// so this always resolves.
    pub fn current_leg(&self) -> &RouteLeg {
        &self.route.legs[self.leg_index()]
    }

    /// The step being travelled.
    pub fn current_step(&self) -> &LegStep {
        &self.current_leg().steps[self.step_index()]
    }

    /// The step before the current one in this leg.
    pub fn previous_step(&self) -> Option<&LegStep> {
        let index = self.step_index().checked_sub(1)?;
        self.current_leg().steps.get(index)
    }

    /// The next step in this leg.
    pub fn upcoming_step(&self) -> Option<&LegStep> {
        self.current_leg().steps.get(self.step_index() + 1)
    }

    /// The step after the upcoming one in this leg.
    pub fn follow_on_step(&self) -> Option<&LegStep> {
        self.current_leg().steps.get(self.step_index() + 2)
    }

    /// Whether the current leg is the last one.
    pub fn is_final_leg(&self) -> bool {
        self.leg_index() + 1 >= self.route.legs.len()
    }

    /// Number of waypoints still ahead (including the leg destination).
    pub fn remaining_waypoints(&self) -> usize {
        self.route.legs.len().saturating_sub(self.leg_index())
    }

    // -------------------------------------------------------------------------
    // Route level
    // -------------------------------------------------------------------------

    /// Distance travelled along the route (meters).
    pub fn distance_traveled(&self) -> f64 {
        (self.route.distance - self.distance_remaining).max(0.0)
    }

    /// Fraction of the route travelled (0-1).
    pub fn fraction_traveled(&self) -> f64 {
        fraction(self.distance_traveled(), self.route.distance)
    }

    /// Expected time to the end of the route (seconds).
    pub fn duration_remaining(&self) -> f64 {
        (1.0 - self.fraction_traveled()) * self.route.duration
    }

    // -------------------------------------------------------------------------
    // Leg level
    // -------------------------------------------------------------------------

    /// Distance travelled along the current leg (meters).
    pub fn leg_distance_traveled(&self) -> f64 {
        (self.current_leg().distance - self.leg_distance_remaining).max(0.0)
    }

    /// Fraction of the current leg travelled (0-1).
    pub fn leg_fraction_traveled(&self) -> f64 {
        fraction(self.leg_distance_traveled(), self.current_leg().distance)
    }

    /// Expected time to the end of the current leg (seconds).
    pub fn leg_duration_remaining(&self) -> f64 {
        (1.0 - self.leg_fraction_traveled()) * self.current_leg().duration
    }

    // -------------------------------------------------------------------------
    // Step level
    // -------------------------------------------------------------------------

    /// Distance travelled along the current step (meters).
    pub fn step_distance_traveled(&self) -> f64 {
        (self.current_step().distance - self.step_distance_remaining).max(0.0)
    }

    /// Fraction of the current step travelled (0-1).
    pub fn step_fraction_traveled(&self) -> f64 {
        fraction(self.step_distance_traveled(), self.current_step().distance)
    }

    /// Expected time to the end of the current step (seconds).
    pub fn step_duration_remaining(&self) -> f64 {
        (1.0 - self.step_fraction_traveled()) * self.current_step().duration
    }

    // -------------------------------------------------------------------------
    // Situation
    // -------------------------------------------------------------------------

    /// Whether the traveler is inside a tunnel.
    pub fn in_tunnel(&self) -> bool {
        self.current_intersection
            .as_ref()
            .is_some_and(StepIntersection::is_tunnel)
    }

    /// Whether the traveler has reached the final destination.
    pub fn has_arrived(&self) -> bool {
        self.is_final_leg() && self.leg_distance_remaining <= self.arrival_radius
    }
}

/// `part / whole` clamped to 0-1; an empty whole counts as fully travelled.
fn fraction(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 1.0;
    }
    (part / whole).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::StepManeuver;

    fn step(distance: f64, duration: f64) -> LegStep {
        LegStep {
            distance,
            duration,
            geometry: String::new(),
            name: String::new(),
            mode: "driving".to_string(),
            maneuver: StepManeuver {
                location: Point::new(0.0, 0.0),
                bearing_before: 0.0,
                bearing_after: 0.0,
                maneuver_type: "turn".to_string(),
                modifier: None,
                instruction: None,
            },
            intersections: Vec::new(),
            voice_instructions: Vec::new(),
            banner_instructions: Vec::new(),
        }
    }

    fn progress(step_remaining: f64, leg_remaining: f64, remaining: f64) -> RouteProgress {
        let leg = RouteLeg {
            distance: 300.0,
            duration: 30.0,
            summary: String::new(),
            steps: vec![step(100.0, 10.0), step(200.0, 20.0)],
            annotation: None,
            incidents: Vec::new(),
            closures: Vec::new(),
            admins: Vec::new(),
        };
        let route = Route {
            distance: 400.0,
            duration: 40.0,
            geometry: None,
            weight: None,
            legs: vec![leg.clone(), RouteLeg { distance: 100.0, duration: 10.0, ..leg }],
        };

        RouteProgress {
            route: Arc::new(route),
            indices: NavigationIndices::new(0, 1),
            step_distance_remaining: step_remaining,
            leg_distance_remaining: leg_remaining,
            distance_remaining: remaining,
            current_step_points: Arc::from(Vec::new()),
            upcoming_step_points: None,
            intersections: Arc::from(Vec::new()),
            intersection_distances: Arc::from(Vec::new()),
            current_intersection: None,
            upcoming_intersection: None,
            current_leg_annotation: None,
            arrival_radius: 25.0,
        }
    }

    #[test]
    fn test_route_level_derivations() {
        let p = progress(150.0, 150.0, 250.0);

        assert_eq!(p.distance_traveled(), 150.0);
        assert!((p.fraction_traveled() - 0.375).abs() < 1e-9);
        assert!((p.duration_remaining() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_level_derivations() {
        let p = progress(150.0, 150.0, 250.0);

        assert_eq!(p.step_distance_traveled(), 50.0);
        assert!((p.step_fraction_traveled() - 0.25).abs() < 1e-9);
        assert!((p.step_duration_remaining() - 15.0).abs() < 1e-9);
        assert!(p.upcoming_step().is_none());
        assert_eq!(p.previous_step().unwrap().distance, 100.0);
    }

    #[test]
    fn test_traveled_never_negative() {
        let p = progress(500.0, 500.0, 900.0);
        assert_eq!(p.step_distance_traveled(), 0.0);
        assert_eq!(p.distance_traveled(), 0.0);
        assert_eq!(p.fraction_traveled(), 0.0);
    }

    #[test]
    fn test_not_arrived_on_first_leg() {
        let p = progress(0.0, 0.0, 100.0);
        assert!(!p.is_final_leg());
        assert!(!p.has_arrived());
        assert_eq!(p.remaining_waypoints(), 2);
    }

    #[test]
    fn test_arrived_within_radius_on_final_leg() {
        let mut p = progress(10.0, 10.0, 10.0);
        p.indices = NavigationIndices::new(1, 1);
        assert!(p.has_arrived());
    }

    #[test]
    fn test_in_tunnel_follows_current_intersection() {
        let mut p = progress(10.0, 10.0, 10.0);
        assert!(!p.in_tunnel());

        let mut intersection = StepIntersection::at(Point::new(0.0, 0.0));
        intersection.classes.push("tunnel".to_string());
        p.current_intersection = Some(intersection);
        assert!(p.in_tunnel());
    }
}
