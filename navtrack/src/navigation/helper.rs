//! Progress algorithms.
//!
//! Pure functions used by [`NavigationRouteProcessor`](super::NavigationRouteProcessor)
//! each tick. None of them hold state; the processor threads the previous
//! tick's values through explicitly.

use crate::geometry::{
    difference_between_angles, distance, line_length, line_slice, nearest_point_on_line, wrap,
    Point,
};
use crate::route::{LegStep, Route, RouteLeg, StepIntersection};

use super::indices::NavigationIndices;
use super::progress::CurrentLegAnnotation;

/// Fixes further than this from the step line are treated as GPS excursions.
pub const MAXIMUM_DISTANCE_FROM_ROUTE: f64 = 1_000.0;

// =============================================================================
// Distances
// =============================================================================

/// Distance from the fix to the end of the current step along its geometry.
///
/// Returns 0 for a step with fewer than two points or when the snapped fix is
/// already at the next maneuver. A fix more than 1 km from the step line
/// leaves the whole step remaining.
pub fn step_distance_remaining(
    location: Point,
    leg: &RouteLeg,
    step_index: usize,
    step_points: &[Point],
) -> f64 {
    if step_points.len() < 2 {
        return 0.0;
    }
    let Some(snapped) = nearest_point_on_line(location, step_points) else {
        return 0.0;
    };

    if distance(location, snapped.point) > MAXIMUM_DISTANCE_FROM_ROUTE {
        return line_length(step_points);
    }

    let Some(maneuver) = next_maneuver_position(leg, step_index, step_points) else {
        return 0.0;
    };
    if snapped.point == maneuver {
        return 0.0;
    }

    line_length(&line_slice(snapped.point, maneuver, step_points))
}

/// The maneuver point that ends the current step.
///
/// This is the upcoming step's maneuver location, or the last point of the
/// step geometry for the final step of a leg.
pub fn next_maneuver_position(
    leg: &RouteLeg,
    step_index: usize,
    step_points: &[Point],
) -> Option<Point> {
    leg.steps
        .get(step_index + 1)
        .map(|next| next.maneuver.location)
        .or_else(|| step_points.last().copied())
}

/// Step remaining plus every later step in the leg.
pub fn leg_distance_remaining(step_distance_remaining: f64, leg: &RouteLeg, step_index: usize) -> f64 {
    step_distance_remaining
        + leg
            .steps
            .iter()
            .skip(step_index + 1)
            .map(|step| step.distance)
            .sum::<f64>()
}

/// Leg remaining plus every later leg in the route.
pub fn route_distance_remaining(leg_distance_remaining: f64, route: &Route, leg_index: usize) -> f64 {
    leg_distance_remaining
        + route
            .legs
            .iter()
            .skip(leg_index + 1)
            .map(|leg| leg.distance)
            .sum::<f64>()
}

// =============================================================================
// Index advancement
// =============================================================================

/// The indices following `indices`.
///
/// Moves to the next step, or to the first step of the next leg from the last
/// step of a leg. Legs without steps are skipped, as are zero-distance legs
/// that are not the final leg. On the last step of the last leg, or when no
/// later leg has a step, the indices are returned unchanged.
pub fn increase_index(route: &Route, indices: NavigationIndices) -> NavigationIndices {
    let leg_count = route.legs.len();
    let Some(leg) = route.leg(indices.leg_index()) else {
        return indices;
    };

    let on_last_leg = indices.leg_index() + 1 >= leg_count;
    let on_last_step = indices.step_index() + 1 >= leg.steps.len();

    let mut next = match (on_last_step, on_last_leg) {
        (true, true) => return indices,
        (true, false) => NavigationIndices::new(indices.leg_index() + 1, 0),
        (false, _) => NavigationIndices::new(indices.leg_index(), indices.step_index() + 1),
    };

    loop {
        let Some(leg) = route.leg(next.leg_index()) else {
            return indices;
        };
        let on_final_leg = next.leg_index() + 1 >= leg_count;
        if !leg.steps.is_empty() && (on_final_leg || leg.distance > 0.0) {
            return next;
        }
        if on_final_leg {
            return indices;
        }
        next = NavigationIndices::new(next.leg_index() + 1, 0);
    }
}

// =============================================================================
// Maneuver completion
// =============================================================================

/// Whether the traveler's bearing shows the upcoming maneuver was taken.
///
/// For turns gentler than `max_turn_completion_offset` the bearing cannot tell
/// the maneuver apart from going straight, so the step must be fully
/// travelled instead.
pub fn check_bearing_for_step_completion(
    user_bearing: f64,
    upcoming_step: Option<&LegStep>,
    step_distance_remaining: f64,
    max_turn_completion_offset: f64,
) -> bool {
    let Some(upcoming) = upcoming_step else {
        return false;
    };

    let initial_bearing = wrap(upcoming.maneuver.bearing_before, 0.0, 360.0);
    let final_bearing = wrap(upcoming.maneuver.bearing_after, 0.0, 360.0);
    let expected_turn_angle = difference_between_angles(initial_bearing, final_bearing);

    if expected_turn_angle < max_turn_completion_offset {
        return step_distance_remaining == 0.0;
    }

    let user_bearing = wrap(user_bearing, 0.0, 360.0);
    difference_between_angles(user_bearing, final_bearing) <= max_turn_completion_offset
}

// =============================================================================
// Annotations
// =============================================================================

/// Locate the annotation covering `leg_distance_traveled`.
///
/// Resumes from `previous` when given instead of scanning from the start.
/// Returns `None` when the leg has no annotation or no distance array. When
/// the scan runs off the end the last annotation is used.
pub fn create_current_annotation(
    previous: Option<&CurrentLegAnnotation>,
    leg: &RouteLeg,
    leg_distance_traveled: f64,
) -> Option<CurrentLegAnnotation> {
    let annotation = leg.annotation.as_ref()?;
    let distances = &annotation.distance;
    if distances.is_empty() {
        return None;
    }

    let (start_index, mut cumulative) = match previous {
        Some(p) if p.index < distances.len() => (p.index, p.distance_to_annotation),
        _ => (0, 0.0),
    };

    let mut found = None;
    for (index, segment) in distances.iter().enumerate().skip(start_index) {
        cumulative += segment;
        if cumulative > leg_distance_traveled {
            found = Some((index, cumulative - segment));
            break;
        }
    }

    let (index, distance_to_annotation) = found.unwrap_or_else(|| {
        let last = distances.len() - 1;
        (last, (cumulative - distances[last]).max(0.0))
    });

    Some(CurrentLegAnnotation {
        index,
        distance_to_annotation,
        distance: distances[index],
        duration: annotation.duration.get(index).copied(),
        speed: annotation.speed.get(index).copied(),
        max_speed: annotation.maxspeed.get(index).cloned(),
        congestion: annotation.congestion.get(index).cloned(),
    })
}

// =============================================================================
// Intersections
// =============================================================================

/// The current step's intersections followed by the upcoming step's first.
pub fn create_intersections_list(
    current_step: &LegStep,
    upcoming_step: Option<&LegStep>,
) -> Vec<StepIntersection> {
    let mut intersections = current_step.intersections.clone();
    if let Some(first) = upcoming_step.and_then(|step| step.intersections.first()) {
        intersections.push(first.clone());
    }
    intersections
}

/// Distance of each intersection along the step geometry from its start.
pub fn create_intersection_distances(
    step_points: &[Point],
    intersections: &[StepIntersection],
) -> Vec<f64> {
    let Some(&beginning) = step_points.first() else {
        return vec![0.0; intersections.len()];
    };

    intersections
        .iter()
        .map(|intersection| {
            if intersection.location == beginning {
                0.0
            } else {
                line_length(&line_slice(beginning, intersection.location, step_points))
            }
        })
        .collect()
}

/// Index of the last intersection at or before `step_distance_traveled`.
///
/// Falls back to the first intersection. Returns `None` for an empty list.
pub fn find_current_intersection(distances: &[f64], step_distance_traveled: f64) -> Option<usize> {
    if distances.is_empty() {
        return None;
    }
    Some(
        distances
            .iter()
            .rposition(|&d| d <= step_distance_traveled)
            .unwrap_or(0),
    )
}

/// The intersection after `current_index`.
///
/// Falls back to the upcoming step's first intersection when the list is
/// exhausted, and to `None` at the end of the route.
pub fn find_upcoming_intersection(
    intersections: &[StepIntersection],
    current_index: Option<usize>,
    upcoming_step: Option<&LegStep>,
) -> Option<StepIntersection> {
    let next_index = current_index.map_or(0, |i| i + 1);
    intersections
        .get(next_index)
        .or_else(|| upcoming_step.and_then(|step| step.intersections.first()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{destination, encode_polyline, PRECISION_6};
    use crate::route::{LegAnnotation, StepManeuver};

    fn maneuver(location: Point, before: f64, after: f64) -> StepManeuver {
        StepManeuver {
            location,
            bearing_before: before,
            bearing_after: after,
            maneuver_type: "turn".to_string(),
            modifier: None,
            instruction: None,
        }
    }

    fn step(points: &[Point], distance: f64) -> LegStep {
        LegStep {
            distance,
            duration: distance / 10.0,
            geometry: encode_polyline(points, PRECISION_6),
            name: String::new(),
            mode: "driving".to_string(),
            maneuver: maneuver(points[0], 0.0, 90.0),
            intersections: vec![StepIntersection::at(points[0])],
            voice_instructions: Vec::new(),
            banner_instructions: Vec::new(),
        }
    }

    fn leg(steps: Vec<LegStep>) -> RouteLeg {
        RouteLeg {
            distance: steps.iter().map(|s| s.distance).sum(),
            duration: steps.iter().map(|s| s.duration).sum(),
            summary: String::new(),
            steps,
            annotation: None,
            incidents: Vec::new(),
            closures: Vec::new(),
            admins: Vec::new(),
        }
    }

    fn route(legs: Vec<RouteLeg>) -> Route {
        Route {
            distance: legs.iter().map(|l| l.distance).sum(),
            duration: legs.iter().map(|l| l.duration).sum(),
            geometry: None,
            weight: None,
            legs,
        }
    }

    /// An eastbound line with vertices every 100m, rounded to polyline
    /// precision so decoded geometry compares equal.
    fn line(origin: Point, vertices: usize) -> Vec<Point> {
        (0..vertices)
            .map(|i| {
                let p = destination(origin, 100.0 * i as f64, 90.0);
                Point::new(
                    (p.longitude * 1e6).round() / 1e6,
                    (p.latitude * 1e6).round() / 1e6,
                )
            })
            .collect()
    }

    /// A leg of `count` 200m eastbound steps laid end to end.
    fn straight_leg(count: usize) -> RouteLeg {
        let mut origin = Point::new(0.0, 0.0);
        let mut steps = Vec::new();
        for _ in 0..count {
            let points = line(origin, 3);
            origin = points[2];
            steps.push(step(&points, 200.0));
        }
        leg(steps)
    }

    fn zero_leg() -> RouteLeg {
        let mut l = straight_leg(1);
        l.distance = 0.0;
        l
    }

    // -------------------------------------------------------------------------
    // Distances
    // -------------------------------------------------------------------------

    #[test]
    fn test_step_distance_remaining_short_geometry() {
        let l = straight_leg(1);
        assert_eq!(step_distance_remaining(Point::new(0.0, 0.0), &l, 0, &[]), 0.0);
        assert_eq!(
            step_distance_remaining(Point::new(0.0, 0.0), &l, 0, &[Point::new(0.0, 0.0)]),
            0.0
        );
    }

    #[test]
    fn test_step_distance_remaining_midway() {
        let l = straight_leg(2);
        let points = l.steps[0].decode_geometry().unwrap();
        let fix = destination(points[0], 50.0, 90.0);

        let remaining = step_distance_remaining(fix, &l, 0, &points);

        assert!((remaining - 150.0).abs() < 0.5, "{remaining}");
    }

    #[test]
    fn test_step_distance_remaining_zero_at_maneuver() {
        let l = straight_leg(2);
        let points = l.steps[0].decode_geometry().unwrap();
        let maneuver = l.steps[1].maneuver.location;

        assert_eq!(step_distance_remaining(maneuver, &l, 0, &points), 0.0);
    }

    #[test]
    fn test_step_distance_remaining_far_fix_is_full_length() {
        let l = straight_leg(1);
        let points = l.steps[0].decode_geometry().unwrap();
        let fix = destination(points[1], 5_000.0, 0.0);

        let remaining = step_distance_remaining(fix, &l, 0, &points);

        assert!((remaining - line_length(&points)).abs() < 1e-9);
    }

    #[test]
    fn test_last_step_uses_final_coordinate() {
        let l = straight_leg(1);
        let points = l.steps[0].decode_geometry().unwrap();
        assert_eq!(next_maneuver_position(&l, 0, &points), points.last().copied());
    }

    #[test]
    fn test_remaining_containment() {
        let r = route(vec![straight_leg(3), straight_leg(2)]);

        let leg_remaining = leg_distance_remaining(50.0, &r.legs[0], 1);
        let route_remaining = route_distance_remaining(leg_remaining, &r, 0);

        assert_eq!(leg_remaining, 250.0);
        assert_eq!(route_remaining, 650.0);
        assert!(route_remaining >= leg_remaining && leg_remaining >= 50.0);
    }

    // -------------------------------------------------------------------------
    // Index advancement
    // -------------------------------------------------------------------------

    #[test]
    fn test_increase_index_walks_whole_route() {
        let r = route(vec![straight_leg(3), straight_leg(2)]);
        let mut indices = NavigationIndices::START;
        let mut visited = vec![indices];

        for _ in 0..10 {
            indices = increase_index(&r, indices);
            if visited.last() != Some(&indices) {
                visited.push(indices);
            }
        }

        assert_eq!(
            visited,
            vec![
                NavigationIndices::new(0, 0),
                NavigationIndices::new(0, 1),
                NavigationIndices::new(0, 2),
                NavigationIndices::new(1, 0),
                NavigationIndices::new(1, 1),
            ]
        );
        assert_eq!(increase_index(&r, indices), indices);
    }

    #[test]
    fn test_increase_index_skips_zero_distance_legs() {
        let r = route(vec![straight_leg(1), zero_leg(), zero_leg(), straight_leg(2)]);

        let next = increase_index(&r, NavigationIndices::new(0, 0));

        assert_eq!(next, NavigationIndices::new(3, 0));
    }

    #[test]
    fn test_increase_index_stops_at_final_zero_leg() {
        let r = route(vec![straight_leg(1), zero_leg()]);
        assert_eq!(
            increase_index(&r, NavigationIndices::new(0, 0)),
            NavigationIndices::new(1, 0)
        );
    }

    #[test]
    fn test_increase_index_skips_leg_without_steps() {
        let mut empty = straight_leg(1);
        empty.steps.clear();
        let r = route(vec![straight_leg(1), empty.clone(), straight_leg(2)]);

        assert_eq!(
            increase_index(&r, NavigationIndices::new(0, 0)),
            NavigationIndices::new(2, 0)
        );

        let ends_empty = route(vec![straight_leg(1), empty]);
        assert_eq!(
            increase_index(&ends_empty, NavigationIndices::new(0, 0)),
            NavigationIndices::new(0, 0)
        );
    }

    #[test]
    fn test_increase_index_never_decreases() {
        let r = route(vec![straight_leg(2), zero_leg(), straight_leg(3)]);
        let mut indices = NavigationIndices::START;
        for _ in 0..10 {
            let next = increase_index(&r, indices);
            assert!(next >= indices);
            assert_ne!(next.leg_index(), 1);
            indices = next;
        }
    }

    // -------------------------------------------------------------------------
    // Maneuver completion
    // -------------------------------------------------------------------------

    fn upcoming_with_bearings(before: f64, after: f64) -> LegStep {
        let mut s = straight_leg(1).steps.remove(0);
        s.maneuver = maneuver(s.maneuver.location, before, after);
        s
    }

    #[test]
    fn test_bearing_check_without_upcoming_step() {
        assert!(!check_bearing_for_step_completion(90.0, None, 0.0, 30.0));
    }

    #[test]
    fn test_bearing_check_matches_exit_bearing() {
        let upcoming = upcoming_with_bearings(0.0, 90.0);
        assert!(check_bearing_for_step_completion(100.0, Some(&upcoming), 15.0, 30.0));
        assert!(!check_bearing_for_step_completion(10.0, Some(&upcoming), 15.0, 30.0));
    }

    #[test]
    fn test_bearing_check_wraps_across_north() {
        let upcoming = upcoming_with_bearings(270.0, 365.0);
        assert!(check_bearing_for_step_completion(-5.0, Some(&upcoming), 15.0, 30.0));
    }

    #[test]
    fn test_slight_turn_requires_zero_remaining() {
        let upcoming = upcoming_with_bearings(90.0, 100.0);
        assert!(!check_bearing_for_step_completion(100.0, Some(&upcoming), 5.0, 30.0));
        assert!(check_bearing_for_step_completion(100.0, Some(&upcoming), 0.0, 30.0));
    }

    // -------------------------------------------------------------------------
    // Annotations
    // -------------------------------------------------------------------------

    fn annotated_leg(distances: Vec<f64>) -> RouteLeg {
        let mut l = straight_leg(1);
        l.annotation = Some(LegAnnotation {
            duration: distances.iter().map(|d| d / 10.0).collect(),
            congestion: distances.iter().map(|_| "low".to_string()).collect(),
            distance: distances,
            ..LegAnnotation::default()
        });
        l
    }

    #[test]
    fn test_annotation_absent() {
        let l = straight_leg(1);
        assert!(create_current_annotation(None, &l, 10.0).is_none());
    }

    #[test]
    fn test_annotation_empty_distances() {
        let l = annotated_leg(Vec::new());
        assert!(create_current_annotation(None, &l, 10.0).is_none());
    }

    #[test]
    fn test_annotation_scan_from_start() {
        let l = annotated_leg(vec![50.0, 50.0, 100.0]);

        let annotation = create_current_annotation(None, &l, 120.0).unwrap();

        assert_eq!(annotation.index, 2);
        assert_eq!(annotation.distance_to_annotation, 100.0);
        assert_eq!(annotation.distance, 100.0);
        assert_eq!(annotation.duration, Some(10.0));
        assert_eq!(annotation.congestion.as_deref(), Some("low"));
        assert!(annotation.speed.is_none());
    }

    #[test]
    fn test_annotation_resumes_from_previous() {
        let l = annotated_leg(vec![50.0, 50.0, 100.0]);
        let first = create_current_annotation(None, &l, 60.0).unwrap();
        assert_eq!(first.index, 1);

        let second = create_current_annotation(Some(&first), &l, 120.0).unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.distance_to_annotation, 100.0);
    }

    #[test]
    fn test_annotation_exhausted_uses_last_index() {
        let l = annotated_leg(vec![50.0, 50.0]);
        let annotation = create_current_annotation(None, &l, 500.0).unwrap();
        assert_eq!(annotation.index, 1);
        assert_eq!(annotation.distance_to_annotation, 50.0);
    }

    // -------------------------------------------------------------------------
    // Intersections
    // -------------------------------------------------------------------------

    #[test]
    fn test_intersections_list_appends_upcoming_first() {
        let l = straight_leg(2);
        let list = create_intersections_list(&l.steps[0], l.steps.get(1));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], l.steps[1].intersections[0]);

        assert_eq!(create_intersections_list(&l.steps[1], None).len(), 1);
    }

    #[test]
    fn test_intersection_distances_along_step() {
        let points = line(Point::new(0.0, 0.0), 4);
        let intersections = vec![
            StepIntersection::at(points[0]),
            StepIntersection::at(points[1]),
            StepIntersection::at(points[3]),
        ];

        let distances = create_intersection_distances(&points, &intersections);

        assert_eq!(distances[0], 0.0);
        assert!((distances[1] - 100.0).abs() < 0.5);
        assert!((distances[2] - 300.0).abs() < 0.5);
    }

    #[test]
    fn test_find_current_intersection() {
        let distances = [0.0, 100.0, 250.0];

        assert_eq!(find_current_intersection(&distances, 0.0), Some(0));
        assert_eq!(find_current_intersection(&distances, 130.0), Some(1));
        assert_eq!(find_current_intersection(&distances, 300.0), Some(2));
        assert_eq!(find_current_intersection(&[], 10.0), None);
    }

    #[test]
    fn test_find_current_intersection_before_first() {
        assert_eq!(find_current_intersection(&[20.0, 80.0], 5.0), Some(0));
    }

    #[test]
    fn test_find_upcoming_intersection() {
        let l = straight_leg(2);
        let list = create_intersections_list(&l.steps[0], l.steps.get(1));

        assert_eq!(
            find_upcoming_intersection(&list, Some(0), l.steps.get(1)),
            Some(list[1].clone())
        );
        assert_eq!(
            find_upcoming_intersection(&list, Some(1), l.steps.get(1)),
            Some(l.steps[1].intersections[0].clone())
        );
        assert_eq!(find_upcoming_intersection(&list[..1], Some(0), None), None);
    }
}
