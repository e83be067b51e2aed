//! Integration tests for route progress computation.
//!
//! These tests drive the public progress API the way the engine does:
//! - Index advancement across legs, including zero-distance waypoint legs
//! - Distance remaining at step, leg and route granularity
//! - Intersection and annotation lookups
//! - Off-route detection switched off by configuration

use std::sync::Arc;

use navtrack::config::NavigationOptions;
use navtrack::geometry::{
    along, bearing, decode_polyline, destination, line_length, Point, PRECISION_6,
};
use navtrack::location::Location;
use navtrack::navigation::helper::{
    create_current_annotation, find_current_intersection, increase_index, step_distance_remaining,
};
use navtrack::navigation::{
    NavigationIndices, NavigationRouteProcessor, OffRouteDetector, OffRouteStatus,
};
use navtrack::route::{LegAnnotation, Route, RouteBuilder};

// =============================================================================
// Test Helpers
// =============================================================================

struct Corners {
    a: Point,
    b: Point,
    c: Point,
    d: Point,
    e: Point,
}

fn corners() -> Corners {
    let a = Point::new(13.0, 52.0);
    let b = destination(a, 500.0, 90.0);
    let c = destination(b, 400.0, 0.0);
    let d = destination(c, 300.0, 90.0);
    let e = destination(d, 300.0, 180.0);
    Corners { a, b, c, d, e }
}

/// Two real legs with a zero-distance waypoint leg between them.
fn three_leg_route() -> Arc<Route> {
    let Corners { a, b, c, d, e } = corners();
    Arc::new(
        RouteBuilder::new()
            .leg(vec![vec![a, b], vec![b, c], vec![c, c]])
            .leg(vec![vec![c, c]])
            .leg(vec![vec![c, d], vec![d, e], vec![e, e]])
            .with_annotations()
            .build(),
    )
}

/// Fixes every `spacing` meters along `line`, heading along the line.
fn drive(line: &[Point], spacing: f64) -> Vec<Location> {
    let length = line_length(line);
    let mut fixes = Vec::new();
    let mut traveled: f64 = 0.0;
    while traveled <= length {
        let here = along(line, traveled).unwrap();
        let ahead = along(line, (traveled + 1.0).min(length)).unwrap();
        let heading = if here == ahead {
            fixes.last().and_then(|f: &Location| f.bearing).unwrap_or(0.0)
        } else {
            bearing(here, ahead)
        };
        fixes.push(Location::at(here).with_bearing(heading).with_speed(10.0));
        traveled += spacing;
    }
    if let Some(&end) = line.last() {
        if fixes.last().map(|f| f.point()) != Some(end) {
            let heading = fixes.last().and_then(|f| f.bearing).unwrap_or(0.0);
            fixes.push(Location::at(end).with_bearing(heading).with_speed(10.0));
        }
    }
    fixes
}

// =============================================================================
// Index advancement
// =============================================================================

#[test]
fn test_advancing_reaches_final_step_and_stays() {
    let route = three_leg_route();
    let mut indices = NavigationIndices::START;
    let mut visited = vec![indices];

    for _ in 0..20 {
        indices = increase_index(&route, indices);
        if visited.last() != Some(&indices) {
            visited.push(indices);
        }
    }

    assert_eq!(indices, NavigationIndices::new(2, 2));
    assert_eq!(increase_index(&route, indices), indices);
    // The zero-distance leg is never current
    assert!(visited.iter().all(|i| i.leg_index() != 1));
    assert_eq!(visited.len(), 6);
}

#[test]
fn test_full_drive_advances_monotonically() {
    let route = three_leg_route();
    let overview = decode_polyline(route.geometry.as_deref().unwrap(), PRECISION_6).unwrap();
    let mut processor = NavigationRouteProcessor::new(&NavigationOptions::default());

    let mut previous = NavigationIndices::START;
    for fix in drive(&overview, 10.0) {
        let progress = processor.build_new_progress(&route, &fix).unwrap();

        assert!(progress.indices >= previous, "{} then {}", previous, progress.indices);
        assert_ne!(progress.leg_index(), 1);
        assert!(progress.leg_distance_remaining + 1e-6 >= progress.step_distance_remaining);
        assert!(progress.distance_remaining + 1e-6 >= progress.leg_distance_remaining);
        previous = progress.indices;
    }

    assert_eq!(previous, NavigationIndices::new(2, 2));
    let last = processor.progress().unwrap();
    assert!(last.distance_remaining < 1.0);
    assert!(last.has_arrived());
}

#[test]
fn test_distance_remaining_decreases_along_step() {
    let route = three_leg_route();
    let Corners { a, b, .. } = corners();
    let mut processor = NavigationRouteProcessor::new(&NavigationOptions::default());

    let mut last = f64::MAX;
    for fix in drive(&[a, b], 50.0).into_iter().take(9) {
        let progress = processor.build_new_progress(&route, &fix).unwrap();
        assert!(progress.distance_remaining < last);
        last = progress.distance_remaining;
    }
}

// =============================================================================
// Step distance remaining
// =============================================================================

#[test]
fn test_step_distance_remaining_at_maneuver_and_far_away() {
    let route = three_leg_route();
    let Corners { a, .. } = corners();
    let leg = &route.legs[0];
    let points = leg.steps[0].decode_geometry().unwrap();
    let maneuver = leg.steps[1].maneuver.location;

    assert_eq!(step_distance_remaining(maneuver, leg, 0, &points), 0.0);

    let far = destination(a, 2_000.0, 180.0);
    let full = step_distance_remaining(far, leg, 0, &points);
    assert!((full - line_length(&points)).abs() < 1e-6);
}

// =============================================================================
// Intersections and annotations
// =============================================================================

#[test]
fn test_find_current_intersection_by_distance() {
    let distances = [0.0, 100.0, 250.0];

    assert_eq!(find_current_intersection(&distances, 0.0), Some(0));
    assert_eq!(find_current_intersection(&distances, 130.0), Some(1));
    assert_eq!(find_current_intersection(&distances, 300.0), Some(2));
    assert_eq!(find_current_intersection(&[], 10.0), None);
}

#[test]
fn test_annotation_absent_without_distances() {
    let route = three_leg_route();
    let mut leg = route.legs[0].clone();

    assert!(create_current_annotation(None, &leg, 50.0).is_some());

    leg.annotation = Some(LegAnnotation::default());
    assert!(create_current_annotation(None, &leg, 50.0).is_none());

    leg.annotation = None;
    assert!(create_current_annotation(None, &leg, 50.0).is_none());
}

#[test]
fn test_annotation_tracks_leg_progress() {
    let route = three_leg_route();
    let Corners { a, b, c, .. } = corners();
    let mut processor = NavigationRouteProcessor::new(&NavigationOptions::default());

    let mut last_index = 0;
    for fix in drive(&[a, b, c], 25.0).into_iter().take(30) {
        let progress = processor.build_new_progress(&route, &fix).unwrap();
        let annotation = progress.current_leg_annotation.clone().unwrap();
        assert!(annotation.index >= last_index);
        assert!(annotation.distance_to_annotation <= progress.leg_distance_traveled() + 1e-3);
        last_index = annotation.index;
    }
    assert!(last_index >= 1);
}

// =============================================================================
// Off-route
// =============================================================================

#[test]
fn test_disabled_off_route_detection_always_on_route() {
    let route = three_leg_route();
    let Corners { a, .. } = corners();
    let options = NavigationOptions::new().with_enable_off_route_detection(false);
    let mut processor = NavigationRouteProcessor::new(&options);
    let mut detector = OffRouteDetector::new(options);

    for meters in [50.0, 500.0, 5_000.0] {
        let fix = Location::at(destination(a, meters, 200.0)).with_speed(10.0);
        let progress = processor.build_new_progress(&route, &fix).unwrap();
        assert_eq!(detector.check(&fix, &progress), OffRouteStatus::OnRoute);
    }
}

#[test]
fn test_enabled_off_route_detection_flags_distant_fix() {
    let route = three_leg_route();
    let Corners { a, .. } = corners();
    let options = NavigationOptions::default();
    let mut processor = NavigationRouteProcessor::new(&options);
    let mut detector = OffRouteDetector::new(options);

    let on = Location::at(destination(a, 100.0, 90.0)).with_bearing(90.0).with_speed(10.0);
    let progress = processor.build_new_progress(&route, &on).unwrap();
    assert_eq!(detector.check(&on, &progress), OffRouteStatus::OnRoute);

    let off = Location::at(destination(destination(a, 150.0, 90.0), 200.0, 180.0)).with_speed(10.0);
    let progress = processor.build_new_progress(&route, &off).unwrap();
    assert_eq!(detector.check(&off, &progress), OffRouteStatus::OffRoute);
}
