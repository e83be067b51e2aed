//! Integration tests for the navigation engine.
//!
//! These run full sessions on a Tokio runtime and observe them only through
//! listeners, the way an application would:
//! - Event order within a tick and across the session
//! - Milestone firing for default and custom milestones
//! - Index overrides and candidate routes sent while running
//! - The starting fix and failed location updates
//! - Registration rules for listeners and milestones

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use navtrack::config::NavigationOptions;
use navtrack::engine::NavigationEngine;
use navtrack::geometry::{destination, distance, Point};
use navtrack::location::{
    Location, LocationError, LocationSource, ReplayRouteLocationSource, StaticLocationSource,
};
use navtrack::milestone::{Milestone, StepMilestone, Trigger, TriggerProperty};
use navtrack::navigation::{NavigationIndices, RouteProgress};
use navtrack::route::{Route, RouteBuilder};

// =============================================================================
// Test Helpers
// =============================================================================

const ORIGIN: Point = Point::new(13.0, 52.0);

/// 600 m east, then 400 m north, with instructions.
fn route() -> Arc<Route> {
    let b = destination(ORIGIN, 600.0, 90.0);
    let c = destination(b, 400.0, 0.0);
    Arc::new(
        RouteBuilder::new()
            .leg(vec![vec![ORIGIN, b], vec![b, c], vec![c, c]])
            .with_instructions()
            .build(),
    )
}

fn quiet_options() -> NavigationOptions {
    NavigationOptions::new().with_default_milestones_enabled(false)
}

/// Records every event as a short tag, in delivery order.
fn record_events(engine: &NavigationEngine) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&log);
    engine.add_progress_listener(Arc::new(move |_: &Location, _: &RouteProgress| {
        sink.lock().push("progress".to_string());
    }));
    let sink = Arc::clone(&log);
    engine.add_milestone_listener(Arc::new(
        move |_: &RouteProgress, _: &str, milestone: &dyn Milestone| {
            sink.lock().push(format!("milestone:{}", milestone.identifier()));
        },
    ));
    let sink = Arc::clone(&log);
    engine.add_off_route_listener(Arc::new(move |_: &Location| {
        sink.lock().push("off_route".to_string());
    }));
    let sink = Arc::clone(&log);
    engine.add_running_state_listener(Arc::new(move |running: bool| {
        sink.lock().push(format!("running:{running}"));
    }));

    log
}

/// Wait for the worker to finish the stream, then stop to flush delivery.
async fn wait_until_finished(engine: &NavigationEngine) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while engine.is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("session did not finish");
    engine.stop_navigation().await;
}

/// Poll `condition` until it holds.
async fn wait_for(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached");
}

// =============================================================================
// Full sessions
// =============================================================================

#[tokio::test]
async fn test_replay_session_event_order() {
    let route = route();
    let engine = NavigationEngine::new(NavigationOptions::default());
    let log = record_events(&engine);
    let source = Arc::new(ReplayRouteLocationSource::new(&route, 1_000.0, Duration::from_millis(20)).unwrap());

    engine.start_navigation(Arc::clone(&route), source).await.unwrap();
    wait_until_finished(&engine).await;

    let log = log.lock();
    assert_eq!(log.first().map(String::as_str), Some("running:true"));
    assert_eq!(log.get(1).map(String::as_str), Some("progress"));
    assert_eq!(log.last().map(String::as_str), Some("running:false"));
    assert_eq!(log.iter().filter(|e| e.starts_with("running")).count(), 2);

    // Milestones are delivered after the progress event of their tick
    for (i, entry) in log.iter().enumerate() {
        if entry.starts_with("milestone") {
            let before = &log[i - 1];
            assert!(before == "progress" || before.starts_with("milestone"), "{before}");
        }
    }
    assert!(log.iter().any(|e| e == "milestone:1"));
    assert!(log.iter().any(|e| e == "milestone:2"));
    assert!(!log.iter().any(|e| e == "off_route"));

    let progress = engine.progress().unwrap();
    assert!(progress.has_arrived());
    assert!(!engine.is_running());
}

#[tokio::test]
async fn test_off_route_follows_progress() {
    let route = route();
    let engine = NavigationEngine::new(quiet_options());
    let log = record_events(&engine);

    let on = Location::at(destination(ORIGIN, 100.0, 90.0)).with_bearing(90.0).with_speed(10.0);
    let off = Location::at(destination(destination(ORIGIN, 150.0, 90.0), 200.0, 180.0)).with_speed(10.0);
    let source = Arc::new(
        StaticLocationSource::new(vec![on, off, off]).with_interval(Duration::from_millis(5)),
    );

    engine.start_navigation(route, source).await.unwrap();
    wait_until_finished(&engine).await;

    let log = log.lock();
    let off_route: Vec<usize> = log
        .iter()
        .enumerate()
        .filter(|(_, e)| *e == "off_route")
        .map(|(i, _)| i)
        .collect();
    assert!(!off_route.is_empty());
    for i in off_route {
        assert_eq!(log[i - 1], "progress");
    }
}

#[tokio::test]
async fn test_stream_end_stops_running() {
    let engine = NavigationEngine::new(quiet_options());
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    engine.add_running_state_listener(Arc::new(move |running: bool| sink.lock().push(running)));

    let source = Arc::new(StaticLocationSource::new(vec![Location::at(ORIGIN)]));
    engine.start_navigation(route(), source).await.unwrap();
    wait_until_finished(&engine).await;

    assert_eq!(*states.lock(), vec![true, false]);
}

// =============================================================================
// Location sources
// =============================================================================

/// Records the location and indices of every progress event.
fn record_progress(engine: &NavigationEngine) -> Arc<Mutex<Vec<(Location, NavigationIndices)>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    engine.add_progress_listener(Arc::new(move |location: &Location, progress: &RouteProgress| {
        sink.lock().push((*location, progress.indices));
    }));
    log
}

#[tokio::test]
async fn test_route_origin_used_without_last_fix() {
    let route = route();
    let engine = NavigationEngine::new(quiet_options().with_enable_off_route_detection(false));
    let progress = record_progress(&engine);

    let b = destination(ORIGIN, 600.0, 90.0);
    let source = Arc::new(StaticLocationSource::new(vec![
        Location::at(destination(b, 200.0, 0.0)).with_bearing(0.0),
    ]));
    assert!(source.last_location().is_none());

    engine.start_navigation(route, source).await.unwrap();
    wait_until_finished(&engine).await;

    let progress = progress.lock();
    assert_eq!(progress.len(), 2);
    let (first_location, first_indices) = progress[0];
    assert_eq!(first_indices, NavigationIndices::START);
    assert!(distance(first_location.point(), ORIGIN) < 0.5);
}

#[tokio::test]
async fn test_last_fix_preferred_over_route_origin() {
    let route = route();
    let engine = NavigationEngine::new(quiet_options().with_enable_off_route_detection(false));
    let progress = record_progress(&engine);

    let seeded = Location::at(destination(ORIGIN, 250.0, 90.0)).with_bearing(90.0);
    let source = Arc::new(
        StaticLocationSource::new(vec![Location::at(destination(ORIGIN, 300.0, 90.0))])
            .with_last_location(seeded),
    );

    engine.start_navigation(route, source).await.unwrap();
    wait_until_finished(&engine).await;

    let progress = progress.lock();
    assert_eq!(progress.len(), 2);
    assert!(distance(progress[0].0.point(), seeded.point()) < 0.5);
}

#[tokio::test]
async fn test_failed_update_skips_tick_and_keeps_running() {
    let route = route();
    let engine = NavigationEngine::new(quiet_options().with_enable_off_route_detection(false));
    let log = record_events(&engine);
    let progress = record_progress(&engine);

    let first = Location::at(destination(ORIGIN, 100.0, 90.0)).with_bearing(90.0);
    let second = Location::at(destination(ORIGIN, 200.0, 90.0)).with_bearing(90.0);
    let source = Arc::new(
        StaticLocationSource::from_updates(vec![
            Ok(first),
            Err(LocationError::Unavailable),
            Ok(second),
        ])
        .with_interval(Duration::from_millis(20))
        .with_last_location(Location::at(ORIGIN)),
    );

    engine.start_navigation(route, source).await.unwrap();
    wait_until_finished(&engine).await;

    // Starting fix, then one tick per successful update
    assert_eq!(
        *log.lock(),
        vec!["running:true", "progress", "progress", "progress", "running:false"]
    );
    let progress = progress.lock();
    assert!(distance(progress[2].0.point(), second.point()) < 0.5);
}

// =============================================================================
// Milestones
// =============================================================================

#[tokio::test]
async fn test_step_milestone_fires_once_per_step() {
    let route = route();
    let engine = NavigationEngine::new(quiet_options());

    let always = Arc::new(
        StepMilestone::new(42).with_trigger(Trigger::gte(TriggerProperty::StepDistanceTotalMeters, 0.0)),
    );
    assert!(engine.add_milestone(always));

    let visited = Arc::new(Mutex::new(Vec::<NavigationIndices>::new()));
    let sink = Arc::clone(&visited);
    engine.add_progress_listener(Arc::new(move |_: &Location, progress: &RouteProgress| {
        let mut visited = sink.lock();
        if visited.last() != Some(&progress.indices) {
            visited.push(progress.indices);
        }
    }));
    let fired = Arc::new(Mutex::new(Vec::<NavigationIndices>::new()));
    let sink = Arc::clone(&fired);
    engine.add_milestone_listener(Arc::new(
        move |progress: &RouteProgress, _: &str, milestone: &dyn Milestone| {
            assert_eq!(milestone.identifier(), 42);
            sink.lock().push(progress.indices);
        },
    ));

    let source = Arc::new(ReplayRouteLocationSource::new(&route, 1_000.0, Duration::from_millis(20)).unwrap());
    engine.start_navigation(route, source).await.unwrap();
    wait_until_finished(&engine).await;

    assert_eq!(*fired.lock(), *visited.lock());
    assert_eq!(fired.lock().len(), 3);
}

#[tokio::test]
async fn test_duplicate_registration_ignored() {
    let engine = NavigationEngine::new(quiet_options());

    let milestone: Arc<dyn Milestone> = Arc::new(StepMilestone::new(7));
    assert!(engine.add_milestone(Arc::clone(&milestone)));
    assert!(!engine.add_milestone(Arc::clone(&milestone)));
    assert_eq!(engine.milestones().len(), 1);

    let listener: Arc<dyn navtrack::engine::RunningStateListener> = Arc::new(|_: bool| {});
    let first = engine.add_running_state_listener(Arc::clone(&listener));
    let second = engine.add_running_state_listener(listener);
    assert_eq!(first, second);
    assert_eq!(engine.dispatcher().listener_count(), 1);

    assert!(engine.remove_milestone(Some(&milestone)));
    assert!(engine.milestones().is_empty());
    assert!(engine.remove_running_state_listener(None));
    assert_eq!(engine.dispatcher().listener_count(), 0);
}

// =============================================================================
// Commands while running
// =============================================================================

#[tokio::test]
async fn test_update_indices_applies_on_next_fix() {
    let route = route();
    let engine = NavigationEngine::new(quiet_options().with_enable_off_route_detection(false));
    let source = Arc::new(
        StaticLocationSource::new(vec![Location::at(ORIGIN); 4]).with_interval(Duration::from_millis(50)),
    );

    engine.start_navigation(route, source).await.unwrap();
    engine.update_indices(0, 1).unwrap();
    wait_until_finished(&engine).await;

    assert_eq!(engine.progress().unwrap().indices, NavigationIndices::new(0, 1));
}

#[tokio::test]
async fn test_faster_route_reported_for_candidate() {
    let route = route();
    let options = quiet_options()
        .with_enable_faster_route_check(true)
        .with_faster_route_check_interval(Duration::from_millis(500))
        .with_faster_route_minimum_step_duration(0.0);

    let requests = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&requests);
    let engine = NavigationEngine::new(options).with_route_requester(Arc::new(
        move |_: &Location, _: &RouteProgress| {
            *sink.lock() += 1;
        },
    ));

    let found = Arc::new(Mutex::new(Vec::<Arc<Route>>::new()));
    let sink = Arc::clone(&found);
    engine.add_faster_route_listener(Arc::new(move |route: &Arc<Route>| {
        sink.lock().push(Arc::clone(route));
    }));

    let base = Location::at(ORIGIN).timestamp_ms;
    let fixes: Vec<Location> = (1..=200)
        .map(|i| Location::at(ORIGIN).with_timestamp_ms(base + i * 1_000))
        .collect();
    let source = Arc::new(StaticLocationSource::new(fixes).with_interval(Duration::from_millis(20)));
    engine.start_navigation(Arc::clone(&route), source).await.unwrap();

    wait_for(|| *requests.lock() > 0).await;

    let shortcut = Arc::new(
        RouteBuilder::new()
            .leg(vec![vec![ORIGIN, destination(ORIGIN, 100.0, 45.0)]])
            .speed(1_000.0)
            .build(),
    );
    engine.submit_candidate_route(Arc::clone(&shortcut)).unwrap();
    let slower = Arc::new(RouteBuilder::new().leg(vec![vec![ORIGIN, destination(ORIGIN, 5_000.0, 45.0)]]).build());
    engine.submit_candidate_route(slower).unwrap();

    wait_for(|| !found.lock().is_empty()).await;
    engine.stop_navigation().await;

    let found = found.lock();
    assert_eq!(found.len(), 1);
    assert!(Arc::ptr_eq(&found[0], &shortcut));
}
