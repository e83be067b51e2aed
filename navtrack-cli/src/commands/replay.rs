//! Replay command - drive a full navigation session along a route file.
//!
//! Fixes are synthesized along the route geometry at a constant speed and fed
//! to the engine in real time. Progress, milestone and off-route events are
//! printed as they are delivered.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use navtrack::config::NavigationOptions;
use navtrack::engine::NavigationEngine;
use navtrack::location::{Location, ReplayRouteLocationSource};
use navtrack::milestone::Milestone;
use navtrack::navigation::RouteProgress;
use navtrack::route::Route;
use tokio::sync::mpsc;
use tracing::info;

use super::common::{format_distance, format_duration, load_route};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub route: PathBuf,
    pub speed: f64,
    pub interval_ms: u64,
    pub config: Option<PathBuf>,
    pub no_snap: bool,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("replay");

    let mut options = runner.options().clone();
    if args.no_snap {
        options = options.with_snap_to_route(false);
    }

    let route = Arc::new(load_route(&args.route)?);
    let interval = Duration::from_millis(args.interval_ms.max(1));
    let source = Arc::new(ReplayRouteLocationSource::new(&route, args.speed, interval)?);

    println!(
        "Replaying {} ({}) with {} fixes every {} ms",
        args.route.display(),
        format_distance(route.distance),
        source.len(),
        interval.as_millis()
    );

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    runtime.block_on(replay(route, source, options))
}

async fn replay(
    route: Arc<Route>,
    source: Arc<ReplayRouteLocationSource>,
    options: NavigationOptions,
) -> Result<(), CliError> {
    let engine = NavigationEngine::new(options);

    engine.add_progress_listener(Arc::new(|location: &Location, progress: &RouteProgress| {
        println!(
            "[{}] {:>9} left on step, {:>9} to go ({:.6}, {:.6})",
            progress.indices,
            format_distance(progress.step_distance_remaining),
            format_distance(progress.distance_remaining),
            location.latitude,
            location.longitude
        );
    }));
    engine.add_milestone_listener(Arc::new(
        |progress: &RouteProgress, instruction: &str, milestone: &dyn Milestone| {
            println!(
                "[{}] milestone {}: {}",
                progress.indices,
                milestone.identifier(),
                instruction
            );
        },
    ));
    engine.add_off_route_listener(Arc::new(|location: &Location| {
        println!(
            "OFF ROUTE at ({:.6}, {:.6})",
            location.latitude, location.longitude
        );
    }));

    let (finished_tx, mut finished_rx) = mpsc::unbounded_channel();
    engine.add_running_state_listener(Arc::new(move |running: bool| {
        if !running {
            let _ = finished_tx.send(());
        }
    }));

    engine.start_navigation(route, source).await?;
    finished_rx.recv().await;
    engine.stop_navigation().await;

    match engine.progress() {
        Some(progress) => {
            info!(
                indices = %progress.indices,
                distance_remaining = progress.distance_remaining,
                arrived = progress.has_arrived(),
                "Replay finished"
            );
            println!();
            println!(
                "Finished at {} with {} ({}) remaining{}",
                progress.indices,
                format_distance(progress.distance_remaining),
                format_duration(progress.duration_remaining()),
                if progress.has_arrived() { ", arrived" } else { "" }
            );
        }
        None => println!("No progress was computed"),
    }

    Ok(())
}
