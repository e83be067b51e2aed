//! The navigation engine: worker lifecycle and public API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::NavigationOptions;
use crate::location::{Location, LocationSource};
use crate::milestone::{BannerInstructionMilestone, Milestone, VoiceInstructionMilestone};
use crate::navigation::{
    IndexRequest, NavigationError, NavigationIndices, RouteProgress, RouteRequester,
};
use crate::route::Route;

use super::dispatcher::{
    EventDispatcher, FasterRouteListener, ListenerId, MilestoneEventListener, OffRouteListener,
    ProgressListener, RunningStateListener,
};
use super::events::NavigationEvent;
use super::pipeline::NavigationPipeline;
use super::registry::MilestoneRegistry;

/// Requests from the public API to the worker.
#[derive(Debug)]
enum Command {
    JumpTo(NavigationIndices),
    Candidate(Arc<Route>),
}

/// A running worker and its event delivery task.
struct Session {
    commands: mpsc::UnboundedSender<Command>,
    cancellation: CancellationToken,
    worker: JoinHandle<()>,
    delivery: JoinHandle<()>,
}

/// Turn-by-turn navigation over a location stream.
///
/// One worker task consumes fixes strictly in order and runs each through
/// the [`NavigationPipeline`]. Events go through a channel to a second task
/// that calls the registered listeners, so listener work never delays the
/// next fix and the per-tick order (progress, milestones, off-route) is kept.
///
/// # Lifecycle
///
/// 1. **Creation**: `new()` registers the default milestones if enabled
/// 2. **Start**: `start_navigation()` subscribes to the source and spawns the worker
/// 3. **Stop**: `stop_navigation()` cancels the subscription and waits for delivery
///
/// Progress state survives a stop/start cycle; it is reset only when the
/// route passed to `start_navigation()` is a new route.
pub struct NavigationEngine {
    options: NavigationOptions,
    dispatcher: Arc<EventDispatcher>,
    milestones: Arc<MilestoneRegistry>,
    pipeline: Arc<Mutex<NavigationPipeline>>,
    route_requester: Option<Arc<dyn RouteRequester>>,
    running: Arc<AtomicBool>,
    route: Mutex<Option<Arc<Route>>>,
    session: Mutex<Option<Session>>,
}

impl NavigationEngine {
    /// Create an engine.
    pub fn new(options: NavigationOptions) -> Self {
        let milestones = Arc::new(MilestoneRegistry::new());
        if options.default_milestones_enabled() {
            milestones.add(Arc::new(VoiceInstructionMilestone::new()));
            milestones.add(Arc::new(BannerInstructionMilestone::new()));
        }

        Self {
            pipeline: Arc::new(Mutex::new(NavigationPipeline::new(&options))),
            options,
            dispatcher: Arc::new(EventDispatcher::new()),
            milestones,
            route_requester: None,
            running: Arc::new(AtomicBool::new(false)),
            route: Mutex::new(None),
            session: Mutex::new(None),
        }
    }

    /// Ask `requester` for candidate routes when a faster-route check is due.
    pub fn with_route_requester(mut self, requester: Arc<dyn RouteRequester>) -> Self {
        self.route_requester = Some(requester);
        self
    }

    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    /// The listener registry. The `add_*`/`remove_*` methods below delegate here.
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Whether the worker is consuming fixes.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The route being navigated.
    pub fn route(&self) -> Option<Arc<Route>> {
        self.route.lock().clone()
    }

    /// Progress from the most recent tick.
    pub fn progress(&self) -> Option<RouteProgress> {
        self.pipeline.lock().previous_progress().cloned()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Start navigating `route` with fixes from `source`.
    ///
    /// A running session is replaced. Must be called from within a Tokio
    /// runtime.
    pub async fn start_navigation(
        &self,
        route: Arc<Route>,
        source: Arc<dyn LocationSource>,
    ) -> Result<(), NavigationError> {
        if route.step_count() == 0 {
            return Err(NavigationError::InvalidRoute("route has no steps".to_string()));
        }

        let was_running = self.shutdown_session().await;

        info!(
            legs = route.legs.len(),
            steps = route.step_count(),
            distance = route.distance,
            "Starting navigation"
        );
        *self.route.lock() = Some(Arc::clone(&route));

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<NavigationEvent>();
        let cancellation = CancellationToken::new();

        self.running.store(true, Ordering::SeqCst);
        if !was_running {
            self.dispatcher
                .dispatch(&NavigationEvent::RunningState { running: true });
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let delivery = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                dispatcher.dispatch(&event);
            }
        });

        let worker = Worker {
            pipeline: Arc::clone(&self.pipeline),
            route,
            source,
            milestones: Arc::clone(&self.milestones),
            route_requester: self.route_requester.clone(),
            events: event_tx,
            running: Arc::clone(&self.running),
        };
        let worker_cancellation = cancellation.clone();
        let worker = tokio::spawn(async move {
            worker.run(command_rx, worker_cancellation).await;
        });

        *self.session.lock() = Some(Session {
            commands: command_tx,
            cancellation,
            worker,
            delivery,
        });

        Ok(())
    }

    /// Stop navigating.
    ///
    /// Cancels the location subscription, discards further fixes, and returns
    /// once every event from completed ticks has been delivered.
    pub async fn stop_navigation(&self) {
        if self.shutdown_session().await {
            self.dispatcher
                .dispatch(&NavigationEvent::RunningState { running: false });
        }
        info!("Navigation stopped");
    }

    /// Tear down the current session. Returns whether the worker was running.
    async fn shutdown_session(&self) -> bool {
        let session = self.session.lock().take();
        let Some(session) = session else {
            return false;
        };

        session.cancellation.cancel();
        let was_running = self.running.swap(false, Ordering::SeqCst);

        if let Err(e) = session.worker.await {
            error!("Navigation worker panicked: {}", e);
        }
        if let Err(e) = session.delivery.await {
            error!("Event delivery task panicked: {}", e);
        }

        debug!(was_running, "Navigation session shut down");
        was_running
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Move navigation to an explicit leg and step, e.g. to skip a waypoint.
    ///
    /// Takes effect on the next fix.
    pub fn update_indices(&self, leg_index: usize, step_index: usize) -> Result<(), NavigationError> {
        let route = self.route().ok_or(NavigationError::NoActiveRoute)?;
        if !self.is_running() {
            return Err(NavigationError::NotRunning);
        }

        let target = NavigationIndices::new(leg_index, step_index);
        if !target.is_valid_for(&route) {
            return Err(NavigationError::InvalidIndices {
                leg_index,
                step_index,
            });
        }

        info!(%target, "Index override requested");
        self.send(Command::JumpTo(target))
    }

    /// Hand a candidate route to the worker for the faster-route check.
    pub fn submit_candidate_route(&self, candidate: Arc<Route>) -> Result<(), NavigationError> {
        if !self.is_running() {
            return Err(NavigationError::NotRunning);
        }
        self.send(Command::Candidate(candidate))
    }

    fn send(&self, command: Command) -> Result<(), NavigationError> {
        let session = self.session.lock();
        let session = session.as_ref().ok_or(NavigationError::NotRunning)?;
        session
            .commands
            .send(command)
            .map_err(|_| NavigationError::WorkerUnavailable)
    }

    // -------------------------------------------------------------------------
    // Milestones
    // -------------------------------------------------------------------------

    /// Register a milestone. Returns false if this instance is already registered.
    pub fn add_milestone(&self, milestone: Arc<dyn Milestone>) -> bool {
        self.milestones.add(milestone)
    }

    /// Register several milestones. Returns how many were new.
    pub fn add_milestones(&self, milestones: Vec<Arc<dyn Milestone>>) -> usize {
        self.milestones.add_all(milestones)
    }

    /// Remove one milestone instance, or all milestones when `None`.
    pub fn remove_milestone(&self, milestone: Option<&Arc<dyn Milestone>>) -> bool {
        self.milestones.remove(milestone)
    }

    /// Remove every milestone with `identifier`.
    pub fn remove_milestone_by_identifier(&self, identifier: u32) -> usize {
        self.milestones.remove_by_identifier(identifier)
    }

    /// Registered milestones in evaluation order.
    pub fn milestones(&self) -> Vec<Arc<dyn Milestone>> {
        self.milestones.snapshot()
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    pub fn add_progress_listener(&self, listener: Arc<dyn ProgressListener>) -> ListenerId {
        self.dispatcher.add_progress_listener(listener)
    }

    pub fn remove_progress_listener(&self, id: Option<ListenerId>) -> bool {
        self.dispatcher.remove_progress_listener(id)
    }

    pub fn add_milestone_listener(&self, listener: Arc<dyn MilestoneEventListener>) -> ListenerId {
        self.dispatcher.add_milestone_listener(listener)
    }

    pub fn remove_milestone_listener(&self, id: Option<ListenerId>) -> bool {
        self.dispatcher.remove_milestone_listener(id)
    }

    pub fn add_off_route_listener(&self, listener: Arc<dyn OffRouteListener>) -> ListenerId {
        self.dispatcher.add_off_route_listener(listener)
    }

    pub fn remove_off_route_listener(&self, id: Option<ListenerId>) -> bool {
        self.dispatcher.remove_off_route_listener(id)
    }

    pub fn add_faster_route_listener(&self, listener: Arc<dyn FasterRouteListener>) -> ListenerId {
        self.dispatcher.add_faster_route_listener(listener)
    }

    pub fn remove_faster_route_listener(&self, id: Option<ListenerId>) -> bool {
        self.dispatcher.remove_faster_route_listener(id)
    }

    pub fn add_running_state_listener(&self, listener: Arc<dyn RunningStateListener>) -> ListenerId {
        self.dispatcher.add_running_state_listener(listener)
    }

    pub fn remove_running_state_listener(&self, id: Option<ListenerId>) -> bool {
        self.dispatcher.remove_running_state_listener(id)
    }
}

impl Drop for NavigationEngine {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.cancellation.cancel();
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

struct Worker {
    pipeline: Arc<Mutex<NavigationPipeline>>,
    route: Arc<Route>,
    source: Arc<dyn LocationSource>,
    milestones: Arc<MilestoneRegistry>,
    route_requester: Option<Arc<dyn RouteRequester>>,
    events: mpsc::UnboundedSender<NavigationEvent>,
    running: Arc<AtomicBool>,
}

impl Worker {
    async fn run(self, mut commands: mpsc::UnboundedReceiver<Command>, cancellation: CancellationToken) {
        debug!("Navigation worker starting");

        // Read before subscribing so the first streamed fix is not counted twice
        let starting_fix = self
            .source
            .last_location()
            .or_else(|| self.route.origin().map(Location::at));
        let mut fixes = self.source.subscribe(cancellation.child_token());

        if let Some(location) = starting_fix {
            self.process(&location);
        }

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    debug!("Navigation worker cancelled");
                    return;
                }

                Some(command) = commands.recv() => {
                    self.handle_command(command);
                }

                update = fixes.recv() => match update {
                    Some(Ok(location)) => self.process(&location),
                    Some(Err(e)) => warn!(error = %e, "Location update failed, skipping tick"),
                    None => {
                        info!("Location stream ended");
                        break;
                    }
                },
            }
        }

        if self.running.swap(false, Ordering::SeqCst) {
            let stopped = NavigationEvent::RunningState { running: false };
            if self.events.send(stopped).is_err() {
                debug!("Event delivery stopped, running-state change not delivered");
            }
        }
    }

    fn process(&self, location: &Location) {
        let milestones = self.milestones.snapshot();
        let outcome = self.pipeline.lock().tick(&self.route, location, &milestones);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Tick failed, keeping previous progress");
                return;
            }
        };

        if outcome.check_faster_route {
            if let Some(requester) = &self.route_requester {
                debug!(indices = %outcome.progress.indices, "Requesting candidate route");
                requester.request_route(location, &outcome.progress);
            }
        }

        for event in outcome.events {
            if self.events.send(event).is_err() {
                warn!("Event delivery stopped, dropping events");
                break;
            }
        }
    }

    fn handle_command(&self, command: Command) {
        match command {
            Command::JumpTo(target) => {
                match self.pipeline.lock().apply_request(IndexRequest::JumpTo(target)) {
                    Ok(indices) => info!(%indices, "Index override applied"),
                    Err(e) => warn!(error = %e, "Index override rejected"),
                }
            }
            Command::Candidate(candidate) => {
                if self.pipeline.lock().is_faster_route(&candidate) {
                    info!(
                        duration = candidate.duration,
                        distance = candidate.distance,
                        "Faster route found"
                    );
                    let event = NavigationEvent::FasterRoute { route: candidate };
                    if self.events.send(event).is_err() {
                        debug!("Event delivery stopped, faster route not delivered");
                    }
                } else {
                    debug!(duration = candidate.duration, "Candidate route is not faster");
                }
            }
        }
    }
}
