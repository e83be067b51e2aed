//! Listener registry and event fan-out.
//!
//! Each listener kind has its own set. Registration returns a [`ListenerId`]
//! used for removal; registering the same `Arc` twice is a no-op that logs a
//! warning and returns the original id. Removing with `None` clears every
//! listener of that kind.
//!
//! Listeners are called outside the registry lock, so a listener may add or
//! remove listeners from inside a callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::location::Location;
use crate::milestone::Milestone;
use crate::navigation::RouteProgress;
use crate::route::Route;

use super::events::NavigationEvent;

// =============================================================================
// Listener traits
// =============================================================================

/// Receives every progress update.
pub trait ProgressListener: Send + Sync {
    fn on_progress_change(&self, location: &Location, progress: &RouteProgress);
}

/// Receives fired milestones.
pub trait MilestoneEventListener: Send + Sync {
    fn on_milestone_event(&self, progress: &RouteProgress, instruction: &str, milestone: &dyn Milestone);
}

/// Notified when the traveler leaves the route.
pub trait OffRouteListener: Send + Sync {
    fn user_off_route(&self, location: &Location);
}

/// Notified when a faster route has been found.
pub trait FasterRouteListener: Send + Sync {
    fn faster_route_found(&self, route: &Arc<Route>);
}

/// Notified when the navigation worker starts or stops.
pub trait RunningStateListener: Send + Sync {
    fn on_running_state_change(&self, running: bool);
}

impl<F> ProgressListener for F
where
    F: Fn(&Location, &RouteProgress) + Send + Sync,
{
    fn on_progress_change(&self, location: &Location, progress: &RouteProgress) {
        self(location, progress)
    }
}

impl<F> MilestoneEventListener for F
where
    F: Fn(&RouteProgress, &str, &dyn Milestone) + Send + Sync,
{
    fn on_milestone_event(&self, progress: &RouteProgress, instruction: &str, milestone: &dyn Milestone) {
        self(progress, instruction, milestone)
    }
}

impl<F> OffRouteListener for F
where
    F: Fn(&Location) + Send + Sync,
{
    fn user_off_route(&self, location: &Location) {
        self(location)
    }
}

impl<F> FasterRouteListener for F
where
    F: Fn(&Arc<Route>) + Send + Sync,
{
    fn faster_route_found(&self, route: &Arc<Route>) {
        self(route)
    }
}

impl<F> RunningStateListener for F
where
    F: Fn(bool) + Send + Sync,
{
    fn on_running_state_change(&self, running: bool) {
        self(running)
    }
}

// =============================================================================
// Listener sets
// =============================================================================

/// Handle returned by listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Whether two `Arc`s point at the same allocation, ignoring vtables.
pub(crate) fn same_allocation<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

struct ListenerSet<L: ?Sized> {
    kind: &'static str,
    entries: Mutex<Vec<(ListenerId, Arc<L>)>>,
}

impl<L: ?Sized> ListenerSet<L> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, listener: Arc<L>, next_id: &AtomicU64) -> ListenerId {
        let mut entries = self.entries.lock();
        if let Some((id, _)) = entries.iter().find(|(_, l)| same_allocation(l, &listener)) {
            warn!(kind = self.kind, "Listener already registered, ignoring");
            return *id;
        }
        let id = ListenerId(next_id.fetch_add(1, Ordering::Relaxed));
        entries.push((id, listener));
        id
    }

    fn remove(&self, id: Option<ListenerId>) -> bool {
        let mut entries = self.entries.lock();
        match id {
            None => {
                let removed = !entries.is_empty();
                entries.clear();
                removed
            }
            Some(id) => {
                let before = entries.len();
                entries.retain(|(existing, _)| *existing != id);
                entries.len() != before
            }
        }
    }

    fn snapshot(&self) -> Vec<Arc<L>> {
        self.entries.lock().iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Fan-out of navigation events to registered listeners.
pub struct EventDispatcher {
    next_id: AtomicU64,
    progress: ListenerSet<dyn ProgressListener>,
    milestone: ListenerSet<dyn MilestoneEventListener>,
    off_route: ListenerSet<dyn OffRouteListener>,
    faster_route: ListenerSet<dyn FasterRouteListener>,
    running_state: ListenerSet<dyn RunningStateListener>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            progress: ListenerSet::new("progress"),
            milestone: ListenerSet::new("milestone"),
            off_route: ListenerSet::new("off_route"),
            faster_route: ListenerSet::new("faster_route"),
            running_state: ListenerSet::new("running_state"),
        }
    }

    pub fn add_progress_listener(&self, listener: Arc<dyn ProgressListener>) -> ListenerId {
        self.progress.add(listener, &self.next_id)
    }

    pub fn remove_progress_listener(&self, id: Option<ListenerId>) -> bool {
        self.progress.remove(id)
    }

    pub fn add_milestone_listener(&self, listener: Arc<dyn MilestoneEventListener>) -> ListenerId {
        self.milestone.add(listener, &self.next_id)
    }

    pub fn remove_milestone_listener(&self, id: Option<ListenerId>) -> bool {
        self.milestone.remove(id)
    }

    pub fn add_off_route_listener(&self, listener: Arc<dyn OffRouteListener>) -> ListenerId {
        self.off_route.add(listener, &self.next_id)
    }

    pub fn remove_off_route_listener(&self, id: Option<ListenerId>) -> bool {
        self.off_route.remove(id)
    }

    pub fn add_faster_route_listener(&self, listener: Arc<dyn FasterRouteListener>) -> ListenerId {
        self.faster_route.add(listener, &self.next_id)
    }

    pub fn remove_faster_route_listener(&self, id: Option<ListenerId>) -> bool {
        self.faster_route.remove(id)
    }

    pub fn add_running_state_listener(&self, listener: Arc<dyn RunningStateListener>) -> ListenerId {
        self.running_state.add(listener, &self.next_id)
    }

    pub fn remove_running_state_listener(&self, id: Option<ListenerId>) -> bool {
        self.running_state.remove(id)
    }

    /// Total number of registered listeners of every kind.
    pub fn listener_count(&self) -> usize {
        self.progress.len()
            + self.milestone.len()
            + self.off_route.len()
            + self.faster_route.len()
            + self.running_state.len()
    }

    /// Deliver one event to every listener of its kind, in registration order.
    pub fn dispatch(&self, event: &NavigationEvent) {
        trace!(kind = event.kind(), "Dispatching event");
        match event {
            NavigationEvent::Progress { location, progress } => {
                for listener in self.progress.snapshot() {
                    listener.on_progress_change(location, progress);
                }
            }
            NavigationEvent::Milestone {
                progress,
                instruction,
                milestone,
            } => {
                for listener in self.milestone.snapshot() {
                    listener.on_milestone_event(progress, instruction, milestone.as_ref());
                }
            }
            NavigationEvent::OffRoute { location } => {
                for listener in self.off_route.snapshot() {
                    listener.user_off_route(location);
                }
            }
            NavigationEvent::FasterRoute { route } => {
                for listener in self.faster_route.snapshot() {
                    listener.faster_route_found(route);
                }
            }
            NavigationEvent::RunningState { running } => {
                for listener in self.running_state.snapshot() {
                    listener.on_running_state_change(*running);
                }
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
