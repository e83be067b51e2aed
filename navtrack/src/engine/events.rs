//! Events produced by the navigation worker.

use std::fmt;
use std::sync::Arc;

use crate::location::Location;
use crate::milestone::Milestone;
use crate::navigation::RouteProgress;
use crate::route::Route;

/// One unit of output from a tick, delivered to listeners in production order.
#[derive(Clone)]
pub enum NavigationEvent {
    /// New progress for the reported (raw or snapped) location.
    Progress {
        location: Location,
        progress: RouteProgress,
    },
    /// A milestone fired. `instruction` is empty when the milestone has none.
    Milestone {
        progress: RouteProgress,
        instruction: String,
        milestone: Arc<dyn Milestone>,
    },
    /// The traveler left the route.
    OffRoute { location: Location },
    /// A submitted candidate route is faster than the current one.
    FasterRoute { route: Arc<Route> },
    /// The worker started or stopped.
    RunningState { running: bool },
}

impl NavigationEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NavigationEvent::Progress { .. } => "progress",
            NavigationEvent::Milestone { .. } => "milestone",
            NavigationEvent::OffRoute { .. } => "off_route",
            NavigationEvent::FasterRoute { .. } => "faster_route",
            NavigationEvent::RunningState { .. } => "running_state",
        }
    }
}

impl fmt::Debug for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationEvent::Progress { location, progress } => f
                .debug_struct("Progress")
                .field("location", location)
                .field("indices", &progress.indices)
                .field("distance_remaining", &progress.distance_remaining)
                .finish(),
            NavigationEvent::Milestone {
                progress,
                instruction,
                milestone,
            } => f
                .debug_struct("Milestone")
                .field("identifier", &milestone.identifier())
                .field("instruction", instruction)
                .field("indices", &progress.indices)
                .finish(),
            NavigationEvent::OffRoute { location } => {
                f.debug_struct("OffRoute").field("location", location).finish()
            }
            NavigationEvent::FasterRoute { route } => f
                .debug_struct("FasterRoute")
                .field("duration", &route.duration)
                .field("distance", &route.distance)
                .finish(),
            NavigationEvent::RunningState { running } => f
                .debug_struct("RunningState")
                .field("running", running)
                .finish(),
        }
    }
}
