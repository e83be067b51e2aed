//! The per-fix navigation pipeline.
//!
//! # Tick order
//!
//! ```text
//! fix ──► NavigationRouteProcessor ──► RouteProgress
//!              │
//!              ├─► OffRouteDetector ──► index request (applied for the next tick)
//!              ├─► milestones (registration order)
//!              ├─► snap-to-route (on-route only)
//!              └─► faster-route check
//!
//! events: Progress, Milestone*, OffRoute?
//! ```
//!
//! The pipeline owns all per-session state and is driven by exactly one
//! worker, one fix at a time.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::NavigationOptions;
use crate::location::Location;
use crate::milestone::Milestone;
use crate::navigation::{
    FasterRouteDetector, IndexRequest, NavigationError, NavigationIndices, NavigationRouteProcessor,
    OffRouteDetector, OffRouteStatus, RouteProgress, SnapToRoute,
};
use crate::route::{is_new_route, Route};

use super::events::NavigationEvent;

/// Everything one tick produced.
#[derive(Debug)]
pub struct TickOutcome {
    /// Progress computed for the fix.
    pub progress: RouteProgress,
    /// The location reported to listeners, raw or snapped.
    pub location: Location,
    /// Off-route verdict for the fix.
    pub off_route: OffRouteStatus,
    /// Events in delivery order.
    pub events: Vec<NavigationEvent>,
    /// Whether a faster route should be requested now.
    pub check_faster_route: bool,
}

/// Per-session navigation state and the tick algorithm.
pub struct NavigationPipeline {
    snap_to_route: bool,
    processor: NavigationRouteProcessor,
    off_route: OffRouteDetector,
    faster_route: FasterRouteDetector,
    snap: SnapToRoute,
    previous: Option<RouteProgress>,
}

impl NavigationPipeline {
    pub fn new(options: &NavigationOptions) -> Self {
        Self {
            snap_to_route: options.snap_to_route(),
            processor: NavigationRouteProcessor::new(options),
            off_route: OffRouteDetector::new(options.clone()),
            faster_route: FasterRouteDetector::new(options.clone()),
            snap: SnapToRoute::new(),
            previous: None,
        }
    }

    /// Progress from the last successful tick.
    pub fn previous_progress(&self) -> Option<&RouteProgress> {
        self.previous.as_ref()
    }

    /// Indices the next tick will start from.
    pub fn indices(&self) -> NavigationIndices {
        self.processor.indices()
    }

    /// Run one fix through the pipeline.
    ///
    /// On error nothing is emitted and the previous progress is kept.
    pub fn tick(
        &mut self,
        route: &Arc<Route>,
        location: &Location,
        milestones: &[Arc<dyn Milestone>],
    ) -> Result<TickOutcome, NavigationError> {
        if is_new_route(self.previous.as_ref().map(|p| &p.route), route) {
            self.previous = None;
            self.off_route.clear();
            self.faster_route.clear();
        }

        let progress = self.processor.build_new_progress(route, location)?;

        let off_route = self.off_route.check(location, &progress);
        match off_route {
            OffRouteStatus::RequestAdvance => self.request(IndexRequest::Advance),
            OffRouteStatus::RequestJump(target) => self.request(IndexRequest::JumpTo(target)),
            OffRouteStatus::OnRoute | OffRouteStatus::OffRoute => {}
        }

        let previous = self.previous.as_ref();
        let mut fired: Vec<NavigationEvent> = Vec::new();
        for milestone in milestones {
            if milestone.is_occurring(previous, &progress) {
                let instruction = milestone.instruction(&progress).unwrap_or_default();
                debug!(
                    identifier = milestone.identifier(),
                    %instruction,
                    "Milestone fired"
                );
                fired.push(NavigationEvent::Milestone {
                    progress: progress.clone(),
                    instruction,
                    milestone: Arc::clone(milestone),
                });
            }
        }

        let reported = if self.snap_to_route && !off_route.is_off_route() {
            self.snap.snap(location, &progress)
        } else {
            *location
        };

        let check_faster_route =
            self.faster_route
                .should_check_faster_route(location, &progress, off_route.is_off_route());

        let mut events = Vec::with_capacity(fired.len() + 2);
        events.push(NavigationEvent::Progress {
            location: reported,
            progress: progress.clone(),
        });
        events.extend(fired);
        if off_route.is_off_route() {
            events.push(NavigationEvent::OffRoute { location: *location });
        }

        trace!(
            indices = %progress.indices,
            events = events.len(),
            ?off_route,
            "Tick complete"
        );

        self.previous = Some(progress.clone());

        Ok(TickOutcome {
            progress,
            location: reported,
            off_route,
            events,
            check_faster_route,
        })
    }

    /// Apply a manual index override for the next tick.
    pub fn apply_request(
        &mut self,
        request: IndexRequest,
    ) -> Result<NavigationIndices, NavigationError> {
        self.processor.apply_request(request)
    }

    /// Whether `candidate` beats the current route from the last progress.
    pub fn is_faster_route(&self, candidate: &Route) -> bool {
        self.previous
            .as_ref()
            .is_some_and(|progress| self.faster_route.is_faster_route(progress, candidate))
    }

    fn request(&mut self, request: IndexRequest) {
        if let Err(e) = self.processor.apply_request(request) {
            warn!(error = %e, ?request, "Off-route index request rejected");
        }
    }
}
