//! Navigation engine.
//!
//! Connects a [`LocationSource`](crate::location::LocationSource) to the
//! progress pipeline and fans the results out to listeners.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        NavigationEngine                          │
//! │                                                                  │
//! │  LocationSource ──► Worker task ──────► event channel ──► Delivery task
//! │                      │  NavigationPipeline                  │   │
//! │  API commands ──────►│  MilestoneRegistry (snapshot/tick)   ▼   │
//! │  (index override,    │                               EventDispatcher
//! │   candidate routes)  │                                   listeners
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use navtrack::engine::NavigationEngine;
//!
//! let engine = NavigationEngine::new(options);
//! engine.add_progress_listener(Arc::new(|location: &Location, progress: &RouteProgress| {
//!     println!("{:.0} m remaining", progress.distance_remaining);
//! }));
//! engine.start_navigation(route, source).await?;
//! // ...
//! engine.stop_navigation().await;
//! ```

mod dispatcher;
mod events;
mod navigation_engine;
mod pipeline;
mod registry;

pub use dispatcher::{
    EventDispatcher, FasterRouteListener, ListenerId, MilestoneEventListener, OffRouteListener,
    ProgressListener, RunningStateListener,
};
pub use events::NavigationEvent;
pub use navigation_engine::NavigationEngine;
pub use pipeline::{NavigationPipeline, TickOutcome};
pub use registry::MilestoneRegistry;
