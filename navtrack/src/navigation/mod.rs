//! Route progress computation.
//!
//! Turns a raw location fix plus the active route into a [`RouteProgress`]
//! snapshot, and decides whether the traveler has left the route or should
//! be offered a faster one.
//!
//! # Architecture
//!
//! ```text
//! Location ──► NavigationRouteProcessor ──► RouteProgress
//!                   │   ▲                        │
//!                   │   └── IndexRequest ◄───────┤
//!                   ▼                            ▼
//!               helper fns             OffRouteDetector
//!                                      FasterRouteDetector
//!                                      SnapToRoute
//! ```
//!
//! The processor owns the mutable cursor (leg and step indices plus the
//! cached step geometry). Everything else is a pure function of its inputs
//! or holds only its own small state.
//!
//! # Usage
//!
//! ```ignore
//! use navtrack::navigation::NavigationRouteProcessor;
//!
//! let mut processor = NavigationRouteProcessor::new(&options);
//! let progress = processor.build_new_progress(&route, &location)?;
//! println!("{} m remaining", progress.distance_remaining);
//! ```

mod error;
mod faster_route;
pub mod helper;
mod indices;
mod off_route;
mod processor;
mod progress;
mod snap;

pub use error::NavigationError;
pub use faster_route::{FasterRouteDetector, RouteRequester};
pub use indices::NavigationIndices;
pub use off_route::{OffRouteDetector, OffRouteStatus};
pub use processor::{IndexRequest, NavigationRouteProcessor};
pub use progress::{CurrentLegAnnotation, RouteProgress};
pub use snap::SnapToRoute;
