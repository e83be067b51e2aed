//! Route data model.
//!
//! Immutable value objects describing a precomputed route, deserializable
//! from the directions-service JSON shape:
//!
//! ```text
//! Route
//!  └─ RouteLeg (one per waypoint pair)
//!      ├─ LegAnnotation (per-coordinate distance/duration/speed/congestion)
//!      └─ LegStep (one per maneuver)
//!          ├─ StepManeuver
//!          ├─ StepIntersection*
//!          ├─ VoiceInstructions*
//!          └─ BannerInstructions*
//! ```
//!
//! The progress engine never mutates these; a route is shared as `Arc<Route>`.

mod annotation;
mod builder;
mod compare;
mod instructions;
mod model;

pub use annotation::{LegAnnotation, MaxSpeed};
pub use builder::RouteBuilder;
pub use compare::is_new_route;
pub use instructions::{BannerInstructions, BannerText, DistanceAlongGeometry, VoiceInstructions};
pub use model::{
    Admin, Closure, Incident, IntersectionLanes, LegStep, Route, RouteLeg, StepIntersection,
    StepManeuver,
};
