//! Location fixes and the sources that produce them.
//!
//! The engine consumes position fixes through the [`LocationSource`] trait: a
//! cancelable subscription delivering `Result<Location, LocationError>` items
//! in order, plus an on-demand last-known-fix query.
//!
//! Two sources ship with the crate:
//!
//! - [`StaticLocationSource`] - plays back a fixed list (tests, recorded traces)
//! - [`ReplayRouteLocationSource`] - simulates travel along a route's geometry

mod fix;
mod replay;
mod source;
mod static_source;

pub use fix::Location;
pub use replay::{ReplayRouteLocationSource, DEFAULT_REPLAY_INTERVAL, DEFAULT_REPLAY_SPEED};
pub use source::{LocationError, LocationSource, LocationUpdate};
pub use static_source::StaticLocationSource;
