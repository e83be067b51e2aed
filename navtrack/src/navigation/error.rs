//! Navigation error types.

use thiserror::Error;

use crate::geometry::PolylineError;

/// Errors from the navigation engine and route processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    /// An operation needs a route but none is active.
    #[error("No active route")]
    NoActiveRoute,

    /// An operation needs the navigation worker but it is not running.
    #[error("Navigation is not running")]
    NotRunning,

    /// Requested indices are outside the active route.
    #[error("Invalid indices: leg {leg_index} step {step_index} is outside the route")]
    InvalidIndices { leg_index: usize, step_index: usize },

    /// Step geometry could not be decoded.
    #[error("Invalid step geometry: {0}")]
    Geometry(#[from] PolylineError),

    /// The route cannot be navigated.
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// The navigation worker stopped accepting commands.
    #[error("Navigation worker unavailable")]
    WorkerUnavailable,
}
