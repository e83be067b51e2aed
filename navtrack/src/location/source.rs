//! Location source abstraction.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::fix::Location;

/// Errors reported by a location source.
///
/// These arrive inside the subscription stream and are treated by the engine
/// as a tick with no event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// No fix is currently available (e.g. no satellite lock).
    #[error("Location unavailable")]
    Unavailable,

    /// The source has shut down.
    #[error("Location source closed")]
    SourceClosed,

    /// Provider-specific failure.
    #[error("Location provider error: {0}")]
    Provider(String),
}

/// Item type of a location subscription.
pub type LocationUpdate = Result<Location, LocationError>;

/// A cancelable stream of position fixes.
///
/// Implementations spawn their own producer and deliver fixes in order. The
/// producer must stop when `cancellation` fires or the receiver is dropped.
pub trait LocationSource: Send + Sync {
    /// Start a new subscription.
    ///
    /// Must be called from within a Tokio runtime.
    fn subscribe(&self, cancellation: CancellationToken) -> mpsc::Receiver<LocationUpdate>;

    /// The most recent fix delivered by this source, if any.
    fn last_location(&self) -> Option<Location>;
}

// Allow Arc<dyn LocationSource> and Arc<T> to be used as a source
impl<T: LocationSource + ?Sized> LocationSource for Arc<T> {
    fn subscribe(&self, cancellation: CancellationToken) -> mpsc::Receiver<LocationUpdate> {
        (**self).subscribe(cancellation)
    }

    fn last_location(&self) -> Option<Location> {
        (**self).last_location()
    }
}
