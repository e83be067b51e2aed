//! Snapping fixes onto the route line.

use crate::geometry::{along, bearing, nearest_point_on_line};
use crate::location::Location;

use super::progress::RouteProgress;

/// Meters ahead of the snapped position used to derive the snapped bearing.
const BEARING_LOOK_AHEAD: f64 = 1.0;

/// Replaces a raw fix with its projection onto the current step.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapToRoute;

impl SnapToRoute {
    /// Create a snapper.
    pub fn new() -> Self {
        Self
    }

    /// Snap `location` onto the current step of `progress`.
    ///
    /// Position comes from the nearest point on the step; bearing from the
    /// step line one meter past the distance travelled. Fields that cannot
    /// be derived keep their raw values.
    pub fn snap(&self, location: &Location, progress: &RouteProgress) -> Location {
        let points = &progress.current_step_points;
        let mut snapped = *location;

        if let Some(nearest) = nearest_point_on_line(location.point(), points) {
            snapped.latitude = nearest.point.latitude;
            snapped.longitude = nearest.point.longitude;
        }

        let traveled = progress.step_distance_traveled();
        if let (Some(current), Some(ahead)) = (
            along(points, traveled),
            along(points, traveled + BEARING_LOOK_AHEAD),
        ) {
            if current != ahead {
                snapped.bearing = Some(bearing(current, ahead));
            }
        }

        snapped
    }
}
