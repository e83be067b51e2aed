//! Default values for navigation options.

use std::time::Duration;

// =============================================================================
// Maneuver completion
// =============================================================================

/// Maximum difference between the traveler's bearing and the maneuver exit
/// bearing for the maneuver to count as completed (degrees).
pub const DEFAULT_MAX_TURN_COMPLETION_OFFSET: f64 = 30.0;

/// Distance to the next maneuver within which completion is checked (meters).
pub const DEFAULT_MANEUVER_ZONE_RADIUS: f64 = 40.0;

// =============================================================================
// Off-route detection
// =============================================================================

/// Off-route detection enabled by default.
pub const DEFAULT_ENABLE_OFF_ROUTE_DETECTION: bool = true;

/// Base tolerance between the fix and the step geometry (meters).
pub const DEFAULT_OFF_ROUTE_MINIMUM_DISTANCE_IN_ROUTE: f64 = 20.0;

/// Distance the traveler must move after a reroute before the next
/// off-route decision (meters).
pub const DEFAULT_MINIMUM_DISTANCE_BEFORE_REROUTING: f64 = 50.0;

/// Distance travelled away from the maneuver that counts as off-route (meters).
pub const DEFAULT_MINIMUM_BACKUP_DISTANCE_FOR_OFF_ROUTE: f64 = 50.0;

/// Seconds of dead reckoning used to widen the tolerance at speed.
pub const DEFAULT_DEAD_RECKONING_TIME_INTERVAL: f64 = 1.0;

/// Steps past the upcoming one checked for a jump request.
pub const DEFAULT_OFF_ROUTE_LOOK_AHEAD_STEPS: usize = 3;

// =============================================================================
// Guidance
// =============================================================================

/// Report fixes snapped onto the route while on-route.
pub const DEFAULT_SNAP_TO_ROUTE: bool = true;

/// Register the voice and banner instruction milestones automatically.
pub const DEFAULT_MILESTONES_ENABLED: bool = true;

/// Leg distance remaining at which the final waypoint counts as reached (meters).
pub const DEFAULT_ARRIVAL_RADIUS: f64 = 25.0;

// =============================================================================
// Faster route
// =============================================================================

/// Faster-route checks are opt-in.
pub const DEFAULT_ENABLE_FASTER_ROUTE_CHECK: bool = false;

/// Minimum time between faster-route checks.
pub const DEFAULT_FASTER_ROUTE_CHECK_INTERVAL: Duration = Duration::from_secs(120);

/// Step duration remaining below which no faster-route check is made (seconds).
pub const DEFAULT_FASTER_ROUTE_MINIMUM_STEP_DURATION: f64 = 70.0;
