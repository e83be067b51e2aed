//! Navigation session options.

use std::time::Duration;

use super::defaults::*;

/// Recognized options for a navigation session.
///
/// Groups every tolerance and switch consulted by the progress processor,
/// the off-route detector, the milestone set-up and the faster-route check.
///
/// # Example
///
/// ```
/// use navtrack::config::NavigationOptions;
///
/// // Using defaults
/// let options = NavigationOptions::default();
/// assert_eq!(options.maneuver_zone_radius(), 40.0);
/// assert!(options.enable_off_route_detection());
///
/// // Custom options
/// let options = NavigationOptions::new()
///     .with_maneuver_zone_radius(60.0)
///     .with_snap_to_route(false)
///     .with_enable_faster_route_check(true);
/// assert!(!options.snap_to_route());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationOptions {
    max_turn_completion_offset: f64,
    maneuver_zone_radius: f64,
    enable_off_route_detection: bool,
    off_route_minimum_distance_in_route: f64,
    minimum_distance_before_rerouting: f64,
    minimum_backup_distance_for_off_route: f64,
    dead_reckoning_time_interval: f64,
    off_route_look_ahead_steps: usize,
    snap_to_route: bool,
    default_milestones_enabled: bool,
    enable_faster_route_check: bool,
    faster_route_check_interval: Duration,
    faster_route_minimum_step_duration: f64,
    arrival_radius: f64,
}

impl NavigationOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bearing tolerance for maneuver completion (degrees).
    ///
    /// Default: 30 degrees.
    pub fn with_max_turn_completion_offset(mut self, degrees: f64) -> Self {
        self.max_turn_completion_offset = degrees;
        self
    }

    /// Set the maneuver zone radius (meters).
    ///
    /// Completion is only considered while the distance remaining to the next
    /// maneuver is below this radius. Default: 40m.
    pub fn with_maneuver_zone_radius(mut self, meters: f64) -> Self {
        self.maneuver_zone_radius = meters;
        self
    }

    /// Enable or disable off-route detection.
    pub fn with_enable_off_route_detection(mut self, enabled: bool) -> Self {
        self.enable_off_route_detection = enabled;
        self
    }

    /// Set the base off-route tolerance (meters).
    ///
    /// Halved near intersections. Default: 20m.
    pub fn with_off_route_minimum_distance_in_route(mut self, meters: f64) -> Self {
        self.off_route_minimum_distance_in_route = meters;
        self
    }

    /// Set the distance required between consecutive reroutes (meters).
    pub fn with_minimum_distance_before_rerouting(mut self, meters: f64) -> Self {
        self.minimum_distance_before_rerouting = meters;
        self
    }

    /// Set the backup distance that counts as moving away from the maneuver (meters).
    pub fn with_minimum_backup_distance_for_off_route(mut self, meters: f64) -> Self {
        self.minimum_backup_distance_for_off_route = meters;
        self
    }

    /// Set the dead reckoning interval (seconds).
    ///
    /// The off-route radius is at least `speed * interval`.
    pub fn with_dead_reckoning_time_interval(mut self, seconds: f64) -> Self {
        self.dead_reckoning_time_interval = seconds;
        self
    }

    /// Set how many steps past the upcoming one are checked for a jump.
    pub fn with_off_route_look_ahead_steps(mut self, steps: usize) -> Self {
        self.off_route_look_ahead_steps = steps;
        self
    }

    /// Enable or disable snapping reported fixes onto the route.
    pub fn with_snap_to_route(mut self, enabled: bool) -> Self {
        self.snap_to_route = enabled;
        self
    }

    /// Enable or disable the default voice/banner milestones.
    pub fn with_default_milestones_enabled(mut self, enabled: bool) -> Self {
        self.default_milestones_enabled = enabled;
        self
    }

    /// Enable or disable faster-route checks.
    pub fn with_enable_faster_route_check(mut self, enabled: bool) -> Self {
        self.enable_faster_route_check = enabled;
        self
    }

    /// Set the minimum time between faster-route checks.
    ///
    /// Default: 120 seconds.
    pub fn with_faster_route_check_interval(mut self, interval: Duration) -> Self {
        self.faster_route_check_interval = interval;
        self
    }

    /// Set the step duration remaining required for a faster-route check (seconds).
    pub fn with_faster_route_minimum_step_duration(mut self, seconds: f64) -> Self {
        self.faster_route_minimum_step_duration = seconds;
        self
    }

    /// Set the arrival radius (meters).
    pub fn with_arrival_radius(mut self, meters: f64) -> Self {
        self.arrival_radius = meters;
        self
    }

    /// Get the maneuver completion bearing tolerance (degrees).
    pub fn max_turn_completion_offset(&self) -> f64 {
        self.max_turn_completion_offset
    }

    /// Get the maneuver zone radius (meters).
    pub fn maneuver_zone_radius(&self) -> f64 {
        self.maneuver_zone_radius
    }

    /// Whether off-route detection is enabled.
    pub fn enable_off_route_detection(&self) -> bool {
        self.enable_off_route_detection
    }

    /// Get the base off-route tolerance (meters).
    pub fn off_route_minimum_distance_in_route(&self) -> f64 {
        self.off_route_minimum_distance_in_route
    }

    /// Get the distance required between reroutes (meters).
    pub fn minimum_distance_before_rerouting(&self) -> f64 {
        self.minimum_distance_before_rerouting
    }

    /// Get the moving-away backup distance (meters).
    pub fn minimum_backup_distance_for_off_route(&self) -> f64 {
        self.minimum_backup_distance_for_off_route
    }

    /// Get the dead reckoning interval (seconds).
    pub fn dead_reckoning_time_interval(&self) -> f64 {
        self.dead_reckoning_time_interval
    }

    /// Get the off-route look-ahead step count.
    pub fn off_route_look_ahead_steps(&self) -> usize {
        self.off_route_look_ahead_steps
    }

    /// Whether reported fixes are snapped onto the route.
    pub fn snap_to_route(&self) -> bool {
        self.snap_to_route
    }

    /// Whether the default milestones are registered.
    pub fn default_milestones_enabled(&self) -> bool {
        self.default_milestones_enabled
    }

    /// Whether faster-route checks are enabled.
    pub fn enable_faster_route_check(&self) -> bool {
        self.enable_faster_route_check
    }

    /// Get the minimum time between faster-route checks.
    pub fn faster_route_check_interval(&self) -> Duration {
        self.faster_route_check_interval
    }

    /// Get the minimum step duration remaining for a faster-route check (seconds).
    pub fn faster_route_minimum_step_duration(&self) -> f64 {
        self.faster_route_minimum_step_duration
    }

    /// Get the arrival radius (meters).
    pub fn arrival_radius(&self) -> f64 {
        self.arrival_radius
    }
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            max_turn_completion_offset: DEFAULT_MAX_TURN_COMPLETION_OFFSET,
            maneuver_zone_radius: DEFAULT_MANEUVER_ZONE_RADIUS,
            enable_off_route_detection: DEFAULT_ENABLE_OFF_ROUTE_DETECTION,
            off_route_minimum_distance_in_route: DEFAULT_OFF_ROUTE_MINIMUM_DISTANCE_IN_ROUTE,
            minimum_distance_before_rerouting: DEFAULT_MINIMUM_DISTANCE_BEFORE_REROUTING,
            minimum_backup_distance_for_off_route: DEFAULT_MINIMUM_BACKUP_DISTANCE_FOR_OFF_ROUTE,
            dead_reckoning_time_interval: DEFAULT_DEAD_RECKONING_TIME_INTERVAL,
            off_route_look_ahead_steps: DEFAULT_OFF_ROUTE_LOOK_AHEAD_STEPS,
            snap_to_route: DEFAULT_SNAP_TO_ROUTE,
            default_milestones_enabled: DEFAULT_MILESTONES_ENABLED,
            enable_faster_route_check: DEFAULT_ENABLE_FASTER_ROUTE_CHECK,
            faster_route_check_interval: DEFAULT_FASTER_ROUTE_CHECK_INTERVAL,
            faster_route_minimum_step_duration: DEFAULT_FASTER_ROUTE_MINIMUM_STEP_DURATION,
            arrival_radius: DEFAULT_ARRIVAL_RADIUS,
        }
    }
}
