//! INI serialization logic for converting `NavigationOptions` → INI string.

use super::options::NavigationOptions;

/// Convert options to a commented INI string for saving.
pub(super) fn to_config_string(options: &NavigationOptions) -> String {
    format!(
        r#"[navigation]
; Bearing tolerance (degrees) between the travel direction and the maneuver
; exit bearing for a maneuver to count as completed
max_turn_completion_offset = {}
; Distance to the next maneuver (meters) within which completion is checked
maneuver_zone_radius = {}
; Report fixes snapped onto the route while on-route
snap_to_route = {}
; Register the voice and banner instruction milestones
default_milestones = {}
; Leg distance remaining (meters) at which the destination counts as reached
arrival_radius = {}

[off_route]
; Enable off-route detection
enabled = {}
; Base tolerance (meters) between the fix and the route, halved near intersections
minimum_distance_in_route = {}
; Distance (meters) to travel after a reroute before the next off-route decision
minimum_distance_before_rerouting = {}
; Distance (meters) travelled away from the maneuver that counts as off-route
minimum_backup_distance = {}
; Seconds of dead reckoning used to widen the tolerance at speed
dead_reckoning_interval = {}
; Steps past the upcoming one checked when the traveler skips ahead
look_ahead_steps = {}

[faster_route]
; Periodically look for a faster route
enabled = {}
; Minimum seconds between checks
check_interval = {}
; Step duration remaining (seconds) below which no check is made
minimum_step_duration = {}
"#,
        options.max_turn_completion_offset(),
        options.maneuver_zone_radius(),
        options.snap_to_route(),
        options.default_milestones_enabled(),
        options.arrival_radius(),
        options.enable_off_route_detection(),
        options.off_route_minimum_distance_in_route(),
        options.minimum_distance_before_rerouting(),
        options.minimum_backup_distance_for_off_route(),
        options.dead_reckoning_time_interval(),
        options.off_route_look_ahead_steps(),
        options.enable_faster_route_check(),
        options.faster_route_check_interval().as_secs(),
        options.faster_route_minimum_step_duration(),
    )
}
