//! INI parsing logic for converting `Ini` → `NavigationOptions`.
//!
//! This is the single place where INI key names are mapped to options.

use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::options::NavigationOptions;

/// Parse an `Ini` object into `NavigationOptions`.
///
/// Starts from the defaults and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<NavigationOptions, ConfigFileError> {
    let mut options = NavigationOptions::default();

    // [navigation] section
    if let Some(section) = ini.section(Some("navigation")) {
        if let Some(v) = non_negative(section, "navigation", "max_turn_completion_offset")? {
            if v > 180.0 {
                return Err(invalid(
                    "navigation",
                    "max_turn_completion_offset",
                    &v.to_string(),
                    "must be between 0 and 180 (degrees)",
                ));
            }
            options = options.with_max_turn_completion_offset(v);
        }
        if let Some(v) = non_negative(section, "navigation", "maneuver_zone_radius")? {
            options = options.with_maneuver_zone_radius(v);
        }
        if let Some(v) = boolean(section, "navigation", "snap_to_route")? {
            options = options.with_snap_to_route(v);
        }
        if let Some(v) = boolean(section, "navigation", "default_milestones")? {
            options = options.with_default_milestones_enabled(v);
        }
        if let Some(v) = non_negative(section, "navigation", "arrival_radius")? {
            options = options.with_arrival_radius(v);
        }
    }

    // [off_route] section
    if let Some(section) = ini.section(Some("off_route")) {
        if let Some(v) = boolean(section, "off_route", "enabled")? {
            options = options.with_enable_off_route_detection(v);
        }
        if let Some(v) = non_negative(section, "off_route", "minimum_distance_in_route")? {
            options = options.with_off_route_minimum_distance_in_route(v);
        }
        if let Some(v) = non_negative(section, "off_route", "minimum_distance_before_rerouting")? {
            options = options.with_minimum_distance_before_rerouting(v);
        }
        if let Some(v) = non_negative(section, "off_route", "minimum_backup_distance")? {
            options = options.with_minimum_backup_distance_for_off_route(v);
        }
        if let Some(v) = non_negative(section, "off_route", "dead_reckoning_interval")? {
            options = options.with_dead_reckoning_time_interval(v);
        }
        if let Some(v) = parsed::<usize>(
            section,
            "off_route",
            "look_ahead_steps",
            "must be a non-negative integer",
        )? {
            options = options.with_off_route_look_ahead_steps(v);
        }
    }

    // [faster_route] section
    if let Some(section) = ini.section(Some("faster_route")) {
        if let Some(v) = boolean(section, "faster_route", "enabled")? {
            options = options.with_enable_faster_route_check(v);
        }
        if let Some(v) = parsed::<u64>(
            section,
            "faster_route",
            "check_interval",
            "must be a positive integer (seconds)",
        )? {
            if v == 0 {
                return Err(invalid(
                    "faster_route",
                    "check_interval",
                    "0",
                    "must be a positive integer (seconds)",
                ));
            }
            options = options.with_faster_route_check_interval(Duration::from_secs(v));
        }
        if let Some(v) = non_negative(section, "faster_route", "minimum_step_duration")? {
            options = options.with_faster_route_minimum_step_duration(v);
        }
    }

    Ok(options)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a key with `FromStr`, mapping failures to `InvalidValue`.
fn parsed<T: FromStr>(
    properties: &Properties,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match properties.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, v, reason)),
    }
}

fn non_negative(
    properties: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<f64>, ConfigFileError> {
    const REASON: &str = "must be a non-negative number";
    match parsed::<f64>(properties, section, key, REASON)? {
        Some(v) if !v.is_finite() || v < 0.0 => Err(invalid(section, key, &v.to_string(), REASON)),
        other => Ok(other),
    }
}

fn boolean(
    properties: &Properties,
    section: &str,
    key: &str,
) -> Result<Option<bool>, ConfigFileError> {
    match properties.get(key) {
        None => Ok(None),
        Some(v) => match v.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(Some(true)),
            "false" | "no" | "0" | "off" => Ok(Some(false)),
            _ => Err(invalid(section, key, v, "must be true or false")),
        },
    }
}
