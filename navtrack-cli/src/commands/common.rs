//! Helpers shared across CLI commands.

use std::path::Path;

use navtrack::route::Route;

use crate::error::CliError;

/// Read and parse a route JSON file.
pub fn load_route(path: &Path) -> Result<Route, CliError> {
    let json = std::fs::read_to_string(path).map_err(|error| CliError::RouteRead {
        path: path.to_path_buf(),
        error,
    })?;
    Route::from_json(&json).map_err(|error| CliError::RouteParse {
        path: path.to_path_buf(),
        error,
    })
}

/// Format meters as `850 m` or `12.3 km`.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1_000.0 {
        format!("{:.1} km", meters / 1_000.0)
    } else {
        format!("{:.0} m", meters)
    }
}

/// Format seconds as `45s`, `3m 05s` or `1h 02m`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(12_345.0), "12.3 km");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.0), "45s");
        assert_eq!(format_duration(185.0), "3m 05s");
        assert_eq!(format_duration(3_720.0), "1h 02m");
        assert_eq!(format_duration(-3.0), "0s");
    }

    #[test]
    fn test_load_route_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load_route(&temp.path().join("missing.json"));
        assert!(matches!(result, Err(CliError::RouteRead { .. })));
    }

    #[test]
    fn test_load_route_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("route.json");
        std::fs::write(&path, r#"{"distance": 1.0}"#).unwrap();

        assert!(matches!(load_route(&path), Err(CliError::RouteParse { .. })));
    }

    #[test]
    fn test_load_route_minimal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("route.json");
        std::fs::write(&path, r#"{"distance": 0.0, "duration": 0.0, "legs": []}"#).unwrap();

        let route = load_route(&path).unwrap();
        assert!(route.legs.is_empty());
    }
}
