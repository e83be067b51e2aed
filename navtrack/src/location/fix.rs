//! Position fix type.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A single raw position fix.
///
/// Optional fields are absent when the underlying provider does not report
/// them (e.g. bearing while stationary).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Course over ground in degrees true (0-360).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    /// Ground speed in m/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Horizontal accuracy radius in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Fix time in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl Location {
    /// Create a fix at a position with no vectors, stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            bearing: None,
            speed: None,
            accuracy: None,
            timestamp_ms: now_millis(),
        }
    }

    /// Create a fix at a geometry point.
    pub fn at(point: Point) -> Self {
        Self::new(point.latitude, point.longitude)
    }

    /// Set the bearing.
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    /// Set the ground speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set the accuracy radius.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Set the fix timestamp.
    pub fn with_timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Position as a geometry point.
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Bearing, or 0 when the provider did not report one.
    #[inline]
    pub fn bearing_or_zero(&self) -> f64 {
        self.bearing.unwrap_or(0.0)
    }

    /// Speed, or 0 when the provider did not report one.
    #[inline]
    pub fn speed_or_zero(&self) -> f64 {
        self.speed.unwrap_or(0.0)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
