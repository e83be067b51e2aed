//! Geographic point type.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// Serializes as a `[longitude, latitude]` pair, matching the coordinate
/// order used by route geometry and maneuver locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
}

impl Point {
    /// Create a point from longitude and latitude.
    #[inline]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Create a point from a `(latitude, longitude)` tuple.
    #[inline]
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.longitude, point.latitude]
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(point: Point) -> Self {
        geo::coord! { x: point.longitude, y: point.latitude }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
