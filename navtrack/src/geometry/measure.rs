//! Spherical measurement helpers.
//!
//! Thin adapters over the `geo` haversine metric space. Distances are meters
//! and bearings are degrees true (0-360, 0=north, 90=east).

use geo::{Bearing, Destination, Distance, Haversine};

use super::point::Point;

/// Calculate the great-circle distance between two points in meters.
///
/// # Example
///
/// ```
/// use navtrack::geometry::{distance, Point};
///
/// // One degree of latitude is roughly 111km
/// let meters = distance(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
/// assert!((meters - 111_195.0).abs() < 10.0);
/// ```
pub fn distance(from: Point, to: Point) -> f64 {
    Haversine.distance(from.into(), to.into())
}

/// Calculate the initial bearing from one point to another.
///
/// Returns the forward azimuth normalized to 0-360 degrees.
pub fn bearing(from: Point, to: Point) -> f64 {
    wrap(Haversine.bearing(from.into(), to.into()), 0.0, 360.0)
}

/// Project a point along a bearing for a given distance in meters.
pub fn destination(origin: Point, distance_meters: f64, bearing_deg: f64) -> Point {
    let projected: Point = Haversine
        .destination(origin.into(), bearing_deg, distance_meters)
        .into();
    Point::new(wrap(projected.longitude, -180.0, 180.0), projected.latitude)
}

/// Wrap a value into the half-open range `[min, max)`.
///
/// # Example
///
/// ```
/// use navtrack::geometry::wrap;
///
/// assert_eq!(wrap(370.0, 0.0, 360.0), 10.0);
/// assert_eq!(wrap(-90.0, 0.0, 360.0), 270.0);
/// ```
pub fn wrap(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    ((value - min) % range + range) % range + min
}

/// Smallest absolute difference between two angles, in degrees (0-180).
pub fn difference_between_angles(first: f64, second: f64) -> f64 {
    let diff = (first - second).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}
