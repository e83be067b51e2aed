//! Geometry utilities for route tracking.
//!
//! Provides the small set of geographic operations the progress engine needs,
//! built on the `geo` crate's haversine algorithms:
//!
//! - [`Point`] - a `[longitude, latitude]` position
//! - [`distance`], [`bearing`], [`destination`] - spherical measurements in meters/degrees
//! - [`wrap`], [`difference_between_angles`] - bearing normalization
//! - [`nearest_point_on_line`], [`line_slice`], [`line_length`], [`along`] - polyline operations
//! - [`decode_polyline`], [`encode_polyline`] - the encoded polyline format
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Bearing: degrees true (0-360, 0=north, 90=east)
//! - Distance: meters

mod line;
mod measure;
mod point;
mod polyline;

pub use line::{along, line_length, line_slice, nearest_point_on_line, NearestPoint};
pub use measure::{bearing, destination, difference_between_angles, distance, wrap};
pub use point::Point;
pub use polyline::{decode_polyline, encode_polyline, PolylineError, PRECISION_5, PRECISION_6};
