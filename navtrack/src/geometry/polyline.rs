//! Encoded polyline format.
//!
//! Route geometry arrives as an encoded polyline string (the format used by
//! most directions services). Precision 6 is the default for step geometry;
//! precision 5 is supported for older payloads.

use thiserror::Error;

use super::point::Point;

/// Six decimal places of precision (default for route geometry).
pub const PRECISION_6: u32 = 6;

/// Five decimal places of precision.
pub const PRECISION_5: u32 = 5;

/// Errors from decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// A byte outside the valid encoding alphabet.
    #[error("Invalid polyline character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// The string ended in the middle of a value or coordinate pair.
    #[error("Truncated polyline at position {position}")]
    Truncated { position: usize },

    /// A single value used more chunks than fit in 64 bits.
    #[error("Polyline value too long at position {position}")]
    ValueTooLong { position: usize },
}

/// Decode an encoded polyline into points.
///
/// # Example
///
/// ```
/// use navtrack::geometry::{decode_polyline, PRECISION_5};
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", PRECISION_5).unwrap();
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[0].latitude, 38.5);
/// assert_eq!(points[0].longitude, -120.2);
/// ```
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Point>, PolylineError> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();

    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        latitude += decode_value(bytes, &mut index)?;
        longitude += decode_value(bytes, &mut index)?;
        points.push(Point::new(
            longitude as f64 / factor,
            latitude as f64 / factor,
        ));
    }

    Ok(points)
}

/// Encode points as a polyline string.
pub fn encode_polyline(points: &[Point], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut encoded = String::with_capacity(points.len() * 8);

    let mut previous_lat: i64 = 0;
    let mut previous_lon: i64 = 0;

    for point in points {
        let lat = (point.latitude * factor).round() as i64;
        let lon = (point.longitude * factor).round() as i64;
        encode_value(lat - previous_lat, &mut encoded);
        encode_value(lon - previous_lon, &mut encoded);
        previous_lat = lat;
        previous_lon = lon;
    }

    encoded
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or(PolylineError::Truncated { position: *index })?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                character: byte as char,
                position: *index,
            });
        }
        if shift > 60 {
            return Err(PolylineError::ValueTooLong { position: *index });
        }

        let chunk = (byte - 63) as i64;
        *index += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn encode_value(value: i64, out: &mut String) {
    let mut remaining = if value < 0 {
        !(value << 1)
    } else {
        value << 1
    };

    while remaining >= 0x20 {
        out.push((((remaining & 0x1f) | 0x20) + 63) as u8 as char);
        remaining >>= 5;
    }
    out.push((remaining + 63) as u8 as char);
}
