//! Polyline operations: projection, slicing and length measurement.
//!
//! Lines stay as `Point` slices at the API boundary and are handed to the
//! `geo` haversine algorithms segment by segment. All distances are meters.

use geo::{
    Closest, Coord, Haversine, HaversineClosestPoint, InterpolatePoint, Length, Line, LineString,
};

use super::measure::distance;
use super::point::Point;

/// Projections closer than this to a segment end snap onto the vertex.
const VERTEX_TOLERANCE_METERS: f64 = 1e-3;

/// Result of projecting a point onto a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// The closest point on the line.
    pub point: Point,
    /// Index of the segment start vertex the point lies on.
    pub segment_index: usize,
    /// Distance from the query point to `point`, in meters.
    pub distance: f64,
    /// Distance along the line from its first vertex to `point`, in meters.
    pub location: f64,
}

/// Find the point on `line` closest to `target`.
///
/// Returns `None` for an empty line. A single-vertex line projects onto that
/// vertex. When the projection falls on a segment endpoint the vertex itself
/// is returned, so equality checks against route coordinates are exact.
pub fn nearest_point_on_line(target: Point, line: &[Point]) -> Option<NearestPoint> {
    match line {
        [] => None,
        [only] => Some(NearestPoint {
            point: *only,
            segment_index: 0,
            distance: distance(target, *only),
            location: 0.0,
        }),
        _ => {
            let mut best: Option<NearestPoint> = None;
            let mut traveled: f64 = 0.0;

            for (index, segment) in line.windows(2).enumerate() {
                let (start, end) = (segment[0], segment[1]);
                let candidate = closest_on_segment(target, start, end);
                let candidate_distance = distance(target, candidate);

                if best.map_or(true, |b| candidate_distance < b.distance) {
                    best = Some(NearestPoint {
                        point: candidate,
                        segment_index: index,
                        distance: candidate_distance,
                        location: traveled + distance(start, candidate),
                    });
                }
                traveled += distance(start, end);
            }

            best
        }
    }
}

/// Closest point to `target` on the great-circle segment `start`-`end`.
fn closest_on_segment(target: Point, start: Point, end: Point) -> Point {
    if start == end {
        return start;
    }

    let segment = Line::new(Coord::from(start), Coord::from(end));
    let candidate: Point = match segment.haversine_closest_point(&target.into()) {
        Closest::Intersection(point) | Closest::SinglePoint(point) => point.into(),
        Closest::Indeterminate => start,
    };

    if distance(candidate, start) <= VERTEX_TOLERANCE_METERS {
        start
    } else if distance(candidate, end) <= VERTEX_TOLERANCE_METERS {
        end
    } else {
        candidate
    }
}

/// Slice a line between two points.
///
/// Both points are first projected onto the line; the returned line runs from
/// whichever projection comes first along the line to the other, including
/// every original vertex in between.
pub fn line_slice(start: Point, stop: Point, line: &[Point]) -> Vec<Point> {
    if line.len() < 2 {
        return line.to_vec();
    }

    let (Some(start_vertex), Some(stop_vertex)) = (
        nearest_point_on_line(start, line),
        nearest_point_on_line(stop, line),
    ) else {
        return Vec::new();
    };

    let start_first = start_vertex.location < stop_vertex.location
        || (start_vertex.location == stop_vertex.location
            && start_vertex.segment_index <= stop_vertex.segment_index);
    let (first, last) = if start_first {
        (start_vertex, stop_vertex)
    } else {
        (stop_vertex, start_vertex)
    };

    let mut sliced = Vec::with_capacity(last.segment_index - first.segment_index + 2);
    sliced.push(first.point);
    sliced.extend_from_slice(&line[first.segment_index + 1..=last.segment_index]);
    sliced.push(last.point);
    sliced
}

/// Total length of a line in meters.
pub fn line_length(line: &[Point]) -> f64 {
    let line: LineString<f64> = line.iter().map(|point| Coord::from(*point)).collect();
    Haversine.length(&line)
}

/// Point located `distance_meters` along the line from its first vertex.
///
/// Distances past the end clamp to the last vertex; negative distances clamp
/// to the first.
pub fn along(line: &[Point], distance_meters: f64) -> Option<Point> {
    let first = *line.first()?;
    if distance_meters <= 0.0 {
        return Some(first);
    }

    let mut traveled: f64 = 0.0;
    for segment in line.windows(2) {
        let segment_length = distance(segment[0], segment[1]);
        if traveled + segment_length >= distance_meters {
            if segment_length == 0.0 {
                return Some(segment[0]);
            }
            let point = Haversine.point_at_distance_between(
                segment[0].into(),
                segment[1].into(),
                distance_meters - traveled,
            );
            return Some(point.into());
        }
        traveled += segment_length;
    }

    line.last().copied()
}
