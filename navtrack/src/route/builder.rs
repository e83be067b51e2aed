//! Programmatic route construction.
//!
//! Builds a complete [`Route`] from per-step coordinate lists, filling in the
//! derived fields a directions service would provide: encoded geometry,
//! distances, durations at a fixed speed, maneuver bearings, one intersection
//! per step, and optionally guidance instructions and leg annotations.
//!
//! # Example
//!
//! ```
//! use navtrack::geometry::Point;
//! use navtrack::route::RouteBuilder;
//!
//! let a = Point::new(13.3880, 52.5170);
//! let b = Point::new(13.3900, 52.5170);
//! let c = Point::new(13.3900, 52.5190);
//!
//! let route = RouteBuilder::new()
//!     .leg(vec![vec![a, b], vec![b, c], vec![c, c]])
//!     .build();
//!
//! assert_eq!(route.legs[0].steps.len(), 3);
//! assert_eq!(route.legs[0].steps[1].maneuver.location, b);
//! ```

use crate::geometry::{bearing, distance, encode_polyline, line_length, Point, PRECISION_6};

use super::annotation::LegAnnotation;
use super::instructions::{BannerInstructions, BannerText, VoiceInstructions};
use super::model::{LegStep, Route, RouteLeg, StepIntersection, StepManeuver};

/// Default travel speed used to derive durations (m/s).
const DEFAULT_BUILDER_SPEED: f64 = 10.0;

/// Distance before a maneuver at which the second voice instruction is placed.
const PREPARE_DISTANCE: f64 = 100.0;

/// Builder for [`Route`] values.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    legs: Vec<Vec<Vec<Point>>>,
    speed: f64,
    instructions: bool,
    annotations: bool,
}

impl RouteBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            legs: Vec::new(),
            speed: DEFAULT_BUILDER_SPEED,
            instructions: false,
            annotations: false,
        }
    }

    /// Append a leg given the coordinates of each of its steps.
    ///
    /// Each step should start where the previous one ended. The last step of
    /// a leg is conventionally the arrival step, a repeated final point.
    pub fn leg(mut self, steps: Vec<Vec<Point>>) -> Self {
        self.legs.push(steps);
        self
    }

    /// Set the speed used to derive durations (m/s).
    pub fn speed(mut self, speed: f64) -> Self {
        if speed > 0.0 {
            self.speed = speed;
        }
        self
    }

    /// Generate voice and banner instructions for every step.
    pub fn with_instructions(mut self) -> Self {
        self.instructions = true;
        self
    }

    /// Generate per-coordinate leg annotations.
    pub fn with_annotations(mut self) -> Self {
        self.annotations = true;
        self
    }

    /// Build the route.
    pub fn build(self) -> Route {
        let mut overview: Vec<Point> = Vec::new();
        let mut legs = Vec::with_capacity(self.legs.len());
        let mut bearing_before: f64 = 0.0;

        for (leg_index, raw_steps) in self.legs.iter().enumerate() {
            let step_points: Vec<Vec<Point>> = raw_steps
                .iter()
                .map(|points| points.iter().map(|p| round(*p)).collect())
                .collect();

            let mut steps = Vec::with_capacity(step_points.len());
            for (step_index, points) in step_points.iter().enumerate() {
                let Some(&location) = points.first() else {
                    continue;
                };
                let step_distance = line_length(points);
                let bearing_after = initial_bearing(points).unwrap_or(bearing_before);
                let is_last = step_index + 1 == step_points.len();

                let maneuver_type = if leg_index == 0 && step_index == 0 {
                    "depart"
                } else if is_last {
                    "arrive"
                } else {
                    "turn"
                };

                let name = format!("Step {leg_index}-{step_index}");
                let mut step = LegStep {
                    distance: step_distance,
                    duration: step_distance / self.speed,
                    geometry: encode_polyline(points, PRECISION_6),
                    name: name.clone(),
                    mode: "driving".to_string(),
                    maneuver: StepManeuver {
                        location,
                        bearing_before,
                        bearing_after,
                        maneuver_type: maneuver_type.to_string(),
                        modifier: None,
                        instruction: Some(format!("{maneuver_type} onto {name}")),
                    },
                    intersections: vec![StepIntersection {
                        bearings: vec![bearing_after.round() as u16 % 360],
                        entry: vec![true],
                        out_index: Some(0),
                        ..StepIntersection::at(location)
                    }],
                    voice_instructions: Vec::new(),
                    banner_instructions: Vec::new(),
                };

                if self.instructions && !is_last {
                    let next_name = format!("Step {leg_index}-{}", step_index + 1);
                    add_instructions(&mut step, &next_name);
                }

                bearing_before = final_bearing(points).unwrap_or(bearing_after);
                steps.push(step);
            }

            let leg_points = join(&step_points);
            let annotation = self
                .annotations
                .then(|| annotate(&leg_points, self.speed));
            for point in &leg_points {
                if overview.last() != Some(point) {
                    overview.push(*point);
                }
            }

            let leg_distance = steps.iter().map(|s| s.distance).sum();
            legs.push(RouteLeg {
                distance: leg_distance,
                duration: leg_distance / self.speed,
                summary: format!("Leg {leg_index}"),
                steps,
                annotation,
                incidents: Vec::new(),
                closures: Vec::new(),
                admins: Vec::new(),
            });
        }

        let route_distance: f64 = legs.iter().map(|l| l.distance).sum();
        Route {
            distance: route_distance,
            duration: route_distance / self.speed,
            geometry: Some(encode_polyline(&overview, PRECISION_6)),
            weight: None,
            legs,
        }
    }
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to the precision that survives polyline encoding.
fn round(point: Point) -> Point {
    Point::new(
        (point.longitude * 1e6).round() / 1e6,
        (point.latitude * 1e6).round() / 1e6,
    )
}

fn initial_bearing(points: &[Point]) -> Option<f64> {
    let first = *points.first()?;
    points
        .iter()
        .find(|p| **p != first)
        .map(|next| bearing(first, *next))
}

fn final_bearing(points: &[Point]) -> Option<f64> {
    let last = *points.last()?;
    points
        .iter()
        .rev()
        .find(|p| **p != last)
        .map(|previous| bearing(*previous, last))
}

/// Concatenate step lines, dropping repeated joints.
fn join(steps: &[Vec<Point>]) -> Vec<Point> {
    let mut line: Vec<Point> = Vec::new();
    for point in steps.iter().flatten() {
        if line.last() != Some(point) {
            line.push(*point);
        }
    }
    line
}

fn annotate(line: &[Point], speed: f64) -> LegAnnotation {
    let distances: Vec<f64> = line.windows(2).map(|w| distance(w[0], w[1])).collect();
    LegAnnotation {
        duration: distances.iter().map(|d| d / speed).collect(),
        speed: vec![speed; distances.len()],
        congestion: vec!["low".to_string(); distances.len()],
        distance: distances,
        maxspeed: Vec::new(),
    }
}

/// Voice instructions at the start of the step and `PREPARE_DISTANCE` before
/// its end; one banner for the whole step.
fn add_instructions(step: &mut LegStep, next_name: &str) {
    step.voice_instructions.push(VoiceInstructions {
        distance_along_geometry: step.distance,
        announcement: format!("Continue on {}", step.name),
        ssml_announcement: None,
    });
    if step.distance > PREPARE_DISTANCE {
        step.voice_instructions.push(VoiceInstructions {
            distance_along_geometry: PREPARE_DISTANCE,
            announcement: format!("In {PREPARE_DISTANCE} meters, turn onto {next_name}"),
            ssml_announcement: None,
        });
    }
    step.banner_instructions.push(BannerInstructions {
        distance_along_geometry: step.distance,
        primary: BannerText {
            text: next_name.to_string(),
            banner_type: Some("turn".to_string()),
            modifier: None,
            degrees: None,
        },
        secondary: None,
        sub: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::destination;

    fn l_shaped() -> Route {
        let a = Point::new(0.0, 0.0);
        let b = destination(a, 300.0, 90.0);
        let c = destination(b, 200.0, 0.0);
        RouteBuilder::new()
            .leg(vec![vec![a, b], vec![b, c], vec![c, c]])
            .with_instructions()
            .with_annotations()
            .build()
    }

    #[test]
    fn test_distances_and_bearings() {
        let route = l_shaped();
        let steps = &route.legs[0].steps;

        assert!((steps[0].distance - 300.0).abs() < 0.5);
        assert!((steps[1].distance - 200.0).abs() < 0.5);
        assert_eq!(steps[2].distance, 0.0);
        assert!((route.distance - 500.0).abs() < 1.0);

        assert_eq!(steps[0].maneuver.maneuver_type, "depart");
        assert!((steps[1].maneuver.bearing_before - 90.0).abs() < 0.1);
        assert!(steps[1].maneuver.bearing_after.abs() < 0.1);
        assert_eq!(steps[2].maneuver.maneuver_type, "arrive");
    }

    #[test]
    fn test_geometry_decodes_to_rounded_points() {
        let route = l_shaped();
        let points = route.legs[0].steps[1].decode_geometry().unwrap();
        assert_eq!(points[0], route.legs[0].steps[1].maneuver.location);
    }

    #[test]
    fn test_instructions_and_annotations() {
        let route = l_shaped();
        let leg = &route.legs[0];

        assert_eq!(leg.steps[0].voice_instructions.len(), 2);
        assert_eq!(leg.steps[0].voice_instructions[1].distance_along_geometry, 100.0);
        assert_eq!(leg.steps[1].banner_instructions[0].primary.text, "Step 0-2");
        assert!(leg.steps[2].voice_instructions.is_empty());

        let annotation = leg.annotation.as_ref().unwrap();
        assert_eq!(annotation.distance.len(), 2);
        assert_eq!(annotation.congestion.len(), 2);
    }
}
