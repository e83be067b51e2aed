//! Route, leg and step value objects.
//!
//! These mirror the JSON shape returned by directions services. They are
//! consumed read-only by the progress engine; nothing here is computed.

use serde::{Deserialize, Serialize};

use super::annotation::LegAnnotation;
use super::instructions::{BannerInstructions, VoiceInstructions};
use crate::geometry::{decode_polyline, Point, PolylineError, PRECISION_6};

/// A complete route: an ordered list of legs between waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total route distance in meters.
    pub distance: f64,

    /// Expected travel time in seconds.
    pub duration: f64,

    /// Encoded overview geometry, if requested from the directions service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,

    /// Route weight as computed by the directions service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Legs between consecutive waypoints.
    pub legs: Vec<RouteLeg>,
}

impl Route {
    /// Parse a route from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get a leg by index.
    #[inline]
    pub fn leg(&self, leg_index: usize) -> Option<&RouteLeg> {
        self.legs.get(leg_index)
    }

    /// Get a step by leg and step index.
    #[inline]
    pub fn step(&self, leg_index: usize, step_index: usize) -> Option<&LegStep> {
        self.leg(leg_index)?.steps.get(step_index)
    }

    /// Location of the first maneuver of the first leg.
    ///
    /// Used to synthesize a starting fix before any real position is known.
    pub fn origin(&self) -> Option<Point> {
        self.step(0, 0).map(|step| step.maneuver.location)
    }

    /// Total number of steps over all legs.
    pub fn step_count(&self) -> usize {
        self.legs.iter().map(|leg| leg.steps.len()).sum()
    }
}

/// The portion of a route between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Leg distance in meters. Zero for degenerate waypoint legs.
    pub distance: f64,

    /// Leg duration in seconds.
    pub duration: f64,

    /// Human-readable summary of the principal roads.
    #[serde(default)]
    pub summary: String,

    /// Maneuver-to-maneuver steps.
    pub steps: Vec<LegStep>,

    /// Per-coordinate annotations, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<LegAnnotation>,

    /// Traffic incidents along the leg.
    #[serde(default)]
    pub incidents: Vec<Incident>,

    /// Road closures along the leg.
    #[serde(default)]
    pub closures: Vec<Closure>,

    /// Administrative regions the leg passes through.
    #[serde(default)]
    pub admins: Vec<Admin>,
}

/// A maneuver-to-maneuver segment within a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegStep {
    /// Step distance in meters.
    pub distance: f64,

    /// Step duration in seconds.
    pub duration: f64,

    /// Encoded polyline (precision 6) of the step geometry.
    pub geometry: String,

    /// Road name.
    #[serde(default)]
    pub name: String,

    /// Mode of travel (driving, walking, cycling, ferry...).
    #[serde(default)]
    pub mode: String,

    /// The maneuver at the start of this step.
    pub maneuver: StepManeuver,

    /// Intersections passed along the step, in order.
    #[serde(default)]
    pub intersections: Vec<StepIntersection>,

    /// Spoken instructions, ordered by decreasing distance along geometry.
    #[serde(default, rename = "voiceInstructions")]
    pub voice_instructions: Vec<VoiceInstructions>,

    /// Visual instructions, ordered by decreasing distance along geometry.
    #[serde(default, rename = "bannerInstructions")]
    pub banner_instructions: Vec<BannerInstructions>,
}

impl LegStep {
    /// Decode the step geometry into points.
    pub fn decode_geometry(&self) -> Result<Vec<Point>, PolylineError> {
        decode_polyline(&self.geometry, PRECISION_6)
    }
}

/// The action point at the start of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepManeuver {
    /// Where the maneuver takes place.
    pub location: Point,

    /// Travel bearing immediately before the maneuver (degrees).
    #[serde(default)]
    pub bearing_before: f64,

    /// Travel bearing immediately after the maneuver (degrees).
    #[serde(default)]
    pub bearing_after: f64,

    /// Maneuver type (turn, depart, arrive, merge...).
    #[serde(default, rename = "type")]
    pub maneuver_type: String,

    /// Direction modifier (left, slight right, straight...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,

    /// Default text instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

/// An intersection passed along a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepIntersection {
    /// Intersection location.
    pub location: Point,

    /// Bearings of all roads at the intersection.
    #[serde(default)]
    pub bearings: Vec<u16>,

    /// Whether each bearing can be entered.
    #[serde(default)]
    pub entry: Vec<bool>,

    /// Index into `bearings` of the approach road.
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_index: Option<usize>,

    /// Index into `bearings` of the exit road.
    #[serde(default, rename = "out", skip_serializing_if = "Option::is_none")]
    pub out_index: Option<usize>,

    /// Lane information at the intersection.
    #[serde(default)]
    pub lanes: Vec<IntersectionLanes>,

    /// Road classes of the exit road (tunnel, toll, motorway...).
    #[serde(default)]
    pub classes: Vec<String>,
}

impl StepIntersection {
    /// Create an intersection at a location with no further metadata.
    pub fn at(location: Point) -> Self {
        Self {
            location,
            bearings: Vec::new(),
            entry: Vec::new(),
            in_index: None,
            out_index: None,
            lanes: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Whether the exit road is classed as a tunnel.
    pub fn is_tunnel(&self) -> bool {
        self.classes.iter().any(|c| c == "tunnel")
    }
}

/// Lane guidance at an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionLanes {
    /// Whether the lane can be used for the maneuver.
    pub valid: bool,

    /// Lane markings (left, straight, right...).
    #[serde(default)]
    pub indications: Vec<String>,
}

/// A traffic incident along a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Incident identifier.
    pub id: String,

    /// Incident type (accident, construction, congestion...).
    #[serde(default, rename = "type")]
    pub incident_type: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// First leg coordinate index affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_index_start: Option<usize>,

    /// Last leg coordinate index affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_index_end: Option<usize>,
}

/// A road closure along a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    /// First leg coordinate index closed.
    pub geometry_index_start: usize,

    /// Last leg coordinate index closed.
    pub geometry_index_end: usize,
}

/// An administrative region a leg passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_3166_1: Option<String>,

    /// ISO 3166-1 alpha-3 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_3166_1_alpha3: Option<String>,
}
