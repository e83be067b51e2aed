//! Per-coordinate leg annotations.

use serde::{Deserialize, Serialize};

/// Parallel arrays of metadata for each coordinate pair of a leg.
///
/// Every array is optional in the source payload; absent arrays deserialize
/// as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegAnnotation {
    /// Distance between each coordinate pair (meters).
    #[serde(default)]
    pub distance: Vec<f64>,

    /// Travel time between each coordinate pair (seconds).
    #[serde(default)]
    pub duration: Vec<f64>,

    /// Average speed between each coordinate pair (m/s).
    #[serde(default)]
    pub speed: Vec<f64>,

    /// Posted speed limit for each coordinate pair.
    #[serde(default)]
    pub maxspeed: Vec<MaxSpeed>,

    /// Congestion level for each coordinate pair (low, moderate, heavy...).
    #[serde(default)]
    pub congestion: Vec<String>,
}

impl LegAnnotation {
    /// Whether the annotation carries usable distance data.
    pub fn has_distances(&self) -> bool {
        !self.distance.is_empty()
    }
}

/// A posted speed limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxSpeed {
    /// Limit value, absent when unknown or unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    /// Unit of `speed` (km/h or mph).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// The limit is not known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<bool>,

    /// There is no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none: Option<bool>,
}
