//! Voice and banner guidance instructions attached to steps.

use serde::{Deserialize, Serialize};

/// A spoken instruction announced at a distance before the step's end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInstructions {
    /// Distance from the end of the step at which to announce (meters).
    #[serde(rename = "distanceAlongGeometry")]
    pub distance_along_geometry: f64,

    /// Plain text announcement.
    pub announcement: String,

    /// SSML version of the announcement.
    #[serde(
        default,
        rename = "ssmlAnnouncement",
        skip_serializing_if = "Option::is_none"
    )]
    pub ssml_announcement: Option<String>,
}

/// A visual instruction shown from a distance before the step's end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerInstructions {
    /// Distance from the end of the step at which to show (meters).
    #[serde(rename = "distanceAlongGeometry")]
    pub distance_along_geometry: f64,

    /// Main banner line.
    pub primary: BannerText,

    /// Secondary banner line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<BannerText>,

    /// Sub-banner (lanes, next maneuver).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<BannerText>,
}

/// Text content of one banner line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerText {
    /// Display text.
    pub text: String,

    /// Maneuver type shown with the text.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub banner_type: Option<String>,

    /// Direction modifier shown with the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,

    /// Exit angle for roundabouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees: Option<f64>,
}

/// Instructions that are placed by distance along the step geometry.
///
/// Lets the instruction milestones share their selection logic.
pub trait DistanceAlongGeometry {
    /// Distance from the end of the step at which the instruction applies.
    fn distance_along_geometry(&self) -> f64;
}

impl DistanceAlongGeometry for VoiceInstructions {
    fn distance_along_geometry(&self) -> f64 {
        self.distance_along_geometry
    }
}

impl DistanceAlongGeometry for BannerInstructions {
    fn distance_along_geometry(&self) -> f64 {
        self.distance_along_geometry
    }
}
