/// Pose keypoint models
///
/// Keypoints arrive from an external pose source in pixel coordinates of a
/// single video frame. Analyzers look landmarks up by name and fail when a
/// required one is absent.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::models::geometry::Point2D;

/// Body landmark vocabulary (COCO ordering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyLandmark {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyLandmark {
    /// Get landmark name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single detected landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: BodyLandmark,
    /// X coordinate in pixels
    pub x: f64,
    /// Y coordinate in pixels
    pub y: f64,
    /// Detection confidence (0-1)
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: f64,
}

impl Keypoint {
    /// Create a new keypoint, clamping confidence into [0, 1]
    pub fn new(name: BodyLandmark, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            name,
            x,
            y,
            confidence: clamp_confidence(confidence),
        }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Check if keypoint is usable (finite coordinates, sufficient confidence)
    pub fn is_valid(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence && self.x.is_finite() && self.y.is_finite()
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_confidence)
}

/// Keypoints sampled at one instant of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Frame timestamp in milliseconds from the start of the clip
    pub timestamp_ms: u64,
    pub keypoints: Vec<Keypoint>,
}

impl PoseFrame {
    pub fn new(timestamp_ms: u64, keypoints: Vec<Keypoint>) -> Self {
        Self {
            timestamp_ms,
            keypoints,
        }
    }

    /// Get keypoint by landmark
    pub fn get_keypoint(&self, landmark: BodyLandmark) -> Option<&Keypoint> {
        find_keypoint(&self.keypoints, landmark)
    }
}

/// Look up a landmark in an unordered keypoint list
pub fn find_keypoint(keypoints: &[Keypoint], landmark: BodyLandmark) -> Option<&Keypoint> {
    keypoints.iter().find(|kp| kp.name == landmark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_confidence_is_clamped() {
        let kp = Keypoint::new(BodyLandmark::Nose, 10.0, 20.0, 1.7);
        assert_eq!(kp.confidence, 1.0);
        let kp = Keypoint::new(BodyLandmark::Nose, 10.0, 20.0, -0.2);
        assert_eq!(kp.confidence, 0.0);
    }

    #[test]
    fn test_deserialized_confidence_is_clamped() {
        let kp: Keypoint =
            serde_json::from_str(r#"{"name": "left_hip", "x": 1.0, "y": 2.0, "confidence": 5.0}"#)
                .unwrap();
        assert_eq!(kp.confidence, 1.0);
        let kp: Keypoint =
            serde_json::from_str(r#"{"name": "left_hip", "x": 1.0, "y": 2.0, "confidence": -1}"#)
                .unwrap();
        assert_eq!(kp.confidence, 0.0);
    }

    #[test]
    fn test_keypoint_validation() {
        let kp = Keypoint::new(BodyLandmark::LeftHip, 100.0, 200.0, 0.9);
        assert!(kp.is_valid(0.5));
        assert!(!kp.is_valid(0.95));
        let kp = Keypoint::new(BodyLandmark::LeftHip, f64::NAN, 200.0, 0.9);
        assert!(!kp.is_valid(0.0));
    }

    #[test]
    fn test_landmark_names_round_trip_through_serde() {
        let json = serde_json::to_string(&BodyLandmark::LeftShoulder).unwrap();
        assert_eq!(json, "\"left_shoulder\"");
        let back: BodyLandmark = serde_json::from_str("\"right_knee\"").unwrap();
        assert_eq!(back, BodyLandmark::RightKnee);
    }

    #[test]
    fn test_get_keypoint_by_landmark() {
        let frame = PoseFrame::new(
            500,
            vec![
                Keypoint::new(BodyLandmark::Nose, 100.0, 200.0, 0.9),
                Keypoint::new(BodyLandmark::LeftShoulder, 150.0, 250.0, 0.8),
            ],
        );
        assert_eq!(frame.get_keypoint(BodyLandmark::Nose).unwrap().x, 100.0);
        assert!(frame.get_keypoint(BodyLandmark::LeftKnee).is_none());
    }
}
