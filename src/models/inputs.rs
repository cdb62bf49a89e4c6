/// Evaluator input modalities
///
/// Each variant carries one already-materialized sample window. The JSON
/// shape is adjacently tagged so the CLI can read input files directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::geometry::Point2D;
use crate::models::keypoint::{Keypoint, PoseFrame};
use crate::models::sensor::{GpsFix, InertialSample, OrientationSample};
use crate::models::trajectory::Trajectory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modality", content = "data", rename_all = "snake_case")]
pub enum TestInputs {
    Vision(VisionInputs),
    Inertial(InertialInputs),
    Gps(GpsInputs),
    Manual(ManualInputs),
    Upload(UploadInputs),
}

impl TestInputs {
    pub fn modality(&self) -> &'static str {
        match self {
            TestInputs::Vision(_) => "vision",
            TestInputs::Inertial(_) => "inertial",
            TestInputs::Gps(_) => "gps",
            TestInputs::Manual(_) => "manual",
            TestInputs::Upload(_) => "upload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisionInputs {
    /// Head and floor contact points from one standing frame
    HeightFrame { head: Point2D, floor: Point2D },
    /// Keypoints from a single frame
    Pose { keypoints: Vec<Keypoint> },
    /// Tracked object path
    Trajectory { trajectory: Trajectory },
    /// Keypoints sampled over a recording
    PoseStream {
        frames: Vec<PoseFrame>,
        duration_seconds: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InertialInputs {
    Accelerometer { samples: Vec<InertialSample> },
    Orientation { samples: Vec<OrientationSample> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsInputs {
    pub fixes: Vec<GpsFix>,
    /// Endurance course; inferred from the track when absent
    #[serde(default)]
    pub course: Option<EnduranceCourse>,
}

/// Directly read measurement, e.g. a scale display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualInputs {
    pub value: f64,
}

/// Video-upload mode with no sensor ground truth
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadInputs {
    /// Seed for a reproducible estimate
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub course: Option<EnduranceCourse>,
}

/// Endurance run distances with their own rating tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnduranceCourse {
    #[serde(rename = "800m")]
    M800,
    #[serde(rename = "1600m")]
    M1600,
}

impl EnduranceCourse {
    pub fn distance_m(&self) -> f64 {
        match self {
            EnduranceCourse::M800 => 800.0,
            EnduranceCourse::M1600 => 1600.0,
        }
    }

    /// Course whose nominal distance is closest to `distance_m`
    pub fn nearest(distance_m: f64) -> Self {
        let midpoint = (EnduranceCourse::M800.distance_m() + EnduranceCourse::M1600.distance_m()) / 2.0;
        if distance_m < midpoint {
            EnduranceCourse::M800
        } else {
            EnduranceCourse::M1600
        }
    }
}

impl fmt::Display for EnduranceCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnduranceCourse::M800 => write!(f, "800m"),
            EnduranceCourse::M1600 => write!(f, "1600m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_json_shape() {
        let json = r#"{
            "modality": "vision",
            "data": {
                "kind": "height_frame",
                "head": {"x": 320.0, "y": 50.0},
                "floor": {"x": 320.0, "y": 770.0}
            }
        }"#;
        let inputs: TestInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.modality(), "vision");
        assert!(matches!(
            inputs,
            TestInputs::Vision(VisionInputs::HeightFrame { .. })
        ));
    }

    #[test]
    fn test_nearest_course() {
        assert_eq!(EnduranceCourse::nearest(790.0), EnduranceCourse::M800);
        assert_eq!(EnduranceCourse::nearest(1550.0), EnduranceCourse::M1600);
    }
}
