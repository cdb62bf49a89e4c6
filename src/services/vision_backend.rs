/// Pose estimation and object tracking seam.
///
/// The scoring core never decodes video itself. A backend (an on-device
/// model, a remote service, a fixture in tests) turns a clip into keypoints,
/// trajectories and reference-object boxes; everything downstream works on
/// those values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::errors::AnalysisError;
use crate::models::{Keypoint, ReferenceDetection, Trajectory};

/// A recorded test attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoClip {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,
    pub fps: f64,
}

impl VideoClip {
    pub fn new(path: impl Into<PathBuf>, duration_seconds: f64) -> Self {
        Self {
            path: path.into(),
            width: 1280,
            height: 720,
            duration_seconds,
            fps: 30.0,
        }
    }

    pub fn resolution_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Clip midpoint in milliseconds, used for single-frame poses
    pub fn midpoint_ms(&self) -> u64 {
        (self.duration_seconds.max(0.0) * 500.0).round() as u64
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisionError {
    #[error("Failed to decode {0}")]
    Decode(String),
    #[error("Model inference failed: {0}")]
    Inference(String),
    #[error("Timestamp {timestamp_ms} ms is outside the clip")]
    OutOfRange { timestamp_ms: u64 },
    #[error("Nothing to track in the clip")]
    NoTrack,
}

impl From<VisionError> for AnalysisError {
    fn from(err: VisionError) -> Self {
        AnalysisError::Vision(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait VisionBackend: Send + Sync {
    /// Keypoints of the person in the frame at `timestamp_ms`
    fn detect_pose(&self, clip: &VideoClip, timestamp_ms: u64) -> Result<Vec<Keypoint>, VisionError>;

    /// Path of the tracked object (ball, jumper's heels) across the clip
    fn track_object(&self, clip: &VideoClip) -> Result<Trajectory, VisionError>;

    /// Reference object in the frame at `timestamp_ms`, if one is visible
    fn detect_reference(
        &self,
        clip: &VideoClip,
        timestamp_ms: u64,
    ) -> Result<Option<ReferenceDetection>, VisionError>;
}
