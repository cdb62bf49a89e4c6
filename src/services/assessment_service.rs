use tracing::{info, warn};

use crate::config::{ScoringConfig, MIN_SAMPLE_INTERVAL_S};
use crate::errors::{AnalysisError, AnalysisResult, TestExecutionError};
use crate::models::{
    CalibrationData, FitnessProfile, PoseFrame, TestInputs, TestResult, TestType, VisionInputs,
};
use crate::services::calibration_service::calibrate_detection;
use crate::services::test_evaluator::evaluate_with_config;
use crate::services::vision_backend::{VideoClip, VisionBackend};

/// One assessment session: its calibration, its results, and the vision
/// backend used to read clips.
pub struct AssessmentService {
    config: ScoringConfig,
    backend: Option<Box<dyn VisionBackend>>,
    calibration: CalibrationData,
    profile: FitnessProfile,
}

impl AssessmentService {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            backend: None,
            calibration: CalibrationData::default(),
            profile: FitnessProfile::new(),
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn VisionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration
    }

    /// Replace the session calibration, e.g. with one loaded from disk
    pub fn set_calibration(&mut self, calibration: CalibrationData) {
        self.calibration = calibration;
    }

    pub fn profile(&self) -> &FitnessProfile {
        &self.profile
    }

    fn backend(&self) -> AnalysisResult<&dyn VisionBackend> {
        self.backend
            .as_deref()
            .ok_or_else(|| AnalysisError::Vision("no vision backend configured".to_string()))
    }

    /// Detect the reference object in one frame and make its scale the
    /// session calibration. The previous calibration is kept on failure.
    pub fn calibrate_frame(&mut self, clip: &VideoClip, timestamp_ms: u64) -> AnalysisResult<CalibrationData> {
        let detection = self
            .backend()?
            .detect_reference(clip, timestamp_ms)?
            .ok_or(AnalysisError::CalibrationMissing)?;

        let calibration = calibrate_detection(&detection)?;
        info!(
            "Calibrated session from {} at {} ms: {:?} px/cm",
            detection.kind, timestamp_ms, calibration.pixels_per_cm
        );
        self.calibration = calibration.clone();
        Ok(calibration)
    }

    /// Pose frames at the configured sit-up cadence over the whole clip
    pub fn sample_pose_stream(&self, clip: &VideoClip) -> AnalysisResult<Vec<PoseFrame>> {
        let backend = self.backend()?;
        let interval = self.config.situp_sample_interval_s;
        if !(interval >= MIN_SAMPLE_INTERVAL_S && clip.duration_seconds.is_finite()) {
            return Err(AnalysisError::InvalidMeasurement(format!(
                "cannot sample {} s of video every {} s",
                clip.duration_seconds, interval
            )));
        }

        let mut frames = Vec::new();
        let mut tick = 0u64;
        loop {
            let t = tick as f64 * interval;
            if t >= clip.duration_seconds {
                break;
            }
            let timestamp_ms = (t * 1000.0).round() as u64;
            frames.push(PoseFrame::new(timestamp_ms, backend.detect_pose(clip, timestamp_ms)?));
            tick += 1;
        }
        Ok(frames)
    }

    /// Evaluate prepared inputs against the session calibration and keep
    /// the result in the session profile
    pub fn evaluate(&mut self, test_type: TestType, inputs: TestInputs) -> Result<TestResult, TestExecutionError> {
        let result = evaluate_with_config(test_type, inputs, &self.calibration, &self.config)?;
        self.profile.record(result.clone());
        Ok(result)
    }

    /// Read the inputs a test needs from a clip, then evaluate them
    pub fn evaluate_clip(&mut self, test_type: TestType, clip: &VideoClip) -> Result<TestResult, TestExecutionError> {
        let inputs = self
            .clip_inputs(&test_type, clip)
            .map_err(|cause| {
                warn!("Could not read {} from {:?}: {}", test_type, clip.path, cause);
                TestExecutionError::new(test_type.clone(), cause)
            })?;
        self.evaluate(test_type, inputs)
    }

    fn clip_inputs(&self, test_type: &TestType, clip: &VideoClip) -> AnalysisResult<TestInputs> {
        let backend = self.backend()?;
        let vision = match test_type {
            TestType::SitAndReach => VisionInputs::Pose {
                keypoints: backend.detect_pose(clip, clip.midpoint_ms())?,
            },
            TestType::BroadJump | TestType::MedicineBallThrow => VisionInputs::Trajectory {
                trajectory: backend.track_object(clip)?,
            },
            TestType::SitUps => VisionInputs::PoseStream {
                frames: self.sample_pose_stream(clip)?,
                duration_seconds: clip.duration_seconds,
            },
            other => {
                return Err(AnalysisError::InputMismatch(format!(
                    "{} cannot be read from a video clip",
                    other
                )))
            }
        };
        Ok(TestInputs::Vision(vision))
    }

    /// Weighted overall score of the session's latest results
    pub fn overall_score(&self) -> f64 {
        self.profile.overall_score()
    }
}
