use thiserror::Error;

use crate::models::{BodyLandmark, TestType};

/// Failure raised by an analyzer or evaluator precondition.
///
/// Every variant is scoped to a single evaluation; none of them leave shared
/// state behind, so callers can report the failure and carry on with other
/// tests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid scale: pixels per cm must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("Missing landmark: {0}")]
    MissingLandmark(BodyLandmark),
    #[error("Insufficient trajectory: need at least {required} points, got {actual}")]
    InsufficientTrajectory { required: usize, actual: usize },
    #[error("Calibration missing: no reference object was detected")]
    CalibrationMissing,
    #[error("Implausible track: {0}")]
    ImplausibleTrack(String),
    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
    #[error("Unknown test type: {0}")]
    UnknownTestType(String),
    #[error("Event not detected: {0}")]
    EventNotDetected(String),
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("Input mismatch: {0}")]
    InputMismatch(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Vision backend error: {0}")]
    Vision(String),
}

/// An evaluator failure, tagged with the test it belongs to.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{test_type} evaluation failed: {cause}")]
pub struct TestExecutionError {
    pub test_type: TestType,
    #[source]
    pub cause: AnalysisError,
}

impl TestExecutionError {
    pub fn new(test_type: TestType, cause: AnalysisError) -> Self {
        Self { test_type, cause }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_message_names_test_and_cause() {
        let err = TestExecutionError::new(
            TestType::SitUps,
            AnalysisError::MissingLandmark(BodyLandmark::LeftKnee),
        );
        assert_eq!(
            err.to_string(),
            "sit_ups evaluation failed: Missing landmark: left_knee"
        );
    }

    #[test]
    fn test_source_is_the_analysis_error() {
        use std::error::Error as _;

        let err = TestExecutionError::new(TestType::Height, AnalysisError::CalibrationMissing);
        let source = err.source().expect("cause should be exposed as source");
        assert_eq!(
            source.to_string(),
            "Calibration missing: no reference object was detected"
        );
    }
}
