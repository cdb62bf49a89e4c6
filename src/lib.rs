//! Fitness-test scoring pipeline.
//!
//! Turns pose keypoints, object trajectories, inertial samples and GPS
//! fixes into calibrated, rated test results, then normalizes and weights
//! them into one overall fitness score.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::{RepCounting, ScoringConfig};
pub use errors::{AnalysisError, AnalysisResult, TestExecutionError};
pub use models::{
    CalibrationData, EnduranceCourse, FitnessProfile, Rating, ResultSource, TestInputs, TestResult,
    TestType,
};
pub use services::{
    aggregate, angle, calibrate, distance, evaluate, evaluate_with_config, normalize,
    normalize_and_aggregate, simulate_estimate, AssessmentService, VideoClip, VisionBackend,
};
