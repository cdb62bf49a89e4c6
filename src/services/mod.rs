// Measurement and scoring services

pub mod assessment_service;
pub mod calibration_service;
pub mod geometry;
pub mod gps_analyzer;
pub mod inertial_analyzer;
pub mod rating;
pub mod score_aggregator;
pub mod simulation_service;
pub mod test_evaluator;
pub mod vision_analyzer;
pub mod vision_backend;

pub use assessment_service::AssessmentService;
pub use calibration_service::{calibrate, calibrate_detection, calibrate_label, resolve_scale, ResolvedScale};
pub use geometry::{angle, distance, round_to};
pub use rating::{rate, RatingThresholds};
pub use score_aggregator::{aggregate, normalize, normalize_and_aggregate};
pub use simulation_service::simulate_estimate;
pub use test_evaluator::{evaluate, evaluate_with_config};
pub use vision_backend::{VideoClip, VisionBackend, VisionError};
