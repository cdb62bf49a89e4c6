/// Test Evaluators
///
/// One evaluator per fitness test. Each combines the analyzers with the
/// test's rounding rule and rating table and produces an immutable
/// `TestResult`. Analyzer failures surface as `TestExecutionError` tagged
/// with the test type.

use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::errors::{AnalysisError, AnalysisResult, TestExecutionError};
use crate::models::{
    CalibrationData, EnduranceCourse, GpsFix, GpsInputs, InertialInputs, InertialSample, Keypoint,
    OrientationSample, Point2D, PoseFrame, ResultSource, TestInputs, TestResult, TestType,
    Trajectory, UploadInputs, VisionInputs,
};
use crate::services::calibration_service::resolve_scale;
use crate::services::geometry::round_to;
use crate::services::rating::{feedback_for, rate};
use crate::services::{gps_analyzer, inertial_analyzer, simulation_service, vision_analyzer};

/// Accuracy for a calibrated height measurement
const HEIGHT_ACCURACY: f64 = 95.0;
/// Accuracy for a manually read scale
const WEIGHT_ACCURACY: f64 = 99.0;
/// Accuracy for trajectory distances with / without a detected reference
const TRAJECTORY_ACCURACY: f64 = 85.0;
const TRAJECTORY_FALLBACK_ACCURACY: f64 = 70.0;
/// Accuracy for accelerometer flight-time jumps
const JUMP_ACCURACY: f64 = 90.0;
/// Accuracy for orientation-timed shuttle runs
const SHUTTLE_ACCURACY: f64 = 85.0;

/// Measured values an evaluator hands to the result builder
pub(crate) struct Measurement {
    pub score: f64,
    pub accuracy: f64,
    pub course: Option<EnduranceCourse>,
    pub raw_data: serde_json::Value,
}

impl Measurement {
    pub fn new(score: f64, accuracy: f64, raw_data: serde_json::Value) -> Self {
        Self {
            score,
            accuracy,
            course: None,
            raw_data,
        }
    }

    /// Rate against a specific endurance course table
    pub fn on_course(mut self, course: EnduranceCourse) -> Self {
        self.course = Some(course);
        self
    }
}

/// Assemble a result, attaching rating and feedback for the test
pub(crate) fn build_result(test_type: TestType, measurement: Measurement, source: ResultSource) -> TestResult {
    let rating = rate(&test_type, measurement.score, measurement.course);
    TestResult {
        id: Uuid::new_v4(),
        unit: test_type.unit().to_string(),
        score: measurement.score,
        accuracy: measurement.accuracy.clamp(0.0, 100.0),
        timestamp: Utc::now(),
        rating,
        source,
        raw_data: measurement.raw_data,
        feedback: feedback_for(&test_type, rating),
        test_type,
    }
}

/// Evaluate a test with the default configuration
pub fn evaluate(
    test_type: TestType,
    inputs: TestInputs,
    calibration: &CalibrationData,
) -> Result<TestResult, TestExecutionError> {
    evaluate_with_config(test_type, inputs, calibration, &ScoringConfig::default())
}

/// Evaluate a test, dispatching on the test type and input modality
pub fn evaluate_with_config(
    test_type: TestType,
    inputs: TestInputs,
    calibration: &CalibrationData,
    config: &ScoringConfig,
) -> Result<TestResult, TestExecutionError> {
    let modality = inputs.modality();
    let outcome = dispatch(&test_type, inputs, calibration, config);

    match outcome {
        Ok(result) => {
            info!(
                "Evaluated {} from {} inputs: {} {} ({:?})",
                result.test_type, modality, result.score, result.unit, result.rating
            );
            Ok(result)
        }
        Err(cause) => {
            warn!("{} evaluation failed: {}", test_type, cause);
            Err(TestExecutionError::new(test_type, cause))
        }
    }
}

fn dispatch(
    test_type: &TestType,
    inputs: TestInputs,
    calibration: &CalibrationData,
    config: &ScoringConfig,
) -> AnalysisResult<TestResult> {
    config
        .validate()
        .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
    if let TestType::Other(id) = test_type {
        return Err(AnalysisError::UnknownTestType(id.clone()));
    }

    match (test_type, inputs) {
        (TestType::Height, TestInputs::Vision(VisionInputs::HeightFrame { head, floor })) => {
            evaluate_height(head, floor, calibration)
        }
        (TestType::Weight, TestInputs::Manual(manual)) => evaluate_weight(manual.value, config),
        (TestType::SitAndReach, TestInputs::Vision(VisionInputs::Pose { keypoints })) => {
            evaluate_sit_and_reach(&keypoints)
        }
        (
            TestType::VerticalJump,
            TestInputs::Inertial(InertialInputs::Accelerometer { samples }),
        ) => evaluate_vertical_jump(&samples),
        (TestType::BroadJump, TestInputs::Vision(VisionInputs::Trajectory { trajectory })) => {
            evaluate_broad_jump(&trajectory, calibration, config)
        }
        (
            TestType::MedicineBallThrow,
            TestInputs::Vision(VisionInputs::Trajectory { trajectory }),
        ) => evaluate_medicine_ball_throw(&trajectory, calibration, config),
        (TestType::Sprint30m, TestInputs::Gps(GpsInputs { fixes, .. })) => {
            evaluate_sprint(&fixes, config)
        }
        (TestType::ShuttleRun, TestInputs::Inertial(InertialInputs::Orientation { samples })) => {
            evaluate_shuttle_run(&samples, config)
        }
        (
            TestType::SitUps,
            TestInputs::Vision(VisionInputs::PoseStream {
                frames,
                duration_seconds,
            }),
        ) => evaluate_sit_ups(&frames, duration_seconds, config),
        (TestType::EnduranceRun, TestInputs::Gps(GpsInputs { fixes, course })) => {
            evaluate_endurance_run(&fixes, course, config)
        }
        (_, TestInputs::Upload(upload)) => evaluate_upload(test_type, &upload),
        (_, other) => Err(AnalysisError::InputMismatch(format!(
            "{} cannot be evaluated from {} inputs",
            test_type,
            other.modality()
        ))),
    }
}

/// Standing height, nearest 0.5 cm. Needs a detected reference object.
pub fn evaluate_height(
    head: Point2D,
    floor: Point2D,
    calibration: &CalibrationData,
) -> AnalysisResult<TestResult> {
    let height_cm = vision_analyzer::height_from_frame(head, floor, calibration)?;
    Ok(build_result(
        TestType::Height,
        Measurement::new(
            height_cm,
            HEIGHT_ACCURACY,
            json!({
                "head": head,
                "floor": floor,
                "pixels_per_cm": calibration.pixels_per_cm,
                "reference_object": calibration.reference_object,
            }),
        ),
        ResultSource::Measured,
    ))
}

/// Body weight from a scale reading, nearest 0.1 kg
pub fn evaluate_weight(reading_kg: f64, config: &ScoringConfig) -> AnalysisResult<TestResult> {
    if !(reading_kg.is_finite()
        && reading_kg >= config.min_weight_kg
        && reading_kg <= config.max_weight_kg)
    {
        return Err(AnalysisError::InvalidMeasurement(format!(
            "weight {} kg outside {}-{} kg",
            reading_kg, config.min_weight_kg, config.max_weight_kg
        )));
    }

    Ok(build_result(
        TestType::Weight,
        Measurement::new(
            round_to(reading_kg, 10.0),
            WEIGHT_ACCURACY,
            json!({ "reading_kg": reading_kg }),
        ),
        ResultSource::Measured,
    ))
}

/// Sit-and-reach in inches, nearest 0.5 inch, from the hip angle
pub fn evaluate_sit_and_reach(keypoints: &[Keypoint]) -> AnalysisResult<TestResult> {
    let chain = vision_analyzer::hip_chain(keypoints)?;
    let hip_angle = chain.hip_angle()?;
    let reach_cm = vision_analyzer::reach_cm_from_angle(hip_angle);
    let reach_inches = vision_analyzer::reach_inches_from_angle(hip_angle);

    Ok(build_result(
        TestType::SitAndReach,
        Measurement::new(
            reach_inches,
            chain.confidence() * 100.0,
            json!({
                "hip_angle_deg": hip_angle,
                "reach_cm": reach_cm,
                "side": chain.side,
            }),
        ),
        ResultSource::Measured,
    ))
}

/// Vertical jump in whole centimeters from accelerometer flight time
pub fn evaluate_vertical_jump(samples: &[InertialSample]) -> AnalysisResult<TestResult> {
    let flight = inertial_analyzer::detect_flight(samples)?.ok_or_else(|| {
        AnalysisError::EventNotDetected("no takeoff/landing pair in accelerometer data".to_string())
    })?;
    let height_cm = (flight.height_m() * 100.0).round();

    Ok(build_result(
        TestType::VerticalJump,
        Measurement::new(
            height_cm,
            JUMP_ACCURACY,
            json!({
                "takeoff_index": flight.takeoff_index,
                "landing_index": flight.landing_index,
                "flight_time_s": flight.flight_time_s,
                "samples": samples.len(),
            }),
        ),
        ResultSource::Measured,
    ))
}

fn trajectory_measurement(
    trajectory: &Trajectory,
    calibration: &CalibrationData,
    config: &ScoringConfig,
    divisions: f64,
) -> AnalysisResult<Measurement> {
    let scale = resolve_scale(calibration, config.default_pixels_per_cm)?;
    let meters = vision_analyzer::trajectory_distance_m(trajectory, scale.pixels_per_cm)?;
    let accuracy = if scale.is_fallback {
        TRAJECTORY_FALLBACK_ACCURACY
    } else {
        TRAJECTORY_ACCURACY
    };

    Ok(Measurement::new(
        round_to(meters, divisions),
        accuracy,
        json!({
            "distance_m": meters,
            "pixels_per_cm": scale.pixels_per_cm,
            "scale_fallback": scale.is_fallback,
            "trajectory_points": trajectory.len(),
        }),
    ))
}

/// Standing broad jump in meters, nearest 0.01 m
pub fn evaluate_broad_jump(
    trajectory: &Trajectory,
    calibration: &CalibrationData,
    config: &ScoringConfig,
) -> AnalysisResult<TestResult> {
    let m = trajectory_measurement(trajectory, calibration, config, 100.0)?;
    Ok(build_result(TestType::BroadJump, m, ResultSource::Measured))
}

/// Medicine-ball throw in meters, nearest 0.1 m
pub fn evaluate_medicine_ball_throw(
    trajectory: &Trajectory,
    calibration: &CalibrationData,
    config: &ScoringConfig,
) -> AnalysisResult<TestResult> {
    let m = trajectory_measurement(trajectory, calibration, config, 10.0)?;
    Ok(build_result(TestType::MedicineBallThrow, m, ResultSource::Measured))
}

/// 30 m sprint time in seconds, nearest 0.01 s
pub fn evaluate_sprint(fixes: &[GpsFix], config: &ScoringConfig) -> AnalysisResult<TestResult> {
    gps_analyzer::require_fixes(fixes)?;
    let distance_m = gps_analyzer::total_distance(fixes);
    gps_analyzer::check_absolute_band(distance_m, config.sprint_distance_m, config.sprint_band_m)?;

    let seconds = gps_analyzer::elapsed_time(fixes);
    if seconds <= 0.0 {
        return Err(AnalysisError::InvalidMeasurement(
            "sprint track has no elapsed time".to_string(),
        ));
    }

    Ok(build_result(
        TestType::Sprint30m,
        Measurement::new(
            round_to(seconds, 100.0),
            gps_analyzer::track_accuracy(fixes),
            json!({
                "distance_m": distance_m,
                "elapsed_s": seconds,
                "fixes": fixes.len(),
            }),
        ),
        ResultSource::Measured,
    ))
}

/// Shuttle run time in seconds, nearest 0.1 s
pub fn evaluate_shuttle_run(
    samples: &[OrientationSample],
    config: &ScoringConfig,
) -> AnalysisResult<TestResult> {
    let turns = inertial_analyzer::direction_changes(samples)?;
    if turns < config.shuttle_min_turns {
        return Err(AnalysisError::EventNotDetected(format!(
            "{} direction changes, need at least {}",
            turns, config.shuttle_min_turns
        )));
    }
    let seconds = inertial_analyzer::orientation_elapsed_s(samples);
    if seconds <= 0.0 {
        return Err(AnalysisError::InvalidMeasurement(
            "shuttle run has no elapsed time".to_string(),
        ));
    }

    Ok(build_result(
        TestType::ShuttleRun,
        Measurement::new(
            round_to(seconds, 10.0),
            SHUTTLE_ACCURACY,
            json!({
                "direction_changes": turns,
                "elapsed_s": seconds,
                "samples": samples.len(),
            }),
        ),
        ResultSource::Measured,
    ))
}

/// Sit-ups counted over the recording, whole reps
pub fn evaluate_sit_ups(
    frames: &[PoseFrame],
    duration_seconds: f64,
    config: &ScoringConfig,
) -> AnalysisResult<TestResult> {
    let analysis = vision_analyzer::situp_reps(
        frames,
        duration_seconds,
        config.situp_sample_interval_s,
        config.rep_counting,
    )?;

    Ok(build_result(
        TestType::SitUps,
        Measurement::new(
            analysis.reps as f64,
            analysis.mean_confidence * 100.0,
            json!({
                "half_reps": analysis.half_reps,
                "samples": analysis.samples,
                "hip_angles_deg": analysis.angles,
                "counting": config.rep_counting,
                "duration_s": duration_seconds,
            }),
        ),
        ResultSource::Measured,
    ))
}

/// Endurance run time in minutes, nearest 0.01 min
pub fn evaluate_endurance_run(
    fixes: &[GpsFix],
    course: Option<EnduranceCourse>,
    config: &ScoringConfig,
) -> AnalysisResult<TestResult> {
    gps_analyzer::require_fixes(fixes)?;
    let distance_m = gps_analyzer::total_distance(fixes);
    let course = course.unwrap_or_else(|| EnduranceCourse::nearest(distance_m));
    gps_analyzer::check_relative_deviation(distance_m, course.distance_m(), config.endurance_tolerance)?;

    let seconds = gps_analyzer::elapsed_time(fixes);
    if seconds <= 0.0 {
        return Err(AnalysisError::InvalidMeasurement(
            "endurance track has no elapsed time".to_string(),
        ));
    }

    Ok(build_result(
        TestType::EnduranceRun,
        Measurement::new(
            round_to(seconds / 60.0, 100.0),
            gps_analyzer::track_accuracy(fixes),
            json!({
                "course": course,
                "distance_m": distance_m,
                "elapsed_s": seconds,
                "fixes": fixes.len(),
            }),
        )
        .on_course(course),
        ResultSource::Measured,
    ))
}

/// Upload-mode fallback: a labelled simulated estimate
fn evaluate_upload(test_type: &TestType, upload: &UploadInputs) -> AnalysisResult<TestResult> {
    let mut rng = match upload.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    simulation_service::simulate_estimate(test_type, upload.course, &mut rng)
}
