/// Vision Signal Analyzer
///
/// Derives test quantities from pose keypoints and tracked trajectories:
/// - Standing height from head and floor contact points
/// - Hip flexion angle and the sit-and-reach distance derived from it
/// - Throw / jump distance from an object trajectory
/// - Sit-up repetitions from a sampled keypoint stream

use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

use crate::config::{RepCounting, MIN_SAMPLE_INTERVAL_S};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::{find_keypoint, BodyLandmark, CalibrationData, Keypoint, Point2D, PoseFrame, Trajectory};
use crate::services::geometry::{angle, distance, round_to};

/// Minimum samples for trajectory-based analysis
pub const MIN_TRAJECTORY_POINTS: usize = 3;

/// Empirical slope from hip angle deficit (degrees below 90) to reach in cm.
/// Placeholder mapping pending real calibration data, not a physical law.
pub const REACH_CM_PER_DEGREE: f64 = 0.3;

pub const INCHES_PER_CM: f64 = 0.393701;

/// Shoulder-hip-knee angle above which the torso counts as extended
pub const EXTENSION_THRESHOLD_DEG: f64 = 160.0;

/// Shoulder-hip-knee angle below which the torso counts as contracted
pub const CONTRACTION_THRESHOLD_DEG: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    Left,
    Right,
}

/// Shoulder, hip and knee from one side of the body
#[derive(Debug, Clone, Copy)]
pub struct HipChain<'a> {
    pub side: BodySide,
    pub shoulder: &'a Keypoint,
    pub hip: &'a Keypoint,
    pub knee: &'a Keypoint,
}

impl HipChain<'_> {
    /// Angle at the hip between shoulder and knee, in degrees
    pub fn hip_angle(&self) -> AnalysisResult<f64> {
        angle(self.shoulder.point(), self.hip.point(), self.knee.point())
    }

    /// Lowest confidence of the three landmarks
    pub fn confidence(&self) -> f64 {
        self.shoulder
            .confidence
            .min(self.hip.confidence)
            .min(self.knee.confidence)
    }
}

/// Pick the left shoulder-hip-knee chain, or the right one when the left is
/// incomplete. Keypoints with non-finite coordinates count as missing.
/// Fails naming the first missing left-side landmark.
pub fn hip_chain(keypoints: &[Keypoint]) -> AnalysisResult<HipChain<'_>> {
    let usable = |landmark| find_keypoint(keypoints, landmark).filter(|kp| kp.is_valid(0.0));
    let sides = [
        (
            BodySide::Left,
            [BodyLandmark::LeftShoulder, BodyLandmark::LeftHip, BodyLandmark::LeftKnee],
        ),
        (
            BodySide::Right,
            [BodyLandmark::RightShoulder, BodyLandmark::RightHip, BodyLandmark::RightKnee],
        ),
    ];

    for (side, [shoulder, hip, knee]) in sides {
        if let (Some(shoulder), Some(hip), Some(knee)) = (usable(shoulder), usable(hip), usable(knee)) {
            return Ok(HipChain {
                side,
                shoulder,
                hip,
                knee,
            });
        }
    }

    let missing = sides[0]
        .1
        .into_iter()
        .find(|landmark| usable(*landmark).is_none())
        .unwrap_or(BodyLandmark::LeftHip);
    Err(AnalysisError::MissingLandmark(missing))
}

/// Standing height in cm, rounded to the nearest 0.5 cm.
///
/// Requires a detected reference object; the default scale is not accurate
/// enough for a direct body measurement.
pub fn height_from_frame(
    head: Point2D,
    floor: Point2D,
    calibration: &CalibrationData,
) -> AnalysisResult<f64> {
    let pixels_per_cm = match (calibration.reference_object, calibration.pixels_per_cm) {
        (Some(_), Some(scale)) => scale,
        _ => return Err(AnalysisError::CalibrationMissing),
    };

    let height_cm = distance(head, floor, pixels_per_cm)?;
    debug!("Raw height {:.3} cm at {:.3} px/cm", height_cm, pixels_per_cm);
    Ok(round_to(height_cm, 2.0))
}

/// Hip flexion angle for the sit-and-reach pose, in degrees
pub fn flexibility_angle(keypoints: &[Keypoint]) -> AnalysisResult<f64> {
    hip_chain(keypoints)?.hip_angle()
}

/// Reach in centimeters implied by a hip angle, never negative
pub fn reach_cm_from_angle(hip_angle_deg: f64) -> f64 {
    ((90.0 - hip_angle_deg) * REACH_CM_PER_DEGREE).max(0.0)
}

/// Sit-and-reach distance in inches, rounded to the nearest 0.5 inch
pub fn reach_inches_from_angle(hip_angle_deg: f64) -> f64 {
    round_to(reach_cm_from_angle(hip_angle_deg) * INCHES_PER_CM, 2.0)
}

/// Straight-line distance from release to landing, in meters (unrounded)
pub fn trajectory_distance_m(trajectory: &Trajectory, pixels_per_cm: f64) -> AnalysisResult<f64> {
    if trajectory.len() < MIN_TRAJECTORY_POINTS {
        return Err(AnalysisError::InsufficientTrajectory {
            required: MIN_TRAJECTORY_POINTS,
            actual: trajectory.len(),
        });
    }
    if !trajectory.is_time_ordered() {
        return Err(AnalysisError::InvalidMeasurement(
            "trajectory timestamps must not decrease".to_string(),
        ));
    }

    let start = trajectory
        .start()
        .ok_or(AnalysisError::InsufficientTrajectory {
            required: MIN_TRAJECTORY_POINTS,
            actual: 0,
        })?;
    let cm = distance(start, trajectory.landing_point, pixels_per_cm)?;
    debug!(
        "Trajectory of {} points spans {:.2} cm",
        trajectory.len(),
        cm
    );
    Ok(cm / 100.0)
}

/// Throw distance in meters (unrounded)
pub fn throw_distance(trajectory: &Trajectory, pixels_per_cm: f64) -> AnalysisResult<f64> {
    trajectory_distance_m(trajectory, pixels_per_cm)
}

/// Frames sampled at a fixed cadence over `duration_seconds`.
///
/// Each tick takes the latest frame at or before it, provided that frame is
/// less than one interval old. Ticks with no such frame are skipped, so a
/// stream that stops early is never padded with repeated poses.
pub fn sample_pose_stream(
    frames: &[PoseFrame],
    duration_seconds: f64,
    interval_seconds: f64,
) -> Vec<&PoseFrame> {
    let mut ordered: Vec<&PoseFrame> = frames.iter().collect();
    ordered.sort_by_key(|f| f.timestamp_ms);

    let mut sampled = Vec::new();
    if !(interval_seconds.is_finite()
        && interval_seconds >= MIN_SAMPLE_INTERVAL_S
        && duration_seconds.is_finite())
    {
        return sampled;
    }
    let interval_ms = (interval_seconds * 1000.0).round() as u64;
    let duration_ms = duration_seconds * 1000.0;

    // Every iteration either samples a frame or jumps to the next one
    let mut tick = 0u64;
    let mut next = 0usize;
    loop {
        let t_ms = tick.saturating_mul(interval_ms);
        if t_ms as f64 >= duration_ms {
            break;
        }
        while next < ordered.len() && ordered[next].timestamp_ms <= t_ms {
            next += 1;
        }
        if let Some(frame) = next.checked_sub(1).map(|i| ordered[i]) {
            if t_ms - frame.timestamp_ms < interval_ms {
                sampled.push(frame);
                tick += 1;
                continue;
            }
        }
        match ordered.get(next) {
            Some(upcoming) => tick = upcoming.timestamp_ms.div_ceil(interval_ms),
            None => break,
        }
    }
    sampled
}

/// Per-sample diagnostics of a sit-up count
#[derive(Debug, Clone, Serialize)]
pub struct SitupAnalysis {
    pub reps: u32,
    pub half_reps: u32,
    pub samples: usize,
    pub angles: Vec<f64>,
    pub mean_confidence: f64,
}

/// Count sit-ups in a keypoint stream.
///
/// The reference counter adds a half rep for every sample above
/// [`EXTENSION_THRESHOLD_DEG`] or below [`CONTRACTION_THRESHOLD_DEG`] and has
/// no hysteresis, so noisy input over-counts.
pub fn situp_reps(
    frames: &[PoseFrame],
    duration_seconds: f64,
    interval_seconds: f64,
    counting: RepCounting,
) -> AnalysisResult<SitupAnalysis> {
    if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
        return Err(AnalysisError::InvalidMeasurement(format!(
            "sit-up duration must be positive, got {}",
            duration_seconds
        )));
    }

    if !(interval_seconds.is_finite() && interval_seconds >= MIN_SAMPLE_INTERVAL_S) {
        return Err(AnalysisError::InvalidMeasurement(format!(
            "sit-up sampling interval must be at least {} s, got {}",
            MIN_SAMPLE_INTERVAL_S, interval_seconds
        )));
    }

    let sampled = sample_pose_stream(frames, duration_seconds, interval_seconds);
    if sampled.is_empty() {
        return Err(AnalysisError::InsufficientSamples {
            required: 1,
            actual: 0,
        });
    }

    let mut angles = Vec::with_capacity(sampled.len());
    let mut confidences = Vec::with_capacity(sampled.len());
    for frame in &sampled {
        let chain = hip_chain(&frame.keypoints)?;
        angles.push(chain.hip_angle()?);
        confidences.push(chain.confidence());
    }

    let half_reps = match counting {
        RepCounting::Reference => count_half_reps_reference(&angles),
        RepCounting::PhaseDebounced => count_half_reps_debounced(&angles),
    };
    let reps = half_reps / 2;
    debug!(
        "Sit-ups: {} samples, {} half reps, {} reps ({:?})",
        sampled.len(),
        half_reps,
        reps,
        counting
    );

    Ok(SitupAnalysis {
        reps,
        half_reps,
        samples: sampled.len(),
        angles,
        mean_confidence: confidences.iter().mean(),
    })
}

fn count_half_reps_reference(angles: &[f64]) -> u32 {
    angles
        .iter()
        .filter(|a| **a > EXTENSION_THRESHOLD_DEG || **a < CONTRACTION_THRESHOLD_DEG)
        .count() as u32
}

#[derive(Clone, Copy, PartialEq)]
enum Phase {
    Extended,
    Contracted,
}

fn count_half_reps_debounced(angles: &[f64]) -> u32 {
    let mut phase: Option<Phase> = None;
    let mut half_reps = 0;

    for &a in angles {
        let next = if a > EXTENSION_THRESHOLD_DEG {
            Some(Phase::Extended)
        } else if a < CONTRACTION_THRESHOLD_DEG {
            Some(Phase::Contracted)
        } else {
            None
        };

        if let Some(next) = next {
            if phase.is_some_and(|p| p != next) {
                half_reps += 1;
            }
            phase = Some(next);
        }
    }
    half_reps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReferenceObjectKind, TrajectorySample};
    use assert_matches::assert_matches;

    fn left_chain(shoulder: (f64, f64), hip: (f64, f64), knee: (f64, f64)) -> Vec<Keypoint> {
        vec![
            Keypoint::new(BodyLandmark::LeftShoulder, shoulder.0, shoulder.1, 0.9),
            Keypoint::new(BodyLandmark::LeftHip, hip.0, hip.1, 0.8),
            Keypoint::new(BodyLandmark::LeftKnee, knee.0, knee.1, 0.85),
        ]
    }

    /// Lying flat: shoulder, hip and knee on a line (180°)
    fn extended_frame(t_ms: u64) -> PoseFrame {
        PoseFrame::new(t_ms, left_chain((0.0, 100.0), (100.0, 100.0), (200.0, 100.0)))
    }

    /// Sitting up: shoulder straight above the hip (90° minus a bit)
    fn contracted_frame(t_ms: u64) -> PoseFrame {
        PoseFrame::new(t_ms, left_chain((120.0, 0.0), (100.0, 100.0), (200.0, 100.0)))
    }

    #[test]
    fn test_height_rounds_to_half_cm() {
        let calibration = CalibrationData::from_reference(ReferenceObjectKind::CreditCard, 10.0);
        let h = height_from_frame(Point2D::new(320.0, 50.0), Point2D::new(320.0, 773.0), &calibration)
            .unwrap();
        assert_eq!(h, 72.5);
    }

    #[test]
    fn test_height_requires_reference() {
        let calibration = CalibrationData {
            pixels_per_cm: Some(10.0),
            ..Default::default()
        };
        assert_matches!(
            height_from_frame(Point2D::new(0.0, 0.0), Point2D::new(0.0, 100.0), &calibration),
            Err(AnalysisError::CalibrationMissing)
        );
    }

    #[test]
    fn test_flexibility_prefers_left_side() {
        let mut keypoints = left_chain((0.0, 0.0), (0.0, 100.0), (100.0, 100.0));
        keypoints.push(Keypoint::new(BodyLandmark::RightShoulder, 0.0, 0.0, 0.9));
        keypoints.push(Keypoint::new(BodyLandmark::RightHip, 0.0, 100.0, 0.9));
        keypoints.push(Keypoint::new(BodyLandmark::RightKnee, -100.0, 200.0, 0.9));
        let chain = hip_chain(&keypoints).unwrap();
        assert_eq!(chain.side, BodySide::Left);
        assert!((flexibility_angle(&keypoints).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_flexibility_falls_back_to_right_side() {
        let keypoints = vec![
            Keypoint::new(BodyLandmark::LeftShoulder, 0.0, 0.0, 0.9),
            Keypoint::new(BodyLandmark::RightShoulder, 0.0, 0.0, 0.9),
            Keypoint::new(BodyLandmark::RightHip, 0.0, 100.0, 0.9),
            Keypoint::new(BodyLandmark::RightKnee, 100.0, 100.0, 0.9),
        ];
        assert_eq!(hip_chain(&keypoints).unwrap().side, BodySide::Right);
    }

    #[test]
    fn test_missing_landmark_names_left_side() {
        let keypoints = vec![
            Keypoint::new(BodyLandmark::LeftShoulder, 0.0, 0.0, 0.9),
            Keypoint::new(BodyLandmark::LeftHip, 0.0, 100.0, 0.9),
        ];
        assert_matches!(
            flexibility_angle(&keypoints),
            Err(AnalysisError::MissingLandmark(BodyLandmark::LeftKnee))
        );
    }

    #[test]
    fn test_non_finite_keypoint_counts_as_missing() {
        let keypoints = left_chain((f64::NAN, 0.0), (0.0, 100.0), (100.0, 100.0));
        assert_matches!(
            flexibility_angle(&keypoints),
            Err(AnalysisError::MissingLandmark(BodyLandmark::LeftShoulder))
        );
    }

    #[test]
    fn test_reach_mapping() {
        // 90° or more means no reach at all
        assert_eq!(reach_cm_from_angle(120.0), 0.0);
        // 40° deficit → 12 cm → 4.724 in → 4.5 in
        assert!((reach_cm_from_angle(50.0) - 12.0).abs() < 1e-9);
        assert_eq!(reach_inches_from_angle(50.0), 4.5);
    }

    #[test]
    fn test_throw_distance_meters() {
        let trajectory = Trajectory {
            samples: vec![
                TrajectorySample { point: Point2D::new(0.0, 500.0), time: 0.0 },
                TrajectorySample { point: Point2D::new(1500.0, 100.0), time: 0.5 },
                TrajectorySample { point: Point2D::new(3000.0, 500.0), time: 1.0 },
            ],
            landing_point: Point2D::new(3000.0, 500.0),
        };
        let meters = throw_distance(&trajectory, 5.0).unwrap();
        assert!((meters - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_trajectory_is_rejected() {
        let trajectory = Trajectory {
            samples: vec![
                TrajectorySample { point: Point2D::new(0.0, 0.0), time: 0.0 },
                TrajectorySample { point: Point2D::new(10.0, 0.0), time: 0.1 },
            ],
            landing_point: Point2D::new(10.0, 0.0),
        };
        assert_matches!(
            throw_distance(&trajectory, 5.0),
            Err(AnalysisError::InsufficientTrajectory { required: 3, actual: 2 })
        );
    }

    #[test]
    fn test_sampling_cadence() {
        let frames: Vec<PoseFrame> = (0..20).map(|i| extended_frame(i * 100)).collect();
        let sampled = sample_pose_stream(&frames, 2.0, 0.5);
        let times: Vec<u64> = sampled.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(times, vec![0, 500, 1000, 1500]);
    }

    #[test]
    fn test_reference_counter_counts_every_extreme_sample() {
        // extended, contracted, extended, contracted → 4 half reps → 2 reps
        let frames = vec![
            extended_frame(0),
            contracted_frame(500),
            extended_frame(1000),
            contracted_frame(1500),
        ];
        let analysis = situp_reps(&frames, 2.0, 0.5, RepCounting::Reference).unwrap();
        assert_eq!(analysis.half_reps, 4);
        assert_eq!(analysis.reps, 2);
    }

    #[test]
    fn test_stream_ending_early_is_not_padded() {
        let frames = vec![
            extended_frame(0),
            contracted_frame(500),
            extended_frame(1000),
            contracted_frame(1500),
        ];
        let analysis = situp_reps(&frames, 60.0, 0.5, RepCounting::Reference).unwrap();
        assert_eq!(analysis.samples, 4);
        assert_eq!(analysis.reps, 2);
    }

    #[test]
    fn test_sampling_skips_gaps_in_the_stream() {
        let frames = vec![extended_frame(0), extended_frame(250), contracted_frame(3000)];
        let sampled = sample_pose_stream(&frames, 1e12, 0.5);
        let times: Vec<u64> = sampled.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(times, vec![0, 250, 3000]);
    }

    #[test]
    fn test_tiny_sampling_interval_is_rejected() {
        let frames = vec![extended_frame(0), contracted_frame(500)];
        assert_matches!(
            situp_reps(&frames, 1.0, 1e-12, RepCounting::Reference),
            Err(AnalysisError::InvalidMeasurement(_))
        );
    }

    #[test]
    fn test_reference_counter_over_counts_holds() {
        // Holding the extended position still accumulates half reps
        let frames: Vec<PoseFrame> = (0..6).map(|i| extended_frame(i * 500)).collect();
        let reference = situp_reps(&frames, 3.0, 0.5, RepCounting::Reference).unwrap();
        assert_eq!(reference.reps, 3);

        let debounced = situp_reps(&frames, 3.0, 0.5, RepCounting::PhaseDebounced).unwrap();
        assert_eq!(debounced.reps, 0);
    }

    #[test]
    fn test_situps_missing_knee_fails() {
        let frames = vec![PoseFrame::new(
            0,
            vec![
                Keypoint::new(BodyLandmark::LeftShoulder, 0.0, 0.0, 0.9),
                Keypoint::new(BodyLandmark::LeftHip, 0.0, 100.0, 0.9),
            ],
        )];
        assert_matches!(
            situp_reps(&frames, 1.0, 0.5, RepCounting::Reference),
            Err(AnalysisError::MissingLandmark(BodyLandmark::LeftKnee))
        );
    }

    #[test]
    fn test_situps_without_frames_in_window() {
        let frames = vec![extended_frame(5000)];
        assert_matches!(
            situp_reps(&frames, 2.0, 0.5, RepCounting::Reference),
            Err(AnalysisError::InsufficientSamples { .. })
        );
    }
}
