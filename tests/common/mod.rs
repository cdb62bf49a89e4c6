#![allow(dead_code)]

use std::sync::Once;

use fitscore::models::{
    BodyLandmark, GpsFix, InertialSample, Keypoint, Point2D, PoseFrame, Trajectory,
    TrajectorySample,
};

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness. Set RUST_LOG to see it.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn hip_chain(shoulder: (f64, f64), hip: (f64, f64), knee: (f64, f64), confidence: f64) -> Vec<Keypoint> {
    vec![
        Keypoint::new(BodyLandmark::LeftShoulder, shoulder.0, shoulder.1, confidence),
        Keypoint::new(BodyLandmark::LeftHip, hip.0, hip.1, confidence),
        Keypoint::new(BodyLandmark::LeftKnee, knee.0, knee.1, confidence),
    ]
}

pub fn lying_flat(t_ms: u64) -> PoseFrame {
    PoseFrame::new(t_ms, hip_chain((0.0, 100.0), (100.0, 100.0), (200.0, 100.0), 0.9))
}

pub fn sitting_up(t_ms: u64) -> PoseFrame {
    PoseFrame::new(t_ms, hip_chain((120.0, 0.0), (100.0, 100.0), (200.0, 100.0), 0.9))
}

/// Drop to -3 m/s² at 0 ms, land at +3 m/s² at 400 ms, quiet otherwise
pub fn jump_samples() -> Vec<InertialSample> {
    (0..12)
        .map(|i| {
            let t = i * 100;
            let y = match t {
                0 => -3.0,
                400 => 3.0,
                _ => 0.0,
            };
            InertialSample::new(0.0, y, 9.81, t)
        })
        .collect()
}

/// Straight east-bound track along the equator
pub fn equator_track(total_degrees: f64, legs: u32, total_ms: u64, accuracy_m: f64) -> Vec<GpsFix> {
    (0..=legs)
        .map(|i| {
            let f = i as f64 / legs as f64;
            GpsFix::new(0.0, total_degrees * f, (total_ms as f64 * f) as u64, accuracy_m)
        })
        .collect()
}

pub fn flat_trajectory(length_px: f64) -> Trajectory {
    let samples = vec![
        TrajectorySample { point: Point2D::new(0.0, 400.0), time: 0.0 },
        TrajectorySample { point: Point2D::new(length_px / 2.0, 150.0), time: 0.5 },
        TrajectorySample { point: Point2D::new(length_px, 400.0), time: 1.0 },
    ];
    Trajectory {
        landing_point: Point2D::new(length_px, 400.0),
        samples,
    }
}
