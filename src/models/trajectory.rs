use serde::{Deserialize, Serialize};

use crate::models::geometry::Point2D;

/// One tracked object position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub point: Point2D,
    /// Seconds from the start of the tracked span
    pub time: f64,
}

/// Object path across a video span, as produced by a tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub samples: Vec<TrajectorySample>,
    pub landing_point: Point2D,
}

impl Trajectory {
    /// Build a trajectory whose landing point is its last sample
    pub fn from_samples(samples: Vec<TrajectorySample>) -> Option<Self> {
        let landing_point = samples.last()?.point;
        Some(Self {
            samples,
            landing_point,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn start(&self) -> Option<Point2D> {
        self.samples.first().map(|s| s.point)
    }

    /// Times never decrease along the path
    pub fn is_time_ordered(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].time <= w[1].time)
    }
}
