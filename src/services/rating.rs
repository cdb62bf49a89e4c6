/// Four-bucket rating tables
///
/// Every score, NaN included, lands in exactly one bucket: anything that
/// fails all three cut-offs is Poor.

use crate::models::{EnduranceCourse, Rating, TestType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingThresholds {
    pub excellent: f64,
    pub good: f64,
    pub average: f64,
    pub lower_is_better: bool,
}

impl RatingThresholds {
    pub fn classify(&self, score: f64) -> Rating {
        let meets = |cutoff: f64| {
            if self.lower_is_better {
                score <= cutoff
            } else {
                score >= cutoff
            }
        };

        if meets(self.excellent) {
            Rating::Excellent
        } else if meets(self.good) {
            Rating::Good
        } else if meets(self.average) {
            Rating::Average
        } else {
            Rating::Poor
        }
    }
}

/// Rating table for a test; `None` for direct measurements.
///
/// Timed tests rate lower scores higher. Endurance runs need their course;
/// without one the 1600 m table applies.
pub fn thresholds_for(test_type: &TestType, course: Option<EnduranceCourse>) -> Option<RatingThresholds> {
    let (excellent, good, average) = match test_type {
        TestType::Height | TestType::Weight | TestType::Other(_) => return None,
        TestType::SitAndReach => (8.0, 6.0, 4.0),
        TestType::VerticalJump => (50.0, 40.0, 30.0),
        TestType::BroadJump => (2.4, 2.0, 1.6),
        TestType::MedicineBallThrow => (7.0, 5.5, 4.0),
        TestType::Sprint30m => (2.8, 3.2, 3.6),
        TestType::ShuttleRun => (10.0, 11.0, 12.0),
        TestType::SitUps => (45.0, 35.0, 25.0),
        TestType::EnduranceRun => match course.unwrap_or(EnduranceCourse::M1600) {
            EnduranceCourse::M800 => (2.5, 3.0, 3.5),
            EnduranceCourse::M1600 => (6.0, 7.5, 9.0),
        },
    };
    Some(RatingThresholds {
        excellent,
        good,
        average,
        lower_is_better: test_type.lower_is_better(),
    })
}

pub fn rate(test_type: &TestType, score: f64, course: Option<EnduranceCourse>) -> Option<Rating> {
    thresholds_for(test_type, course).map(|t| t.classify(score))
}

/// Feedback line shown with a result
pub fn feedback_for(test_type: &TestType, rating: Option<Rating>) -> String {
    let name = test_type.display_name();
    match rating {
        None => format!("{} recorded.", name),
        Some(Rating::Excellent) => format!("Excellent {} result, well above the benchmark.", name),
        Some(Rating::Good) => format!("Good {} result. Keep training to reach the top bracket.", name),
        Some(Rating::Average) => format!("Average {} result. Focused practice will move this up.", name),
        Some(Rating::Poor) => format!("{} is below the benchmark. Build up gradually and retest.", name),
    }
}
