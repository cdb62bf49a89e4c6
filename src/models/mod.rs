// Data models for measurements, calibration and results

pub mod calibration;
pub mod geometry;
pub mod inputs;
pub mod keypoint;
pub mod profile;
pub mod sensor;
pub mod test_result;
pub mod trajectory;

pub use calibration::*;
pub use geometry::*;
pub use inputs::*;
pub use keypoint::*;
pub use profile::*;
pub use sensor::*;
pub use test_result::*;
pub use trajectory::*;
