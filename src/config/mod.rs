// Configuration for the scoring pipeline

pub mod scoring;

pub use scoring::*;
