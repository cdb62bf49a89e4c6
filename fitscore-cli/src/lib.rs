// Library exports for the fitscore CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
