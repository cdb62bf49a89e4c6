use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use fitscore::models::{CalibrationData, ReferenceObjectKind};
use fitscore::services::calibration_service::IDENTITY_SCALE;
use fitscore::services::calibrate_label;
use std::fs;
use std::path::PathBuf;

use super::render::print_json;
use super::Context;
use crate::config::OutputFormat;

#[derive(Args)]
pub struct CalibrateCommand {
    /// Reference object (credit_card, coin_quarter, coin_penny, smartphone, a4_paper)
    #[arg(short, long)]
    object: String,

    /// Detected width of the object in pixels
    #[arg(short, long)]
    width: f64,

    /// Detected height of the object in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Write the resulting calibration as JSON for later `evaluate` runs
    #[arg(long)]
    save: Option<PathBuf>,
}

impl CalibrateCommand {
    pub fn execute(&self, ctx: &Context) -> Result<()> {
        let pixels_per_cm = calibrate_label(&self.object, self.width, self.height)?;
        let calibration = match self.object.parse::<ReferenceObjectKind>() {
            Ok(kind) => CalibrationData::from_reference(kind, pixels_per_cm),
            Err(_) => CalibrationData {
                pixels_per_cm: Some(pixels_per_cm),
                ..Default::default()
            },
        };

        if let Some(path) = &self.save {
            let json = serde_json::to_string_pretty(&calibration)?;
            fs::write(path, json)
                .with_context(|| format!("Failed to write calibration to {}", path.display()))?;
        }

        match ctx.format {
            OutputFormat::Json => print_json(&calibration)?,
            OutputFormat::Text => {
                if calibration.is_calibrated() {
                    println!("✓ Scale: {:.4} px/cm", pixels_per_cm);
                } else {
                    println!(
                        "{} Unknown reference object '{}', using {} px/cm",
                        "!".yellow(),
                        self.object,
                        IDENTITY_SCALE
                    );
                }
                if let Some(path) = &self.save {
                    println!("  Saved to {}", path.display());
                }
            }
        }

        Ok(())
    }
}
