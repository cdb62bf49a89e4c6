use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Shortest sit-up sampling interval accepted, in seconds
pub const MIN_SAMPLE_INTERVAL_S: f64 = 0.01;

/// How sit-up half reps are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepCounting {
    /// Every sample beyond either threshold counts as a half rep
    Reference,
    /// Half reps count only on a change between extended and contracted
    /// phases. Deviates from reference scoring; opt in explicitly.
    PhaseDebounced,
}

impl FromStr for RepCounting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reference" => Ok(RepCounting::Reference),
            "phase_debounced" => Ok(RepCounting::PhaseDebounced),
            other => bail!("Unknown rep counting mode: {}", other),
        }
    }
}

/// Tunables for the scoring pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Scale used when a session carries no pixels-per-cm
    #[serde(default = "default_pixels_per_cm")]
    pub default_pixels_per_cm: f64,

    #[serde(default = "default_situp_sample_interval")]
    pub situp_sample_interval_s: f64,

    #[serde(default = "default_rep_counting")]
    pub rep_counting: RepCounting,

    /// Allowed relative deviation from the endurance course distance
    #[serde(default = "default_endurance_tolerance")]
    pub endurance_tolerance: f64,

    #[serde(default = "default_sprint_distance")]
    pub sprint_distance_m: f64,

    /// Allowed absolute deviation from the sprint distance
    #[serde(default = "default_sprint_band")]
    pub sprint_band_m: f64,

    #[serde(default = "default_shuttle_min_turns")]
    pub shuttle_min_turns: u32,

    #[serde(default = "default_min_weight")]
    pub min_weight_kg: f64,

    #[serde(default = "default_max_weight")]
    pub max_weight_kg: f64,
}

// Default value functions
fn default_pixels_per_cm() -> f64 {
    5.0
}

fn default_situp_sample_interval() -> f64 {
    0.5
}

fn default_rep_counting() -> RepCounting {
    RepCounting::Reference
}

fn default_endurance_tolerance() -> f64 {
    0.10
}

fn default_sprint_distance() -> f64 {
    30.0
}

fn default_sprint_band() -> f64 {
    5.0
}

fn default_shuttle_min_turns() -> u32 {
    1
}

fn default_min_weight() -> f64 {
    20.0
}

fn default_max_weight() -> f64 {
    300.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_pixels_per_cm: default_pixels_per_cm(),
            situp_sample_interval_s: default_situp_sample_interval(),
            rep_counting: default_rep_counting(),
            endurance_tolerance: default_endurance_tolerance(),
            sprint_distance_m: default_sprint_distance(),
            sprint_band_m: default_sprint_band(),
            shuttle_min_turns: default_shuttle_min_turns(),
            min_weight_kg: default_min_weight(),
            max_weight_kg: default_max_weight(),
        }
    }
}

impl ScoringConfig {
    /// Build configuration from `FITSCORE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for absent keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Apply `FITSCORE_*` environment variables on top of this configuration
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Replace fields whose key the lookup resolves, keeping the rest
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
            F: Fn(&str) -> Option<String>,
        {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
                None => Ok(default),
            }
        }

        let config = Self {
            default_pixels_per_cm: parse_or(
                &lookup,
                "FITSCORE_DEFAULT_PIXELS_PER_CM",
                self.default_pixels_per_cm,
            )?,
            situp_sample_interval_s: parse_or(
                &lookup,
                "FITSCORE_SITUP_SAMPLE_INTERVAL_S",
                self.situp_sample_interval_s,
            )?,
            rep_counting: parse_or(&lookup, "FITSCORE_REP_COUNTING", self.rep_counting)?,
            endurance_tolerance: parse_or(
                &lookup,
                "FITSCORE_ENDURANCE_TOLERANCE",
                self.endurance_tolerance,
            )?,
            sprint_distance_m: parse_or(
                &lookup,
                "FITSCORE_SPRINT_DISTANCE_M",
                self.sprint_distance_m,
            )?,
            sprint_band_m: parse_or(&lookup, "FITSCORE_SPRINT_BAND_M", self.sprint_band_m)?,
            shuttle_min_turns: parse_or(
                &lookup,
                "FITSCORE_SHUTTLE_MIN_TURNS",
                self.shuttle_min_turns,
            )?,
            min_weight_kg: parse_or(&lookup, "FITSCORE_MIN_WEIGHT_KG", self.min_weight_kg)?,
            max_weight_kg: parse_or(&lookup, "FITSCORE_MAX_WEIGHT_KG", self.max_weight_kg)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.default_pixels_per_cm.is_finite() && self.default_pixels_per_cm > 0.0) {
            bail!(
                "default_pixels_per_cm must be positive and finite, got {}",
                self.default_pixels_per_cm
            );
        }
        if !(self.situp_sample_interval_s.is_finite()
            && self.situp_sample_interval_s >= MIN_SAMPLE_INTERVAL_S)
        {
            bail!(
                "situp_sample_interval_s must be at least {}, got {}",
                MIN_SAMPLE_INTERVAL_S,
                self.situp_sample_interval_s
            );
        }
        if !(self.endurance_tolerance > 0.0 && self.endurance_tolerance < 1.0) {
            bail!(
                "endurance_tolerance must be within (0, 1), got {}",
                self.endurance_tolerance
            );
        }
        if !(self.sprint_distance_m > 0.0 && self.sprint_band_m >= 0.0) {
            bail!("sprint distance must be positive and band non-negative");
        }
        if self.min_weight_kg >= self.max_weight_kg {
            bail!(
                "min_weight_kg ({}) must be below max_weight_kg ({})",
                self.min_weight_kg,
                self.max_weight_kg
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ScoringConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(config.default_pixels_per_cm, 5.0);
        assert_eq!(config.situp_sample_interval_s, 0.5);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = ScoringConfig::from_lookup(lookup_from(&[
            ("FITSCORE_DEFAULT_PIXELS_PER_CM", "7.5"),
            ("FITSCORE_REP_COUNTING", "phase_debounced"),
            ("FITSCORE_SHUTTLE_MIN_TURNS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.default_pixels_per_cm, 7.5);
        assert_eq!(config.rep_counting, RepCounting::PhaseDebounced);
        assert_eq!(config.shuttle_min_turns, 3);
    }

    #[test]
    fn test_unparseable_value_is_an_error() {
        let err = ScoringConfig::from_lookup(lookup_from(&[(
            "FITSCORE_SPRINT_BAND_M",
            "wide",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("FITSCORE_SPRINT_BAND_M"));
    }

    #[test]
    fn test_non_positive_default_scale_is_rejected() {
        let err = ScoringConfig::from_lookup(lookup_from(&[(
            "FITSCORE_DEFAULT_PIXELS_PER_CM",
            "0",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("default_pixels_per_cm"));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"sprint_band_m": 2.0}"#).unwrap();
        assert_eq!(config.sprint_band_m, 2.0);
        assert_eq!(config.endurance_tolerance, 0.10);
    }

    #[test]
    fn test_overrides_keep_unset_fields() {
        let base = ScoringConfig {
            sprint_distance_m: 40.0,
            ..ScoringConfig::default()
        };
        let config = base
            .with_overrides(lookup_from(&[("FITSCORE_SPRINT_BAND_M", "2.5")]))
            .unwrap();
        assert_eq!(config.sprint_distance_m, 40.0);
        assert_eq!(config.sprint_band_m, 2.5);
    }

    #[test]
    fn test_tiny_sample_interval_is_rejected() {
        let config = ScoringConfig {
            situp_sample_interval_s: 1e-12,
            ..ScoringConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("situp_sample_interval_s"));
    }
}
