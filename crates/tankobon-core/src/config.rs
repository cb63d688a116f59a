// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TankobonError};
use crate::types::{OverwritePolicy, ReadingDirection};

/// Width of one page of a spread as a fraction of the scan height.
///
/// Page ratio of the JapFlap scanlation releases. Older releases used
/// 0.6857142857142857.
pub const CROP_RATIO: f64 = 0.68518518518;

/// Persistent settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Numbering order of the two halves of a spread.
    pub reading_direction: ReadingDirection,
    /// Behaviour when an output page already exists.
    pub overwrite: OverwritePolicy,
    /// Page width / scan height used to crop spreads.
    pub crop_ratio: f64,
    /// Keep processing later volumes of a batch after one fails.
    pub continue_on_error: bool,
    /// File-name marker of cover scans, skipped by grayscale conversion.
    pub cover_marker: String,
    pub clean: CleanConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reading_direction: ReadingDirection::LeftToRight,
            overwrite: OverwritePolicy::Replace,
            crop_ratio: CROP_RATIO,
            continue_on_error: false,
            cover_marker: "-000".into(),
            clean: CleanConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.crop_ratio > 0.0 && self.crop_ratio <= 1.0) {
            return Err(TankobonError::Config(format!(
                "crop_ratio must be in (0, 1], got {}",
                self.crop_ratio
            )));
        }
        self.clean.validate()
    }
}

/// Settings of the level cleanup pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Only sub-directories whose name contains this are cleaned.
    pub volume_prefix: String,
    /// Output directory, created next to the volume directories.
    pub processed_dir: String,
    /// Fraction of pixels clipped at each end of the histogram by the
    /// automatic stretch.
    pub stretch_cutoff: f64,
    pub levels: LevelsAdjustment,
    pub jpeg_quality: u8,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            volume_prefix: "Tome".into(),
            processed_dir: "processed".into(),
            stretch_cutoff: 0.006,
            levels: LevelsAdjustment::default(),
            jpeg_quality: 85,
        }
    }
}

impl CleanConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.stretch_cutoff) {
            return Err(TankobonError::Config(format!(
                "clean.stretch_cutoff must be in [0, 0.5), got {}",
                self.stretch_cutoff
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(TankobonError::Config(format!(
                "clean.jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        self.levels.validate()
    }
}

/// Manual levels: `[low_input, high_input]` is mapped onto
/// `[low_output, high_output]` through a gamma curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsAdjustment {
    pub low_input: u8,
    pub high_input: u8,
    pub gamma: f64,
    pub low_output: u8,
    pub high_output: u8,
}

impl Default for LevelsAdjustment {
    fn default() -> Self {
        Self {
            low_input: 20,
            high_input: 220,
            gamma: 1.0,
            low_output: 0,
            high_output: 255,
        }
    }
}

impl LevelsAdjustment {
    fn validate(&self) -> Result<()> {
        if self.low_input >= self.high_input {
            return Err(TankobonError::Config(format!(
                "levels low_input ({}) must be below high_input ({})",
                self.low_input, self.high_input
            )));
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(TankobonError::Config(format!(
                "levels gamma must be positive, got {}",
                self.gamma
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crop_ratio, CROP_RATIO);
        assert_eq!(config.clean.levels.low_input, 20);
        assert_eq!(config.clean.levels.high_input, 220);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tankobon.json");
        std::fs::write(
            &path,
            r#"{ "reading_direction": "right_to_left", "clean": { "jpeg_quality": 90 } }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.reading_direction, ReadingDirection::RightToLeft);
        assert_eq!(config.overwrite, OverwritePolicy::Replace);
        assert_eq!(config.clean.jpeg_quality, 90);
        assert_eq!(config.clean.volume_prefix, "Tome");
    }

    #[test]
    fn rejects_out_of_range_crop_ratio() {
        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            let config = AppConfig {
                crop_ratio: ratio,
                ..AppConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(TankobonError::Config(_))),
                "ratio {ratio} accepted"
            );
        }
    }

    #[test]
    fn rejects_inverted_levels() {
        let mut config = AppConfig::default();
        config.clean.levels.low_input = 200;
        config.clean.levels.high_input = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(TankobonError::Serialization(_))
        ));
    }
}
