// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Automatic level cleanup for grayscale scans: a histogram stretch followed by
// a fixed levels pass, so paper comes out white and ink black.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use imageproc::map::map_colors;
use imageproc::stats::histogram;
use tankobon_core::config::{CleanConfig, LevelsAdjustment};
use tankobon_core::error::{Result, TankobonError};
use tankobon_core::list_scans;
use tracing::{debug, info, instrument};

use crate::raster::codec;

use super::walk::subdirs_containing;

/// Level correction pipeline on one gray scan.
///
/// Each step consumes `self` and returns the adjusted image, so calls chain:
///
/// ```ignore
/// let cleaned = LevelCleaner::from_gray(gray)
///     .stretch_levels(0.006)
///     .apply_levels(&LevelsAdjustment::default())
///     .into_gray();
/// ```
pub struct LevelCleaner {
    image: GrayImage,
}

impl LevelCleaner {
    pub fn from_gray(image: GrayImage) -> Self {
        Self { image }
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_gray(self) -> GrayImage {
        self.image
    }

    /// Stretch the used tone range to the full `0..=255`.
    ///
    /// `cutoff` is the fraction of pixels ignored at each end of the histogram
    /// when picking the range. A scan with a single tone is left unchanged.
    #[instrument(skip(self), fields(cutoff))]
    pub fn stretch_levels(self, cutoff: f64) -> Self {
        let counts = histogram(&self.image).channels[0];
        let total = self.image.width() as u64 * self.image.height() as u64;

        let Some((low, high)) = stretch_bounds(&counts, total, cutoff) else {
            debug!("Single tone scan; stretch skipped");
            return self;
        };
        debug!(low, high, "Stretching levels");

        let span = (high - low) as f64;
        let mut lut = [0u8; 256];
        for (value, slot) in lut.iter_mut().enumerate() {
            *slot = if value <= low as usize {
                0
            } else if value >= high as usize {
                255
            } else {
                ((value as f64 - low as f64) * 255.0 / span).round() as u8
            };
        }
        self.apply_lut(&lut)
    }

    /// Map `[low_input, high_input]` onto `[low_output, high_output]` through
    /// the gamma curve; inputs outside the range are clipped.
    #[instrument(skip(self))]
    pub fn apply_levels(self, levels: &LevelsAdjustment) -> Self {
        let lut = levels_lut(levels);
        self.apply_lut(&lut)
    }

    /// Stretch, then apply the configured levels.
    pub fn auto_clean(self, config: &CleanConfig) -> Self {
        self.stretch_levels(config.stretch_cutoff)
            .apply_levels(&config.levels)
    }

    fn apply_lut(self, lut: &[u8; 256]) -> Self {
        let image = map_colors(&self.image, |Luma([v])| Luma([lut[v as usize]]));
        Self { image }
    }
}

/// Darkest and lightest tones after clipping `cutoff` of the pixels at each
/// end. `None` when the remaining range is empty.
fn stretch_bounds(counts: &[u32; 256], total: u64, cutoff: f64) -> Option<(u8, u8)> {
    if total == 0 {
        return None;
    }
    let clip = (total as f64 * cutoff).floor() as u64;

    let mut seen = 0u64;
    let low = counts.iter().position(|&c| {
        seen += c as u64;
        seen > clip
    })?;

    seen = 0;
    let high = 255 - counts.iter().rev().position(|&c| {
        seen += c as u64;
        seen > clip
    })?;

    (low < high).then_some((low as u8, high as u8))
}

fn levels_lut(levels: &LevelsAdjustment) -> [u8; 256] {
    let low_in = levels.low_input as f64;
    let high_in = levels.high_input as f64;
    let low_out = levels.low_output as f64;
    let high_out = levels.high_output as f64;
    let inv_gamma = 1.0 / levels.gamma;

    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        let normalised = ((value as f64 - low_in) / (high_in - low_in)).clamp(0.0, 1.0);
        let out = low_out + normalised.powf(inv_gamma) * (high_out - low_out);
        *slot = out.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Counts from one cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// Grayscale scans level-corrected and re-encoded.
    pub cleaned: usize,
    /// Colour scans copied unchanged.
    pub copied: usize,
}

/// Clean every volume directory of `root`.
///
/// Volume directories are the sub-directories whose name contains
/// `config.volume_prefix`. Their JPEG scans are written to
/// `<root>/<processed_dir>/<volume dir>/`: grayscale scans are level-corrected
/// and saved as JPEG, colour scans are copied byte for byte.
#[instrument(skip_all, fields(root = %root.as_ref().display()))]
pub fn clean_library(root: impl AsRef<Path>, config: &CleanConfig) -> Result<CleanSummary> {
    let root = root.as_ref();
    let started = std::time::Instant::now();
    let processed_root = root.join(&config.processed_dir);
    let mut summary = CleanSummary::default();

    let volumes: Vec<PathBuf> = subdirs_containing(root, &config.volume_prefix)?
        .into_iter()
        .filter(|dir| *dir != processed_root)
        .collect();
    info!(volumes = volumes.len(), "Cleaning library");

    for volume_dir in &volumes {
        let Some(volume_name) = volume_dir.file_name() else {
            continue;
        };
        let out_dir = processed_root.join(volume_name);
        std::fs::create_dir_all(&out_dir).map_err(|err| TankobonError::OutputWriteFailure {
            path: out_dir.clone(),
            reason: format!("cannot create output directory: {err}"),
        })?;

        for scan in list_scans(volume_dir)?.iter().filter(|p| is_jpeg(p)) {
            if clean_scan(scan, &out_dir, config)? {
                summary.cleaned += 1;
            } else {
                summary.copied += 1;
            }
        }
    }

    info!(
        cleaned = summary.cleaned,
        copied = summary.copied,
        elapsed_s = started.elapsed().as_secs_f64(),
        "Finished cleaning"
    );
    Ok(summary)
}

/// Clean or copy one scan. Returns `true` when it was cleaned.
fn clean_scan(scan: &Path, out_dir: &Path, config: &CleanConfig) -> Result<bool> {
    let raster = codec::load(scan)?;

    if !raster.is_grayscale_lossless() {
        let Some(name) = scan.file_name() else {
            return Ok(false);
        };
        let out = out_dir.join(name);
        std::fs::copy(scan, &out).map_err(|err| TankobonError::OutputWriteFailure {
            path: out.clone(),
            reason: err.to_string(),
        })?;
        debug!(path = %scan.display(), "Colour scan copied");
        return Ok(false);
    }

    let stem = scan
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out = out_dir.join(format!("{stem}.jpg"));

    let cleaned = LevelCleaner::from_gray(raster.channel_mean())
        .auto_clean(config)
        .into_gray();
    let bytes = codec::encode_jpeg(&cleaned, config.jpeg_quality, &out)?;
    codec::write_bytes(&bytes, &out)?;
    info!(path = %out.display(), "Scan cleaned");
    Ok(true)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}
