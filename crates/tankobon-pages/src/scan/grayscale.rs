// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-place grayscale conversion of a scan library.

use std::path::Path;

use tankobon_core::error::Result;
use tracing::{debug, info, instrument};

use crate::raster::{Raster, codec};

use super::walk::scans_recursive;

/// Counts from one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrayscaleSummary {
    /// Multi-channel scans rewritten as gray.
    pub converted: usize,
    /// Scans that already had a single channel.
    pub already_gray: usize,
    /// Scans whose name contains the cover marker.
    pub covers_skipped: usize,
}

/// Rewrite every multi-channel scan below `root` as a one-channel image at
/// the same path and in the same format.
///
/// The gray value of a pixel is the truncated mean of its channels, so colour
/// scans are converted too. Files whose name contains `cover_marker` are left
/// alone.
#[instrument(skip_all, fields(root = %root.as_ref().display(), cover_marker = %cover_marker))]
pub fn convert_library_to_grayscale(
    root: impl AsRef<Path>,
    cover_marker: &str,
) -> Result<GrayscaleSummary> {
    let files = scans_recursive(root.as_ref())?;
    let total = files.len();
    let mut summary = GrayscaleSummary::default();

    for (index, path) in files.iter().enumerate() {
        let is_cover = !cover_marker.is_empty()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(cover_marker));
        if is_cover {
            summary.covers_skipped += 1;
            continue;
        }

        let raster = codec::load(path)?;
        if matches!(raster, Raster::Gray(_)) {
            summary.already_gray += 1;
            continue;
        }

        info!(
            path = %path.display(),
            "Conversion of scan ({}/{total})",
            index + 1
        );
        let gray = raster.channel_mean();
        codec::remove_existing(path)?;
        codec::save_gray(&gray, path)?;
        summary.converted += 1;
    }

    debug!(?summary, "Grayscale conversion finished");
    Ok(summary)
}
