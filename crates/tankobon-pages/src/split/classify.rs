// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spread detection.

use crate::raster::Raster;

/// Whether a scan is a double page that should be split.
///
/// The cover is never split. Colour spreads are kept whole: in colour they
/// are usually a single illustration rather than two pages.
pub fn is_double_page(raster: &Raster, is_cover: bool) -> bool {
    !is_cover && raster.width() > raster.height() && raster.is_grayscale_lossless()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    fn gray(width: u32, height: u32) -> Raster {
        Raster::Gray(GrayImage::new(width, height))
    }

    #[test]
    fn wide_gray_scan_is_a_spread() {
        assert!(is_double_page(&gray(1292, 1061), false));
    }

    #[test]
    fn cover_is_never_a_spread() {
        assert!(!is_double_page(&gray(1292, 1061), true));
        assert!(!is_double_page(&gray(650, 1063), true));
    }

    #[test]
    fn square_and_portrait_scans_are_single() {
        assert!(!is_double_page(&gray(650, 1063), false));
        assert!(!is_double_page(&gray(800, 800), false));
    }

    #[test]
    fn colour_spread_is_kept_whole() {
        let mut data = vec![128u8; 10 * 4 * 3];
        data[5] = 0;
        let colour = Raster::from_raw(10, 4, 3, data).unwrap();
        assert!(!is_double_page(&colour, false));
    }

    #[test]
    fn gray_rgb_spread_is_split() {
        let rgb = Raster::from_raw(10, 4, 3, vec![77u8; 10 * 4 * 3]).unwrap();
        assert!(is_double_page(&rgb, false));
    }
}
