// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spread cropping and per-scan page planning.

use tankobon_core::{PageSide, ReadingDirection};
use tracing::debug;

use crate::raster::Raster;

use super::classify::is_double_page;

/// An output page cut from one scan, not yet numbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    pub side: PageSide,
    pub raster: Raster,
}

/// Width of each half of a spread of the given height.
///
/// The width depends on the height only; the two halves may overlap or leave
/// a gap in the middle of the scan.
pub fn crop_width(height: u32, ratio: f64) -> u32 {
    (height as f64 * ratio).round() as u32
}

/// Cut a spread into its left and right pages, in reading order.
///
/// Left page = columns `[0, w)`, right page = columns `[W - w, W)` where
/// `w = crop_width(H)`.
pub fn split_spread(raster: &Raster, ratio: f64, direction: ReadingDirection) -> [PlannedPage; 2] {
    let width = raster.width();
    let page_width = crop_width(raster.height(), ratio).min(width);

    let left = PlannedPage {
        side: PageSide::Left,
        raster: raster.crop_columns(0, page_width),
    };
    let right = PlannedPage {
        side: PageSide::Right,
        raster: raster.crop_columns(width - page_width, page_width),
    };
    debug!(width, page_width, ?direction, "Spread split");

    match direction {
        ReadingDirection::LeftToRight => [left, right],
        ReadingDirection::RightToLeft => [right, left],
    }
}

/// Decide which pages one scan produces.
///
/// Gray-lossless scans are reduced to one channel whether or not they are
/// split. Spreads yield two pages in reading order; everything else yields
/// the scan itself.
pub fn plan_pages(
    raster: Raster,
    is_cover: bool,
    direction: ReadingDirection,
    ratio: f64,
) -> Vec<PlannedPage> {
    let double_page = is_double_page(&raster, is_cover);
    let raster = raster.into_gray_if_lossless();

    if double_page {
        split_spread(&raster, ratio, direction).into()
    } else {
        vec![PlannedPage {
            side: PageSide::Whole,
            raster,
        }]
    }
}
