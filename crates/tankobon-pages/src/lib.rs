// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tankobon-pages — Page processing for manga scan volumes.
//
// Provides the raster model and codec boundary, double-page detection and
// splitting with ordered page write-out (single volume or whole library),
// in-place grayscale conversion, and automatic level cleanup.

pub mod integrity;
pub mod raster;
pub mod scan;
pub mod split;

// Re-export the primary entry points so callers can use `tankobon_pages::PageSplitter` etc.
pub use raster::Raster;
pub use scan::{LevelCleaner, clean_library, convert_library_to_grayscale};
pub use split::{LibraryJob, PageSplitter};
