// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Double-page splitting — spread detection, fixed-ratio cropping, ordered
// page write-out for one volume, and multi-volume batches.

pub mod batch;
pub mod classify;
pub mod spread;
pub mod volume;

pub use batch::LibraryJob;
pub use classify::is_double_page;
pub use spread::{PlannedPage, crop_width, plan_pages, split_spread};
pub use volume::PageSplitter;
