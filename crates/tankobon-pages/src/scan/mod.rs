// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Library-wide scan cleanup — in-place grayscale conversion and automatic
// level correction of grayscale scans.

pub mod clean;
pub mod grayscale;

mod walk;

pub use clean::{LevelCleaner, clean_library};
pub use grayscale::convert_library_to_grayscale;
