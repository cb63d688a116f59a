// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — the decoded scan model and its JPEG/PNG codec boundary.

pub mod codec;
pub mod model;

pub use model::{Raster, ShapeError};
