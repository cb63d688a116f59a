// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Tankobon volume processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TankobonError};

/// File extensions accepted as scan input (compared case-insensitively).
pub const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Order in which the two halves of a spread are numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingDirection {
    /// Western order: left half first.
    #[default]
    LeftToRight,
    /// Japanese order: right half first.
    RightToLeft,
}

impl ReadingDirection {
    pub fn from_right_to_left(right_to_left: bool) -> Self {
        if right_to_left {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }

    pub fn is_right_to_left(self) -> bool {
        matches!(self, Self::RightToLeft)
    }
}

/// What to do when an output page already exists on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Delete the existing file, then write the new page.
    #[default]
    Replace,
    /// Leave the existing file untouched; the page number is still consumed.
    SkipExisting,
}

impl OverwritePolicy {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            Self::Replace
        } else {
            Self::SkipExisting
        }
    }
}

/// File name of output page `page` of volume `volume`, e.g. `T03_page_005.png`.
pub fn page_file_name(volume: u32, page: u32) -> String {
    format!("T{volume:02}_page_{page:03}.png")
}

/// One volume worth of scans to split, fixed before processing starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeJob {
    /// Input scans in reading order. The first entry is the cover.
    pub inputs: Vec<PathBuf>,
    pub volume: u32,
    pub output_dir: PathBuf,
    pub direction: ReadingDirection,
    pub overwrite: OverwritePolicy,
}

impl VolumeJob {
    pub fn new(
        inputs: Vec<PathBuf>,
        volume: u32,
        output_dir: impl Into<PathBuf>,
        direction: ReadingDirection,
        overwrite: OverwritePolicy,
    ) -> Self {
        Self {
            inputs,
            volume,
            output_dir: output_dir.into(),
            direction,
            overwrite,
        }
    }

    /// Build a job from every scan in `input_dir`, sorted lexically by file
    /// name.
    pub fn from_dir(
        input_dir: impl AsRef<Path>,
        volume: u32,
        output_dir: impl Into<PathBuf>,
        direction: ReadingDirection,
        overwrite: OverwritePolicy,
    ) -> Result<Self> {
        let inputs = list_scans(input_dir.as_ref())?;
        Ok(Self::new(inputs, volume, output_dir, direction, overwrite))
    }

    /// Destination of output page `page`.
    pub fn page_path(&self, page: u32) -> PathBuf {
        self.output_dir.join(page_file_name(self.volume, page))
    }
}

/// List the scans directly inside `dir`, sorted by file name.
pub fn list_scans(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|err| TankobonError::UnreadableInput {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    })?;

    let mut scans = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && has_scan_extension(&path) {
            scans.push(path);
        }
    }
    scans.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(scans)
}

/// Whether `path` ends in one of [`INPUT_EXTENSIONS`].
pub fn has_scan_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Next output page number of a volume. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    next: u32,
}

impl PageRecord {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// The number the next emitted page will get.
    pub fn next_page(self) -> u32 {
        self.next
    }

    /// Record after one more page has been emitted.
    pub fn advanced(self) -> Self {
        Self {
            next: self.next + 1,
        }
    }

    /// Pages emitted so far.
    pub fn emitted(self) -> u32 {
        self.next - 1
    }
}

impl Default for PageRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Which part of a scan an output page was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSide {
    /// The scan was emitted unsplit.
    Whole,
    Left,
    Right,
}

/// Whether a page hit the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Written,
    /// An existing file was kept under [`OverwritePolicy::SkipExisting`].
    Skipped,
}

/// One emitted output page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOutcome {
    pub page: u32,
    pub path: PathBuf,
    pub source: PathBuf,
    pub side: PageSide,
    pub status: PageStatus,
    /// SHA-256 of the encoded PNG, lowercase hex.
    pub sha256: String,
}

/// Summary of a completed volume job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeReport {
    pub volume: u32,
    pub output_dir: PathBuf,
    pub inputs_processed: usize,
    pub spreads_split: usize,
    pub pages: Vec<PageOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl VolumeReport {
    pub fn pages_written(&self) -> usize {
        self.count_with_status(PageStatus::Written)
    }

    pub fn pages_skipped(&self) -> usize {
        self.count_with_status(PageStatus::Skipped)
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    fn count_with_status(&self, status: PageStatus) -> usize {
        self.pages.iter().filter(|p| p.status == status).count()
    }
}

/// Result of one volume inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VolumeOutcome {
    Completed { report: VolumeReport },
    Failed { volume: u32, message: String },
}

impl VolumeOutcome {
    pub fn volume(&self) -> u32 {
        match self {
            Self::Completed { report } => report.volume,
            Self::Failed { volume, .. } => *volume,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Results of a multi-volume run, in the order volumes were attempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub volumes: Vec<VolumeOutcome>,
}

impl BatchReport {
    pub fn failed(&self) -> impl Iterator<Item = &VolumeOutcome> {
        self.volumes.iter().filter(|v| v.is_failed())
    }

    pub fn total_pages(&self) -> usize {
        self.volumes
            .iter()
            .map(|v| match v {
                VolumeOutcome::Completed { report } => report.pages.len(),
                VolumeOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}
