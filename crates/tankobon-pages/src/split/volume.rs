// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Volume processing — walk the scans of one volume in order, split spreads,
// and write contiguously numbered PNG pages.

use std::path::Path;

use chrono::Utc;
use tankobon_core::config::CROP_RATIO;
use tankobon_core::error::{Result, TankobonError};
use tankobon_core::{OverwritePolicy, PageOutcome, PageRecord, PageStatus, VolumeJob, VolumeReport};
use tracing::{debug, info, instrument, warn};

use crate::integrity::hash_bytes;
use crate::raster::codec;

use super::spread::{PlannedPage, plan_pages};

/// Splits the scans of a volume into single pages.
///
/// ```ignore
/// let job = VolumeJob::from_dir("Dragon Ball/T3", 3, "out/T03", direction, overwrite)?;
/// let report = PageSplitter::new().process_volume(&job)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PageSplitter {
    crop_ratio: f64,
}

impl Default for PageSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSplitter {
    pub fn new() -> Self {
        Self {
            crop_ratio: CROP_RATIO,
        }
    }

    /// Use a different page width / scan height ratio.
    pub fn with_crop_ratio(crop_ratio: f64) -> Self {
        Self { crop_ratio }
    }

    pub fn crop_ratio(&self) -> f64 {
        self.crop_ratio
    }

    /// Process a whole volume.
    ///
    /// The output directory is created once up front. The first input is the
    /// cover. Any failure aborts the volume; the error carries the volume
    /// number and the page counter at the time of failure, and pages already
    /// written stay on disk.
    #[instrument(skip_all, fields(volume = job.volume, inputs = job.inputs.len()))]
    pub fn process_volume(&self, job: &VolumeJob) -> Result<VolumeReport> {
        let started_at = Utc::now();
        info!(output_dir = %job.output_dir.display(), "Processing volume");

        std::fs::create_dir_all(&job.output_dir).map_err(|err| {
            TankobonError::OutputWriteFailure {
                path: job.output_dir.clone(),
                reason: format!("cannot create output directory: {err}"),
            }
            .in_volume(job.volume, PageRecord::new().next_page())
        })?;

        let mut record = PageRecord::new();
        let mut pages = Vec::new();
        let mut spreads_split = 0;

        for (index, input) in job.inputs.iter().enumerate() {
            let is_cover = index == 0;
            let (outcomes, next) = self.process_file(job, input, record, is_cover)?;
            if outcomes.len() > 1 {
                spreads_split += 1;
            }
            pages.extend(outcomes);
            record = next;
        }

        let report = VolumeReport {
            volume: job.volume,
            output_dir: job.output_dir.clone(),
            inputs_processed: job.inputs.len(),
            spreads_split,
            pages,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            pages = record.emitted(),
            spreads = spreads_split,
            skipped = report.pages_skipped(),
            elapsed_ms = report.elapsed().num_milliseconds(),
            "Finished writing pages"
        );
        Ok(report)
    }

    /// Process one scan, numbering its pages from `record`.
    ///
    /// Returns the emitted pages and the record to use for the next scan.
    #[instrument(skip(self, job, input, record), fields(path = %input.display(), page = record.next_page()))]
    pub fn process_file(
        &self,
        job: &VolumeJob,
        input: &Path,
        record: PageRecord,
        is_cover: bool,
    ) -> Result<(Vec<PageOutcome>, PageRecord)> {
        let raster =
            codec::load(input).map_err(|err| err.in_volume(job.volume, record.next_page()))?;
        let planned = plan_pages(raster, is_cover, job.direction, self.crop_ratio);

        let mut record = record;
        let mut outcomes = Vec::with_capacity(planned.len());
        for page in &planned {
            let number = record.next_page();
            let outcome = write_page(job, input, number, page)
                .map_err(|err| err.in_volume(job.volume, number))?;
            outcomes.push(outcome);
            record = record.advanced();
        }
        Ok((outcomes, record))
    }
}

fn write_page(
    job: &VolumeJob,
    source: &Path,
    number: u32,
    page: &PlannedPage,
) -> Result<PageOutcome> {
    let path = job.page_path(number);
    let bytes = codec::encode_png(&page.raster, &path)?;

    let status = if path.is_file() {
        match job.overwrite {
            OverwritePolicy::Replace => {
                codec::remove_existing(&path)?;
                codec::write_bytes(&bytes, &path)?;
                PageStatus::Written
            }
            OverwritePolicy::SkipExisting => {
                warn!(path = %path.display(), "Output page exists; keeping it");
                PageStatus::Skipped
            }
        }
    } else {
        codec::write_bytes(&bytes, &path)?;
        PageStatus::Written
    };
    debug!(page = number, side = ?page.side, ?status, "Page emitted");

    Ok(PageOutcome {
        page: number,
        path,
        source: source.to_path_buf(),
        side: page.side,
        status,
        sha256: hash_bytes(&bytes),
    })
}
