// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-volume runs over a library laid out as `<input root>/T<n>/`.

use std::path::{Path, PathBuf};

use tankobon_core::{AppConfig, BatchReport, VolumeJob, VolumeOutcome};
use tracing::{error, info, instrument};

use super::volume::PageSplitter;

/// Splits a range of volumes of one library.
///
/// Volume `n` is read from `<input_root>/T<n>` and written to
/// `<output_root>/T<nn>`.
#[derive(Debug, Clone)]
pub struct LibraryJob {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub config: AppConfig,
}

impl LibraryJob {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        config: AppConfig,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            config,
        }
    }

    pub fn volume_input_dir(&self, volume: u32) -> PathBuf {
        self.input_root.join(format!("T{volume}"))
    }

    pub fn volume_output_dir(&self, volume: u32) -> PathBuf {
        self.output_root.join(format!("T{volume:02}"))
    }

    /// Process `volumes` in order.
    ///
    /// A failed volume is recorded in the report. The run then continues with
    /// the next volume if `continue_on_error` is set, and stops otherwise.
    #[instrument(skip_all, fields(input_root = %self.input_root.display()))]
    pub fn run(&self, volumes: impl IntoIterator<Item = u32>) -> BatchReport {
        let splitter = PageSplitter::with_crop_ratio(self.config.crop_ratio);
        let mut report = BatchReport::default();

        for volume in volumes {
            info!(volume, "Processing volume {volume:02}");
            match self.run_volume(&splitter, volume) {
                Ok(volume_report) => report.volumes.push(VolumeOutcome::Completed {
                    report: volume_report,
                }),
                Err(err) => {
                    error!(volume, error = %err, "Volume failed");
                    report.volumes.push(VolumeOutcome::Failed {
                        volume,
                        message: err.to_string(),
                    });
                    if !self.config.continue_on_error {
                        break;
                    }
                }
            }
        }

        info!(
            volumes = report.volumes.len(),
            failed = report.failed().count(),
            pages = report.total_pages(),
            "Batch finished"
        );
        report
    }

    fn run_volume(
        &self,
        splitter: &PageSplitter,
        volume: u32,
    ) -> tankobon_core::Result<tankobon_core::VolumeReport> {
        let job = self.volume_job(&self.volume_input_dir(volume), volume)?;
        splitter.process_volume(&job)
    }

    fn volume_job(&self, input_dir: &Path, volume: u32) -> tankobon_core::Result<VolumeJob> {
        VolumeJob::from_dir(
            input_dir,
            volume,
            self.volume_output_dir(volume),
            self.config.reading_direction,
            self.config.overwrite,
        )
        .map_err(|err| err.in_volume(volume, 1))
    }
}
