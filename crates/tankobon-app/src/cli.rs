// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tankobon_core::error::{Result, TankobonError};
use tankobon_core::{AppConfig, OverwritePolicy, ReadingDirection, VolumeJob};
use tankobon_pages::{LibraryJob, PageSplitter, clean_library, convert_library_to_grayscale};

/// Split, convert and clean manga scan volumes.
#[derive(Debug, Parser)]
#[command(name = "tankobon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON config file; command-line flags take precedence.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split the double pages of one volume into numbered single pages.
    Split {
        /// Directory holding the scans of the volume.
        input: PathBuf,

        /// Volume number used in the page file names.
        #[arg(short, long)]
        volume: u32,

        /// Directory the pages are written to.
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Split a range of volumes stored as <INPUT_ROOT>/T<n>.
    Batch {
        input_root: PathBuf,

        /// Pages of volume n go to <OUTPUT>/T<nn>.
        #[arg(short, long)]
        output: PathBuf,

        /// Volume range, e.g. `1-42` or `7`.
        #[arg(long, value_parser = parse_volume_range)]
        volumes: VolumeRange,

        /// Keep going with the next volume when one fails.
        #[arg(long)]
        keep_going: bool,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Rewrite every colour scan below ROOT as grayscale, in place.
    Grayscale {
        root: PathBuf,

        /// Skip files whose name contains this marker (cover scans).
        #[arg(long)]
        cover_marker: Option<String>,
    },

    /// Level-correct the grayscale scans of every volume directory of ROOT.
    Clean {
        root: PathBuf,

        /// Only directories whose name contains this are processed.
        #[arg(long)]
        prefix: Option<String>,

        /// Output directory name, created inside ROOT.
        #[arg(long)]
        processed_dir: Option<String>,
    },
}

/// Flags shared by `split` and `batch`.
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Number the right half of a spread first (Japanese reading order).
    #[arg(long)]
    pub right_to_left: bool,

    /// Keep existing page files instead of replacing them.
    #[arg(long)]
    pub no_overwrite: bool,

    /// Page width / scan height used to crop spreads.
    #[arg(long)]
    pub crop_ratio: Option<f64>,

    /// Write a JSON report of the run to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl SplitArgs {
    fn apply(&self, config: &mut AppConfig) {
        if self.right_to_left {
            config.reading_direction = ReadingDirection::RightToLeft;
        }
        if self.no_overwrite {
            config.overwrite = OverwritePolicy::SkipExisting;
        }
        if let Some(ratio) = self.crop_ratio {
            config.crop_ratio = ratio;
        }
    }
}

/// Inclusive range of volume numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeRange {
    pub first: u32,
    pub last: u32,
}

fn parse_volume_range(raw: &str) -> std::result::Result<VolumeRange, String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| format!("'{s}' is not a volume number"))
    };
    let (first, last) = match raw.split_once('-') {
        Some((a, b)) => (parse(a)?, parse(b)?),
        None => {
            let n = parse(raw)?;
            (n, n)
        }
    };
    if first > last {
        return Err(format!("empty volume range {first}-{last}"));
    }
    Ok(VolumeRange { first, last })
}

/// Run the CLI. Returns `false` when a batch finished with failed volumes.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Split {
            input,
            volume,
            output,
            split,
        } => {
            split.apply(&mut config);
            config.validate()?;
            split_command(&input, volume, &output, &config, split.report.as_deref())
        }
        Commands::Batch {
            input_root,
            output,
            volumes,
            keep_going,
            split,
        } => {
            split.apply(&mut config);
            if keep_going {
                config.continue_on_error = true;
            }
            config.validate()?;
            batch_command(input_root, output, volumes, config, split.report.as_deref())
        }
        Commands::Grayscale { root, cover_marker } => {
            let marker = cover_marker.unwrap_or(config.cover_marker);
            let summary = convert_library_to_grayscale(&root, &marker)?;
            println!(
                "Converted {} scans ({} already gray, {} covers skipped)",
                summary.converted, summary.already_gray, summary.covers_skipped
            );
            Ok(true)
        }
        Commands::Clean {
            root,
            prefix,
            processed_dir,
        } => {
            if let Some(prefix) = prefix {
                config.clean.volume_prefix = prefix;
            }
            if let Some(dir) = processed_dir {
                config.clean.processed_dir = dir;
            }
            config.validate()?;
            let summary = clean_library(&root, &config.clean)?;
            println!(
                "Cleaned {} scans, copied {} colour scans",
                summary.cleaned, summary.copied
            );
            Ok(true)
        }
    }
}

fn split_command(
    input: &Path,
    volume: u32,
    output: &Path,
    config: &AppConfig,
    report_path: Option<&Path>,
) -> Result<bool> {
    let job = VolumeJob::from_dir(
        input,
        volume,
        output,
        config.reading_direction,
        config.overwrite,
    )?;
    let report = PageSplitter::with_crop_ratio(config.crop_ratio).process_volume(&job)?;

    println!(
        "Volume {:02}: {} pages from {} scans ({} spreads split, {} existing pages kept)",
        report.volume,
        report.pages.len(),
        report.inputs_processed,
        report.spreads_split,
        report.pages_skipped()
    );
    if let Some(path) = report_path {
        write_report(&report, path)?;
    }
    Ok(true)
}

fn batch_command(
    input_root: PathBuf,
    output: PathBuf,
    volumes: VolumeRange,
    config: AppConfig,
    report_path: Option<&Path>,
) -> Result<bool> {
    let library = LibraryJob::new(input_root, output, config);
    let report = library.run(volumes.first..=volumes.last);

    for failed in report.failed() {
        if let tankobon_core::VolumeOutcome::Failed { volume, message } = failed {
            eprintln!("Volume {volume:02} failed: {message}");
        }
    }
    println!(
        "{} volumes processed, {} failed, {} pages",
        report.volumes.len(),
        report.failed().count(),
        report.total_pages()
    );
    if let Some(path) = report_path {
        write_report(&report, path)?;
    }
    Ok(report.failed().count() == 0)
}

fn write_report(report: &impl Serialize, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|err| TankobonError::OutputWriteFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn volume_range_parsing() {
        assert_eq!(
            parse_volume_range("1-42").unwrap(),
            VolumeRange { first: 1, last: 42 }
        );
        assert_eq!(
            parse_volume_range("7").unwrap(),
            VolumeRange { first: 7, last: 7 }
        );
        assert!(parse_volume_range("9-3").is_err());
        assert!(parse_volume_range("a-b").is_err());
    }

    #[test]
    fn split_flags_override_config() {
        let cli = Cli::try_parse_from([
            "tankobon",
            "split",
            "scans/T3",
            "--volume",
            "3",
            "--output",
            "out",
            "--right-to-left",
            "--no-overwrite",
            "--crop-ratio",
            "0.7",
        ])
        .unwrap();

        let Commands::Split { split, volume, .. } = cli.command else {
            panic!("expected split command");
        };
        assert_eq!(volume, 3);

        let mut config = AppConfig::default();
        split.apply(&mut config);
        assert_eq!(config.reading_direction, ReadingDirection::RightToLeft);
        assert_eq!(config.overwrite, OverwritePolicy::SkipExisting);
        assert_eq!(config.crop_ratio, 0.7);
    }

    #[test]
    fn report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&tankobon_core::BatchReport::default(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"volumes\""));
    }
}
