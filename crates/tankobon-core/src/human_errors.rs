// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing error messages.
//
// Every technical error is mapped to a plain sentence with a suggestion. Volume
// failures additionally say which pages are already on disk, so a run can be
// resumed by hand.

use crate::error::TankobonError;
use crate::types::page_file_name;

/// How the operator should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk full or file locked; running again may simply work.
    Transient,
    /// The operator must fix something (path, permissions, config).
    ActionRequired,
    /// The input itself is bad and must be replaced or removed.
    Permanent,
}

/// A readable error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What to try next.
    pub suggestion: String,
    /// Whether re-running unchanged may succeed.
    pub retriable: bool,
    pub severity: Severity,
    /// Set for volume failures: where to pick the run back up.
    pub resume_hint: Option<String>,
}

/// Convert a `TankobonError` into a `HumanError`.
pub fn humanize_error(err: &TankobonError) -> HumanError {
    match err {
        TankobonError::Volume {
            volume,
            page,
            source,
        } => {
            let mut human = humanize_error(source);
            human.message = format!("Volume {volume:02}: {}", human.message);
            human.resume_hint = Some(resume_hint(*volume, *page));
            human
        }

        TankobonError::UnreadableInput { path, reason } => HumanError {
            message: format!("Could not read scan {}.", path.display()),
            suggestion: format!(
                "Check the file exists and opens in an image viewer; re-export it as JPEG or PNG if it is damaged. ({reason})"
            ),
            retriable: false,
            severity: Severity::Permanent,
            resume_hint: None,
        },

        TankobonError::UnexpectedRasterShape { path, detail } => HumanError {
            message: format!("Scan {} has an unsupported pixel layout.", path.display()),
            suggestion: format!("Convert it to an 8-bit grayscale or RGB image. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
            resume_hint: None,
        },

        TankobonError::OutputWriteFailure { path, reason } => HumanError {
            message: format!("Could not write {}.", path.display()),
            suggestion: format!(
                "Check the output directory is writable and the disk has free space. ({reason})"
            ),
            retriable: true,
            severity: Severity::Transient,
            resume_hint: None,
        },

        TankobonError::Config(detail) => HumanError {
            message: "The configuration is invalid.".into(),
            suggestion: format!("Fix the setting and run again: {detail}"),
            retriable: false,
            severity: Severity::ActionRequired,
            resume_hint: None,
        },

        TankobonError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file or directory could not be found.".into(),
                suggestion: "Check the paths given on the command line.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
                resume_hint: None,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied.".into(),
                suggestion: "Check the permissions of the input and output directories.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
                resume_hint: None,
            },
            _ => HumanError {
                message: "A file operation failed.".into(),
                suggestion: format!("Run again; if it persists, check the disk. ({io_err})"),
                retriable: true,
                severity: Severity::Transient,
                resume_hint: None,
            },
        },

        TankobonError::Serialization(detail) => HumanError {
            message: "A JSON file could not be read or written.".into(),
            suggestion: format!("Check the config or report file is valid JSON. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
            resume_hint: None,
        },
    }
}

fn resume_hint(volume: u32, page: u32) -> String {
    if page <= 1 {
        format!("No pages of volume {volume:02} were written; re-run the whole volume.")
    } else {
        format!(
            "Pages up to {} are on disk; {} was not finished. Fix the scan and re-run the volume, or resume from the failing file.",
            page_file_name(volume, page - 1),
            page_file_name(volume, page),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unreadable_input_is_permanent() {
        let err = TankobonError::UnreadableInput {
            path: PathBuf::from("T1/p05.jpg"),
            reason: "unexpected EOF".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
        assert!(human.message.contains("p05.jpg"));
    }

    #[test]
    fn write_failure_is_transient() {
        let err = TankobonError::OutputWriteFailure {
            path: PathBuf::from("out/T01_page_001.png"),
            reason: "No space left on device".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn volume_failure_carries_resume_hint() {
        let err = TankobonError::UnreadableInput {
            path: PathBuf::from("T3/p09.jpg"),
            reason: "corrupt".into(),
        }
        .in_volume(3, 12);
        let human = humanize_error(&err);

        assert!(human.message.starts_with("Volume 03:"));
        assert_eq!(human.severity, Severity::Permanent);
        let hint = human.resume_hint.unwrap();
        assert!(hint.contains("T03_page_011.png"), "{hint}");
        assert!(hint.contains("T03_page_012.png"), "{hint}");
    }

    #[test]
    fn failure_on_first_page_asks_for_full_rerun() {
        let err = TankobonError::Config("x".into()).in_volume(1, 1);
        let hint = humanize_error(&err).resume_hint.unwrap();
        assert!(hint.contains("re-run the whole volume"));
    }

    #[test]
    fn config_error_is_action_required() {
        let human = humanize_error(&TankobonError::Config("crop_ratio".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
