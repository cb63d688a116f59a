// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::{Path, PathBuf};

use tankobon_core::error::{Result, TankobonError};
use tankobon_core::has_scan_extension;

/// Every scan below `root`, at any depth, sorted by path.
pub(crate) fn scans_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect(root, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|err| TankobonError::UnreadableInput {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    })?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect(&path, found)?;
        } else if has_scan_extension(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// Sub-directories of `root` whose name contains `marker`, sorted by name.
pub(crate) fn subdirs_containing(root: &Path, marker: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|err| TankobonError::UnreadableInput {
        path: root.to_path_buf(),
        reason: err.to_string(),
    })?;
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(marker));
        if path.is_dir() && matches {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
