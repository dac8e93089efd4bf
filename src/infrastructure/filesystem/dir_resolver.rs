//! Resolution of root and single directory lists into candidate repository
//! paths.
//!
//! Roots are expanded to their immediate subdirectories; singles are taken
//! as-is. Single entries that are empty or start with `#` are treated as
//! comments/disabled entries and dropped (root-derived entries are not
//! filtered this way). A leading `~` expands to the invoking user's home
//! directory in every path. The merged list is returned sorted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::FleetError;
use crate::common::result::FleetResult;

/// Expand a leading `~` to the user's home directory. Paths without a
/// leading tilde, and `~` when no home directory is known, pass through
/// unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Read a newline-delimited path list file. Lines are returned raw; comment
/// filtering happens during resolution so the file format stays a plain
/// list.
pub fn read_path_list(file: &Path) -> FleetResult<Vec<String>> {
    let contents = fs::read_to_string(file).map_err(|e| {
        FleetError::filesystem_error_with_source(
            format!("Failed to read path list {}", file.display()),
            Some(file.to_path_buf()),
            e,
        )
    })?;
    Ok(contents.lines().map(|l| l.trim_end().to_string()).collect())
}

/// Resolve roots and singles into a sorted list of candidate repository
/// paths.
///
/// A root that does not exist or is not a directory is skipped with a
/// warning rather than failing the run; stale entries in a long-lived root
/// list should not block a batch.
pub fn resolve_repository_paths(roots: &[String], singles: &[String]) -> FleetResult<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = singles
        .iter()
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(|s| expand_tilde(s))
        .collect();

    for root in roots {
        let root = expand_tilde(root);
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "skipping unreadable root");
                continue;
            }
        };

        for entry in entries {
            let entry = entry.map_err(|e| {
                FleetError::filesystem_error_with_source(
                    format!("Failed to list {}", root.display()),
                    Some(root.clone()),
                    e,
                )
            })?;
            if entry.path().is_dir() {
                paths.push(entry.path());
            }
        }
    }

    paths.sort();
    Ok(paths)
}
