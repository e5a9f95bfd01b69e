#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Write `content` to `path`, creating missing parent directories.
pub fn write_with_parents(path: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to create directory {}: {}", parent.display(), e),
            )
        })?;
    }

    fs::write(path, content).map_err(|e| {
        AppError::new(
            ErrorCategory::IoError,
            format!("Failed to write {}: {}", path.display(), e),
        )
        .with_code("WFD-PUBLISH-002")
    })
}

/// Name of the backup copy for `file_stem` taken at `at`.
pub fn backup_name(file_stem: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.yaml", file_stem, at.format(BACKUP_TIMESTAMP_FORMAT))
}

/// Copy `path` into `backup_dir` as `<stem>_<timestamp>.yaml`.
///
/// Returns `Ok(None)` when there is nothing to back up.
pub fn backup_file(path: &Path, backup_dir: &Path) -> Result<Option<PathBuf>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Invalid file name: {}", path.display()),
            )
        })?;

    fs::create_dir_all(backup_dir).map_err(|e| {
        AppError::new(
            ErrorCategory::IoError,
            format!(
                "Failed to create backup directory {}: {}",
                backup_dir.display(),
                e
            ),
        )
    })?;

    let target = backup_dir.join(backup_name(stem, Local::now()));
    fs::copy(path, &target).map_err(|e| {
        AppError::new(
            ErrorCategory::IoError,
            format!("Failed to back up {}: {}", path.display(), e),
        )
        .with_code("WFD-PUBLISH-003")
    })?;

    Ok(Some(target))
}
