//! Writing export artifacts to disk

use crate::domain::{DeskError, Result};
use std::path::{Path, PathBuf};

/// Write `bytes` as `dir/file_name`, replacing any existing file
///
/// The document is written to a temporary sibling first and renamed into
/// place, so a failed export never leaves a truncated file behind.
///
/// # Errors
///
/// Returns [`DeskError::Validation`] for an empty or path-like file name and
/// [`DeskError::Io`] if the directory or file cannot be written.
pub async fn write_document(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let file_name = sanitize_file_name(file_name)?;

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        DeskError::Io(format!(
            "Failed to create output directory {}: {e}",
            dir.display()
        ))
    })?;

    let path = dir.join(file_name);
    let tmp_path = dir.join(format!(".{file_name}.partial"));

    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| DeskError::Io(format!("Failed to write {}: {e}", tmp_path.display())))?;

    if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(DeskError::Io(format!(
            "Failed to move document into place at {}: {e}",
            path.display()
        )));
    }

    crate::log_export_complete!("document", path.display(), bytes.len());
    Ok(path)
}

fn sanitize_file_name(file_name: &str) -> Result<&str> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(DeskError::Validation(format!(
            "'{file_name}' is not a usable file name"
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(DeskError::Validation(format!(
            "file name '{file_name}' must not contain a path separator"
        )));
    }
    Ok(trimmed)
}
