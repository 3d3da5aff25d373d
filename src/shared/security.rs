use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum manifest size (10 MB). Manifests are hand-written files; anything
/// larger is rejected before it is read into memory.
pub const MAX_MANIFEST_SIZE: u64 = 10 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` so the symlink itself is inspected, not its target.
///
/// # Arguments
/// * `path` - The path to validate
/// * `file_description` - Description of the file (e.g., "go.mod", "package.json")
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", file_description),
            hint: "Pass the path of the real manifest file instead of a link to it".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        return Err(SbomError::InvalidManifestPath {
            path: path.to_path_buf(),
            reason: "Not a regular file".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "File is too large ({} bytes). Maximum allowed size is {} bytes.",
                file_size, max_size
            ),
            hint: "Check that the path points at a manifest file".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Reads a text file after the regular-file and size checks pass
pub fn read_text_file(path: &Path, file_description: &str) -> Result<String> {
    validate_regular_file(path, file_description)?;

    let metadata = fs::metadata(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    validate_file_size(metadata.len(), path, MAX_MANIFEST_SIZE)?;

    fs::read_to_string(path).map_err(|e| {
        SbomError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}
