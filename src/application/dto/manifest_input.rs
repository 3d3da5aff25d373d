use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manifest handed to a provider: a file on disk, or raw text that is
/// written to a private temporary directory before the tool runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestInput {
    Path(PathBuf),
    Content {
        manifest_name: String,
        content: String,
    },
}

impl ManifestInput {
    /// File name used for provider matching
    pub fn manifest_name(&self) -> Option<&str> {
        match self {
            ManifestInput::Path(path) => path.file_name().and_then(|n| n.to_str()),
            ManifestInput::Content { manifest_name, .. } => Some(manifest_name.as_str()),
        }
    }

    /// Directory holding a manifest on disk, where lock files are looked up.
    /// Content input has none.
    pub fn manifest_dir(&self) -> Option<&Path> {
        match self {
            ManifestInput::Path(path) => match path.parent() {
                Some(parent) if parent != Path::new("") => Some(parent),
                _ => Some(Path::new(".")),
            },
            ManifestInput::Content { .. } => None,
        }
    }

    /// Returns a path the ecosystem tool can work with.
    ///
    /// For content input the temporary directory lives as long as the
    /// returned value.
    pub fn materialize(&self) -> Result<MaterializedManifest> {
        match self {
            ManifestInput::Path(path) => Ok(MaterializedManifest {
                path: path.clone(),
                _temp_dir: None,
            }),
            ManifestInput::Content {
                manifest_name,
                content,
            } => {
                let plain_name = Path::new(manifest_name)
                    .file_name()
                    .is_some_and(|n| n == manifest_name.as_str());
                if !plain_name {
                    return Err(SbomError::InvalidManifestPath {
                        path: PathBuf::from(manifest_name),
                        reason: "Manifest name must be a bare file name".to_string(),
                    }
                    .into());
                }

                let temp_dir = tempfile::Builder::new()
                    .prefix("exhort_")
                    .tempdir()
                    .map_err(|e| SbomError::FileWriteError {
                        path: std::env::temp_dir(),
                        details: e.to_string(),
                    })?;
                let path = temp_dir.path().join(manifest_name);
                fs::write(&path, content).map_err(|e| SbomError::FileWriteError {
                    path: path.clone(),
                    details: e.to_string(),
                })?;
                tracing::debug!(path = %path.display(), "materialized manifest content");

                Ok(MaterializedManifest {
                    path,
                    _temp_dir: Some(temp_dir),
                })
            }
        }
    }
}

/// A manifest on disk, possibly backed by a temporary directory
#[derive(Debug)]
pub struct MaterializedManifest {
    path: PathBuf,
    _temp_dir: Option<TempDir>,
}

impl MaterializedManifest {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the ecosystem tool runs in
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        }
    }
}
