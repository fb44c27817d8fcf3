//! The file descriptor handed from a provider to the pipeline.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// One discovered input file.
///
/// Immutable once created: providers build it, the pipeline reads it, and it
/// is dropped when the item has been processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileItem {
    source: String,
    name: String,
    extension: String,
    local_path: PathBuf,
    relative_dir: PathBuf,
}

impl FileItem {
    /// Create a descriptor. The extension is stored lower-cased and without
    /// a leading dot.
    pub fn new(
        source: impl Into<String>,
        name: impl Into<String>,
        extension: &str,
        local_path: impl Into<PathBuf>,
        relative_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
            local_path: local_path.into(),
            relative_dir: relative_dir.into(),
        }
    }

    /// Derive a descriptor for `path`, a file somewhere below `root`.
    ///
    /// Returns `None` when `path` is not below `root` or has no file name.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative_dir = path.parent()?.strip_prefix(root).ok()?.to_path_buf();
        Some(Self::new(
            path.display().to_string(),
            name,
            &extension,
            path,
            relative_dir,
        ))
    }

    /// Identifier of the original source (a path for local files).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File name without its extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased extension without the dot; empty when the file has none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path where the bytes can be read locally.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Directory relative to the discovery root, mirrored in the output tree.
    pub fn relative_dir(&self) -> &Path {
        &self.relative_dir
    }
}
