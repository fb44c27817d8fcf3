//! Discovery of input files.

use crate::item::FileItem;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Enumerates the items at a location.
///
/// Discovery never fails the run: an unusable location is logged and
/// yields no items.
pub trait FileProvider: Send + Sync {
    fn list_items(&self, location: &str) -> Vec<FileItem>;
}

/// Walks a local directory tree.
///
/// Every regular file below the root becomes one item, whatever its
/// extension. Symlinked directories are not followed. Items come back sorted
/// by path so runs are reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileProvider;

impl FileProvider for LocalFileProvider {
    fn list_items(&self, location: &str) -> Vec<FileItem> {
        let root = match fs::canonicalize(location) {
            Ok(root) if root.is_dir() => root,
            Ok(root) => {
                error!("Input location is not a directory: {}", root.display());
                return Vec::new();
            }
            Err(e) => {
                error!("Input location {} is not accessible: {}", location, e);
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        walk(&root, &mut files);
        files.sort();

        let items: Vec<FileItem> = files
            .iter()
            .filter_map(|path| FileItem::from_path(&root, path))
            .collect();
        debug!("Discovered {} files under {}", items.len(), root.display());
        items
    }
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            walk(&path, files);
        } else if path.is_file() {
            files.push(path);
        }
    }
}
