//! Non-recursive listing of the media folders under the library root.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A media folder directly under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFolder {
    /// Full path to the folder
    pub path: PathBuf,
    /// Folder name as read from the filesystem
    pub name: String,
}

/// List the immediate subdirectories of `root` in filesystem listing order.
///
/// Plain files are ignored. Names that are not valid UTF-8 cannot be matched
/// against the catalog and are skipped with a warning.
pub fn scan_media_folders(root: &Path) -> std::io::Result<Vec<MediaFolder>> {
    let mut folders = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_dir() {
            debug!("Ignoring non-directory entry: {:?}", path);
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => folders.push(MediaFolder { path, name }),
            Err(raw) => warn!("Skipping folder with non UTF-8 name: {:?}", raw),
        }
    }

    debug!("Found {} folder(s) under {:?}", folders.len(), root);
    Ok(folders)
}
