//! Source tree enumeration.
//!
//! Produces the ordered list of files a run works on: every regular file
//! below the source root whose extension is in the supported set.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::encoder::is_supported_extension;

/// Errors that can occur while scanning the source tree.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The source root does not exist or is not a directory.
    #[error("Source directory not found: {path}")]
    RootNotFound { path: PathBuf },
}

/// Collects supported audio files below `root`, sorted by path.
///
/// Entries under `exclude` are skipped, so a destination nested inside the
/// source is never fed back into the run. Unreadable entries are logged and
/// skipped.
pub fn scan_source(root: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| match exclude {
            Some(excluded) => !e.path().starts_with(excluded),
            None => true,
        })
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Error walking {:?}: {}", root, err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_supported_extension(path))
        .collect();

    files.sort();

    info!("Found {} supported files under {:?}", files.len(), root);
    debug!("Scanned files: {:?}", files);
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| is_supported_extension(&e.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let b = touch(root, "b/02.mp3");
        let a = touch(root, "a/01.FLAC");
        touch(root, "a/cover.jpg");
        touch(root, "a/video.mkv");
        touch(root, "notes");
        let top = touch(root, "single.ogg");

        let files = scan_source(root, None).unwrap();
        assert_eq!(files, vec![a, b, top]);
    }

    #[test]
    fn test_scan_skips_excluded_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let kept = touch(root, "album/01.wav");
        touch(root, "out/album/01.m4a");

        let files = scan_source(root, Some(&root.join("out"))).unwrap();
        assert_eq!(files, vec![kept]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(scan_source(dir.path(), None).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_root() {
        let result = scan_source(Path::new("/nonexistent/music"), None);
        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }
}
