//! Destination path derivation.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::TargetFormat;

/// Why an input could not be mapped to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{input} is not inside the source directory {root}")]
    OutsideSourceRoot { input: PathBuf, root: PathBuf },

    #[error("{input} has no file name below the source directory")]
    NoFileName { input: PathBuf },
}

/// Mirrors `input` from `source_root` into `destination_root` and swaps its
/// extension for `format`.
///
/// Only the final extension changes: `/a/b/mp3mp3.mp3` becomes
/// `/x/y/mp3mp3.flac`. A file without an extension gains one.
pub fn destination_for(
    source_root: &Path,
    destination_root: &Path,
    input: &Path,
    format: &TargetFormat,
) -> Result<PathBuf, PathError> {
    let relative = input
        .strip_prefix(source_root)
        .map_err(|_| PathError::OutsideSourceRoot {
            input: input.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;

    if relative.file_name().is_none() {
        return Err(PathError::NoFileName {
            input: input.to_path_buf(),
        });
    }

    Ok(destination_root
        .join(relative)
        .with_extension(format.extension()))
}
