//! Encoder binary resolution.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::EncoderError;

/// File names probed when the candidate path is a directory, native first.
#[cfg(windows)]
pub const ENCODER_FILE_NAMES: [&str; 2] = ["ffmpeg.exe", "ffmpeg"];
#[cfg(not(windows))]
pub const ENCODER_FILE_NAMES: [&str; 2] = ["ffmpeg", "ffmpeg.exe"];

/// Resolves a candidate path to an encoder binary.
///
/// - a directory resolves to the first of [`ENCODER_FILE_NAMES`] it contains;
/// - an existing file resolves to itself;
/// - a bare command name (`ffmpeg`) is looked up on `PATH`.
///
/// Returns `None` when nothing matches.
pub fn resolve_encoder(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_dir() {
        let found = ENCODER_FILE_NAMES
            .iter()
            .map(|name| candidate.join(name))
            .find(|path| path.is_file());
        debug!("Probed directory {:?} for encoder: {:?}", candidate, found);
        return found;
    }

    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }

    if is_bare_command(candidate) {
        return which::which(candidate).ok();
    }

    None
}

/// Like [`resolve_encoder`], but reports a missing encoder as an error.
pub fn locate_encoder(candidate: &Path) -> Result<PathBuf, EncoderError> {
    resolve_encoder(candidate).ok_or_else(|| EncoderError::NotFound {
        path: candidate.to_path_buf(),
    })
}

fn is_bare_command(candidate: &Path) -> bool {
    let mut components = candidate.components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}
