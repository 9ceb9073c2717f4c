//! Common test utilities for scheduler and encoder integration tests.
//!
//! Provides a temporary source library with a sibling destination tree and,
//! on unix, shell scripts standing in for the ffmpeg binary.

#![allow(dead_code)]

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use alacify_core::{RunSettings, TargetFormat};

/// A temporary source library with an empty destination next to it.
pub struct AudioLibrary {
    root: TempDir,
}

impl AudioLibrary {
    /// Create an empty library in a fresh temporary directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(root.path().join("source")).expect("Failed to create source dir");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root.path().join("source")
    }

    pub fn destination(&self) -> PathBuf {
        self.root.path().join("destination")
    }

    /// Create a source file with its relative path as content.
    pub fn add_file(&self, relative: &str) -> PathBuf {
        let path = self.source().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create source subdir");
        }
        std::fs::write(&path, relative.as_bytes()).expect("Failed to create source file");
        path
    }

    /// Create several source files, returned in the given order.
    pub fn add_files(&self, relative: &[&str]) -> Vec<PathBuf> {
        relative.iter().map(|r| self.add_file(r)).collect()
    }

    /// Create a file in the destination tree.
    pub fn add_destination_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.destination_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create destination subdir");
        }
        std::fs::write(&path, content).expect("Failed to create destination file");
        path
    }

    /// Absolute path of a destination entry.
    pub fn destination_path(&self, relative: &str) -> PathBuf {
        self.destination().join(relative)
    }

    /// Run settings pointing at this library.
    pub fn settings(&self, format: &str, concurrency: usize) -> RunSettings {
        RunSettings::new(
            TargetFormat::new(format).expect("invalid target format"),
            self.source(),
            self.destination(),
            NonZeroUsize::new(concurrency).expect("concurrency must be positive"),
        )
    }

    /// Write an executable shell script into the library root.
    ///
    /// The script receives ffmpeg's argument list: the input is `$5` and
    /// the output the last argument.
    #[cfg(unix)]
    pub fn fake_encoder(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to make script executable");
        path
    }
}

/// Script body copying the input to the output, like a successful encode.
#[cfg(unix)]
pub const COPYING_ENCODER: &str = r#"for last; do :; done
cp "$5" "$last""#;
