//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or running the encoder.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// No encoder binary at or inside the given path.
    #[error("Encoder not found at path: {path}")]
    NotFound { path: PathBuf },

    /// The encoder process could not be started.
    #[error("Failed to start encoder {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The encoder ran but exited unsuccessfully.
    #[error("Encoder exited with {}", describe_code(.code))]
    ProcessFailed {
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// The run was cancelled while the encoder was working.
    #[error("Encoding cancelled")]
    Cancelled,

    /// I/O error while waiting on the encoder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl EncoderError {
    /// Creates a process failure from an exit code and captured stderr.
    pub fn process_failed(code: Option<i32>, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        let stderr = stderr.trim();
        Self::ProcessFailed {
            code,
            stderr: if stderr.is_empty() {
                None
            } else {
                Some(stderr.to_string())
            },
        }
    }

    /// One-line description including the last stderr line, if any.
    pub fn summary(&self) -> String {
        match self {
            Self::ProcessFailed {
                stderr: Some(stderr),
                ..
            } => match stderr.lines().last() {
                Some(last) => format!("{}: {}", self, last),
                None => self.to_string(),
            },
            _ => self.to_string(),
        }
    }
}
