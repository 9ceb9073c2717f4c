//! Request and result types for a single encode.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One file to encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeRequest {
    /// Existing source file.
    pub input_path: PathBuf,
    /// Destination file. Its parent directory must already exist.
    pub output_path: PathBuf,
}

/// Result of a successful encode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeOutput {
    /// Where the encoded file was written.
    pub output_path: PathBuf,
    /// Wall time spent in the encoder.
    pub duration_ms: u64,
}
