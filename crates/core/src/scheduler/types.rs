//! Per-file outcomes and run reports.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// The encoder produced the destination file.
    Converted { duration_ms: u64 },
    /// The input vanished between enumeration and dispatch.
    SkippedMissingSource,
    /// The destination already existed and was left untouched.
    SkippedExisting,
    /// Another input of this run already maps to the same destination.
    SkippedDuplicate { first: PathBuf },
    /// The file could not be converted.
    Failed { reason: String },
    /// The run was cancelled before or during this file.
    Cancelled,
}

impl FileStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::SkippedMissingSource | Self::SkippedExisting | Self::SkippedDuplicate { .. }
        )
    }
}

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Derived destination, when derivation succeeded.
    pub destination: Option<PathBuf>,
    /// Chunk the file was dispatched in; `None` if the run stopped first.
    pub chunk: Option<usize>,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn new(input: &Path, destination: Option<PathBuf>, status: FileStatus) -> Self {
        Self {
            input: input.to_path_buf(),
            destination,
            chunk: None,
            status,
        }
    }

    pub(crate) fn in_chunk(mut self, chunk: usize) -> Self {
        self.chunk = Some(chunk);
        self
    }
}

/// Timing of one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkReport {
    pub index: usize,
    pub files: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

/// Everything a run did, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<FileOutcome>,
    pub chunks: Vec<ChunkReport>,
    /// Sum of the chunk durations.
    #[serde(rename = "total_elapsed_ms", serialize_with = "as_millis")]
    pub total_elapsed: Duration,
    /// Time from the start of the run to its end.
    #[serde(rename = "wall_clock_ms", serialize_with = "as_millis")]
    pub wall_clock: Duration,
    /// Whether cancellation left any file unconverted.
    pub cancelled: bool,
}

impl RunReport {
    pub fn converted(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Converted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(FileStatus::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn cancelled_files(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Cancelled))
    }

    /// No failures and no cancellation.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed() == 0
    }

    /// Outcome for a given input, if it was part of the run.
    pub fn outcome_for(&self, input: &Path) -> Option<&FileOutcome> {
        self.outcomes.iter().find(|o| o.input == input)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn count(&self, predicate: impl Fn(&FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}
