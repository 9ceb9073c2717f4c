//! The scheduler driving one conversion run.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::RunSettings;
use crate::encoder::{EncodeRequest, Encoder, EncoderError};

use super::chunk::{chunk_count, chunk_size, plan_chunks};
use super::paths::destination_for;
use super::types::{ChunkReport, FileOutcome, FileStatus, RunReport};

/// Converts a fixed list of files, at most `concurrency` at a time.
pub struct ConversionScheduler<E: Encoder> {
    encoder: Arc<E>,
    settings: Arc<RunSettings>,
}

impl<E: Encoder + 'static> ConversionScheduler<E> {
    /// Creates a scheduler for one run.
    pub fn new(encoder: E, settings: RunSettings) -> Self {
        Self {
            encoder: Arc::new(encoder),
            settings: Arc::new(settings),
        }
    }

    /// Converts `files` chunk by chunk.
    ///
    /// Each file is skipped, converted, or recorded as failed; none of those
    /// stop the run. When `cancel` fires, in-flight encodes are stopped and
    /// files of later chunks are recorded as cancelled.
    pub async fn start(&self, files: &[PathBuf], cancel: CancellationToken) -> RunReport {
        let run_start = Instant::now();
        let concurrency = self.settings.concurrency;

        info!(
            "Splitting job into {} chunks of {} size",
            chunk_count(concurrency, files.len()),
            chunk_size(concurrency, files.len())
        );

        let mut report = RunReport {
            outcomes: Vec::with_capacity(files.len()),
            ..Default::default()
        };
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for (index, chunk) in plan_chunks(files, concurrency).enumerate() {
            if cancel.is_cancelled() {
                let remaining = &files[report.outcomes.len()..];
                warn!(
                    "Run cancelled before chunk #{}, {} files left unconverted",
                    index,
                    remaining.len()
                );
                report.outcomes.extend(
                    remaining
                        .iter()
                        .map(|input| FileOutcome::new(input, None, FileStatus::Cancelled)),
                );
                break;
            }

            info!(
                "Processing chunk #{}. {} files to convert",
                index,
                chunk.len()
            );

            let chunk_start = Instant::now();
            let outcomes = self.run_chunk(chunk, &mut claimed, &cancel).await;
            let elapsed = chunk_start.elapsed();

            report
                .outcomes
                .extend(outcomes.into_iter().map(|o| o.in_chunk(index)));
            report.chunks.push(ChunkReport {
                index,
                files: chunk.len(),
                elapsed,
            });
            report.total_elapsed += elapsed;

            info!("Completed chunk {} in {} ms.", index, elapsed.as_millis());
        }

        report.cancelled = report.cancelled_files() > 0;
        report.wall_clock = run_start.elapsed();

        info!(
            "Every chunk has been completed in {} ms: {} converted, {} skipped, {} failed, {} cancelled",
            report.total_elapsed.as_millis(),
            report.converted(),
            report.skipped(),
            report.failed(),
            report.cancelled_files()
        );

        report
    }

    /// Launches every file of the chunk, then waits for all of them.
    async fn run_chunk(
        &self,
        chunk: &[PathBuf],
        claimed: &mut HashMap<PathBuf, PathBuf>,
        cancel: &CancellationToken,
    ) -> Vec<FileOutcome> {
        let mut outcomes: Vec<Option<FileOutcome>> = vec![None; chunk.len()];
        let mut pending = Vec::with_capacity(chunk.len());

        for (slot, input) in chunk.iter().enumerate() {
            let destination = match destination_for(
                &self.settings.source_root,
                &self.settings.destination_root,
                input,
                &self.settings.format,
            ) {
                Ok(destination) => destination,
                Err(e) => {
                    error!("Cannot derive a destination for {:?}: {}", input, e);
                    outcomes[slot] = Some(FileOutcome::new(
                        input,
                        None,
                        FileStatus::Failed {
                            reason: e.to_string(),
                        },
                    ));
                    continue;
                }
            };

            // A vanished input must not hold a destination another input maps to
            if !source_present(input).await {
                outcomes[slot] = Some(missing_source(input, destination));
                continue;
            }

            if let Some(first) = claimed.get(&destination) {
                warn!(
                    "{:?} maps to {:?}, already claimed by {:?}. Ignoring it",
                    input, destination, first
                );
                outcomes[slot] = Some(FileOutcome::new(
                    input,
                    Some(destination),
                    FileStatus::SkippedDuplicate {
                        first: first.clone(),
                    },
                ));
                continue;
            }
            claimed.insert(destination.clone(), input.clone());

            let encoder = Arc::clone(&self.encoder);
            let settings = Arc::clone(&self.settings);
            let cancel = cancel.clone();
            let input = input.clone();
            let handle = tokio::spawn(async move {
                convert_file(encoder.as_ref(), &settings, &input, destination, &cancel).await
            });
            pending.push((slot, handle));
        }

        let (slots, handles): (Vec<usize>, Vec<_>) = pending.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        for (slot, result) in slots.into_iter().zip(results) {
            outcomes[slot] = Some(match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Conversion task for {:?} aborted: {}", chunk[slot], e);
                    FileOutcome::new(
                        &chunk[slot],
                        None,
                        FileStatus::Failed {
                            reason: format!("conversion task aborted: {}", e),
                        },
                    )
                }
            });
        }

        outcomes.into_iter().flatten().collect()
    }
}

/// Converts one file: re-checks the source, honours an existing
/// destination, creates parent directories and runs the encoder.
async fn convert_file<E: Encoder + ?Sized>(
    encoder: &E,
    settings: &RunSettings,
    input: &Path,
    destination: PathBuf,
    cancel: &CancellationToken,
) -> FileOutcome {
    let failed = |destination: PathBuf, reason: String| {
        FileOutcome::new(input, Some(destination), FileStatus::Failed { reason })
    };

    match tokio::fs::metadata(input).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return failed(destination, "source is not a regular file".to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => return missing_source(input, destination),
        Err(e) => return failed(destination, format!("cannot read source: {}", e)),
    }

    match tokio::fs::try_exists(&destination).await {
        Ok(true) => {
            warn!(
                "The file at path {:?} already exists. Ignoring {:?}",
                destination, input
            );
            return FileOutcome::new(input, Some(destination), FileStatus::SkippedExisting);
        }
        Ok(false) => {}
        Err(e) => return failed(destination, format!("cannot check destination: {}", e)),
    }

    if cancel.is_cancelled() {
        return FileOutcome::new(input, Some(destination), FileStatus::Cancelled);
    }

    if let Some(parent) = destination.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!("Failed to create output directory {:?}: {}", parent, e);
            return failed(
                destination,
                format!("failed to create output directory: {}", e),
            );
        }
    }

    info!(
        "Converting {} to format {}",
        display_name(input),
        settings.format
    );

    let request = EncodeRequest {
        input_path: input.to_path_buf(),
        output_path: destination.clone(),
    };

    let started = Instant::now();
    match encoder.encode(&request, cancel).await {
        Ok(_) => {
            info!("Converting {} succeeded!", display_name(&destination));
            FileOutcome::new(
                input,
                Some(destination),
                FileStatus::Converted {
                    duration_ms: millis(started.elapsed()),
                },
            )
        }
        Err(EncoderError::Cancelled) => {
            warn!("Conversion of {} cancelled", display_name(input));
            FileOutcome::new(input, Some(destination), FileStatus::Cancelled)
        }
        Err(e) => {
            let reason = e.summary();
            error!("Converting {} failed: {}", display_name(input), reason);
            failed(destination, reason)
        }
    }
}

/// False only when the input is known to be gone; other errors are left to
/// the per-file check.
async fn source_present(input: &Path) -> bool {
    !matches!(tokio::fs::try_exists(input).await, Ok(false))
}

fn missing_source(input: &Path, destination: PathBuf) -> FileOutcome {
    error!(
        "The file at path {:?} doesn't exist anymore. Ignoring it",
        input
    );
    FileOutcome::new(input, Some(destination), FileStatus::SkippedMissingSource)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
