//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::encoder::{EncodeOutput, EncodeRequest, Encoder, EncoderError};

/// A recorded encode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    /// The request that was submitted.
    pub request: EncodeRequest,
    /// Position of the start event in the global event sequence.
    pub started_seq: u64,
    /// Position of the end event in the global event sequence.
    pub finished_seq: u64,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Encoder trait.
///
/// Provides controllable behavior for testing:
/// - Track encodes for assertions, with start/finish ordering
/// - Simulate per-file failures
/// - Control encode duration
/// - Observe the peak number of simultaneous encodes
///
/// # Example
///
/// ```rust,ignore
/// use alacify_core::testing::MockEncoder;
///
/// let encoder = MockEncoder::new();
/// encoder.set_encode_duration(Duration::from_millis(20)).await;
/// encoder.fail_input("/music/broken.flac", 1).await;
///
/// let scheduler = ConversionScheduler::new(encoder.clone(), settings);
/// scheduler.start(&files, CancellationToken::new()).await;
///
/// assert!(encoder.max_active() <= 4);
/// ```
#[derive(Debug, Clone)]
pub struct MockEncoder {
    /// Recorded encodes, in completion order.
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// Inputs that fail with the given exit code.
    failures: Arc<RwLock<HashMap<PathBuf, i32>>>,
    /// Simulated encode duration in milliseconds.
    encode_duration_ms: Arc<RwLock<u64>>,
    /// Whether to write a file at the output path.
    write_output: Arc<RwLock<bool>>,
    /// Encodes currently running.
    active: Arc<AtomicUsize>,
    /// Highest value `active` has reached.
    max_active: Arc<AtomicUsize>,
    /// Global start/finish event counter.
    sequence: Arc<AtomicU64>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self {
            encodes: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            encode_duration_ms: Arc::new(RwLock::new(10)),
            write_output: Arc::new(RwLock::new(true)),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get all recorded encodes.
    pub async fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Get the number of encodes performed.
    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Whether an encode was attempted for `input`.
    pub async fn was_encoded(&self, input: impl AsRef<Path>) -> bool {
        let input = input.as_ref();
        self.encodes
            .read()
            .await
            .iter()
            .any(|e| e.request.input_path == input)
    }

    /// Make encodes of `input` fail with `exit_code`.
    pub async fn fail_input(&self, input: impl AsRef<Path>, exit_code: i32) {
        self.failures
            .write()
            .await
            .insert(input.as_ref().to_path_buf(), exit_code);
    }

    /// Set the simulated encode duration.
    pub async fn set_encode_duration(&self, duration: Duration) {
        *self.encode_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Enable or disable writing the output file.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    /// Peak number of encodes that ran at the same time.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Number of encodes running right now.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    async fn record(&self, request: &EncodeRequest, started_seq: u64, success: bool) {
        let finished_seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.encodes.write().await.push(RecordedEncode {
            request: request.clone(),
            started_seq,
            finished_seq,
            success,
        });
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(
        &self,
        request: &EncodeRequest,
        cancel: &CancellationToken,
    ) -> Result<EncodeOutput, EncoderError> {
        let started_seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        let duration_ms = *self.encode_duration_ms.read().await;
        let cancelled = tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(duration_ms)) => false,
            _ = cancel.cancelled() => true,
        };

        self.active.fetch_sub(1, Ordering::SeqCst);

        if cancelled {
            self.record(request, started_seq, false).await;
            return Err(EncoderError::Cancelled);
        }

        let failure = self.failures.read().await.get(&request.input_path).copied();
        if let Some(code) = failure {
            self.record(request, started_seq, false).await;
            return Err(EncoderError::process_failed(
                Some(code),
                format!("{}: Invalid data found when processing input", request.input_path.display()),
            ));
        }

        if *self.write_output.read().await {
            let source = tokio::fs::read(&request.input_path).await.unwrap_or_default();
            tokio::fs::write(&request.output_path, source).await?;
        }

        self.record(request, started_seq, true).await;
        Ok(EncodeOutput {
            output_path: request.output_path.clone(),
            duration_ms,
        })
    }
}
