//! FFmpeg-based encoder implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::EncoderError;
use super::traits::Encoder;
use super::types::{EncodeOutput, EncodeRequest};
use crate::config::EncoderConfig;

/// Codec selector passed to `-acodec`.
const ALAC_CODEC: &str = "alac";

/// FFmpeg-based encoder implementation.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: PathBuf,
    log_level: String,
    extra_args: Vec<String>,
}

impl FfmpegEncoder {
    /// Creates an encoder for an already resolved binary with default settings.
    pub fn new(binary: PathBuf) -> Self {
        Self::from_config(binary, &EncoderConfig::default())
    }

    /// Creates an encoder for an already resolved binary.
    ///
    /// `config.path` is ignored; resolve it with
    /// [`locate_encoder`](super::locate_encoder) first.
    pub fn from_config(binary: PathBuf, config: &EncoderConfig) -> Self {
        Self {
            binary,
            log_level: config.log_level.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// The binary this encoder runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Builds ffmpeg arguments for an ALAC encode.
    fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            self.log_level.clone().into(),
            "-i".into(),
            input_path.into(),
            "-acodec".into(),
            ALAC_CODEC.into(),
        ];

        args.extend(self.extra_args.iter().map(OsString::from));

        args.push(output_path.into());
        args
    }
}

/// Best-effort removal of a partially written output file.
async fn discard_partial_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial output {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial output {:?}: {}", path, e),
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn encode(
        &self,
        request: &EncodeRequest,
        cancel: &CancellationToken,
    ) -> Result<EncodeOutput, EncoderError> {
        let start = Instant::now();
        let args = self.build_args(&request.input_path, &request.output_path);
        debug!("Running {:?} {:?}", self.binary, args);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EncoderError::Spawn {
                path: self.binary.clone(),
                source,
            })?;

        let stderr = child.stderr.take();
        let collect_stderr = async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf).await;
            }
            String::from_utf8_lossy(&buf).into_owned()
        };

        let finished = tokio::select! {
            result = futures::future::join(child.wait(), collect_stderr) => Some(result),
            _ = cancel.cancelled() => None,
        };

        let (status, error_output) = match finished {
            Some((status, error_output)) => (status?, error_output),
            None => {
                debug!("Cancelling encode of {:?}", request.input_path);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill encoder for {:?}: {}", request.input_path, e);
                }
                discard_partial_output(&request.output_path).await;
                return Err(EncoderError::Cancelled);
            }
        };

        if !status.success() {
            discard_partial_output(&request.output_path).await;
            return Err(EncoderError::process_failed(status.code(), error_output));
        }

        Ok(EncodeOutput {
            output_path: request.output_path.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
