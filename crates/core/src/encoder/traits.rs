//! Trait definitions for the encoder module.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::EncoderError;
use super::types::{EncodeOutput, EncodeRequest};

/// Something that can turn one audio file into Apple Lossless.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Encodes `request.input_path` into `request.output_path`.
    ///
    /// Implementations must stop promptly once `cancel` fires, releasing any
    /// external process, and report [`EncoderError::Cancelled`].
    async fn encode(
        &self,
        request: &EncodeRequest,
        cancel: &CancellationToken,
    ) -> Result<EncodeOutput, EncoderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct CopyEncoder;

    #[async_trait]
    impl Encoder for CopyEncoder {
        fn name(&self) -> &str {
            "copy"
        }

        async fn encode(
            &self,
            request: &EncodeRequest,
            cancel: &CancellationToken,
        ) -> Result<EncodeOutput, EncoderError> {
            if cancel.is_cancelled() {
                return Err(EncoderError::Cancelled);
            }
            tokio::fs::copy(&request.input_path, &request.output_path).await?;
            Ok(EncodeOutput {
                output_path: request.output_path.clone(),
                duration_ms: 0,
            })
        }
    }

    fn request(dir: &std::path::Path) -> EncodeRequest {
        EncodeRequest {
            input_path: dir.join("in.flac"),
            output_path: dir.join("out.m4a"),
        }
    }

    #[tokio::test]
    async fn test_trait_object_encode() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("in.flac"), b"audio").unwrap();

        let encoder: Box<dyn Encoder> = Box::new(CopyEncoder);
        let output = encoder
            .encode(&request(dir.path()), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(encoder.name(), "copy");
        assert_eq!(output.output_path, dir.path().join("out.m4a"));
        assert_eq!(std::fs::read(dir.path().join("out.m4a")).unwrap(), b"audio");
    }

    #[tokio::test]
    async fn test_cancelled_token_is_honored() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = CopyEncoder
            .encode(&request(&PathBuf::from("/nonexistent")), &cancel)
            .await;
        assert!(matches!(result, Err(EncoderError::Cancelled)));
    }
}
