//! Encoder module for transcoding audio files to Apple Lossless.
//!
//! This module provides the `Encoder` trait and an FFmpeg-backed
//! implementation, along with the capability checks the rest of the crate
//! uses before a run starts.
//!
//! # Example
//!
//! ```ignore
//! use alacify_core::encoder::{locate_encoder, EncodeRequest, Encoder, FfmpegEncoder};
//! use tokio_util::sync::CancellationToken;
//!
//! let binary = locate_encoder(Path::new("/opt/ffmpeg/bin"))?;
//! let encoder = FfmpegEncoder::new(binary);
//!
//! let request = EncodeRequest {
//!     input_path: PathBuf::from("/music/album/01.flac"),
//!     output_path: PathBuf::from("/alac/album/01.m4a"),
//! };
//!
//! let output = encoder.encode(&request, &CancellationToken::new()).await?;
//! println!("Encoded in {} ms", output.duration_ms);
//! ```

mod error;
mod ffmpeg;
mod formats;
mod locate;
mod traits;
mod types;

pub use error::EncoderError;
pub use ffmpeg::FfmpegEncoder;
pub use formats::{is_supported_extension, SUPPORTED_EXTENSIONS};
pub use locate::{locate_encoder, resolve_encoder, ENCODER_FILE_NAMES};
pub use traits::Encoder;
pub use types::{EncodeOutput, EncodeRequest};
