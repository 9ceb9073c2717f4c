//! Batch conversion of an audio library to Apple Lossless.
//!
//! The library mirrors a source tree into a destination tree, running one
//! encoder process per file with a bounded number of encodes in flight.

pub mod config;
pub mod encoder;
pub mod scanner;
pub mod scheduler;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConversionConfig,
    EncoderConfig, RunSettings, TargetFormat,
};
pub use encoder::{
    is_supported_extension, locate_encoder, resolve_encoder, EncodeOutput, EncodeRequest,
    Encoder, EncoderError, FfmpegEncoder, SUPPORTED_EXTENSIONS,
};
pub use scanner::{scan_source, ScanError};
pub use scheduler::{
    destination_for, plan_chunks, ChunkReport, ConversionScheduler, FileOutcome, FileStatus,
    PathError, RunReport,
};

pub use tokio_util::sync::CancellationToken;
