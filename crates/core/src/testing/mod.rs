//! Testing utilities and mock implementations.
//!
//! This module provides a mock implementation of the [`Encoder`] trait,
//! allowing the scheduler to be exercised without an ffmpeg binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use alacify_core::testing::MockEncoder;
//!
//! let encoder = MockEncoder::new();
//! encoder.set_encode_duration(Duration::from_millis(5)).await;
//!
//! let scheduler = ConversionScheduler::new(encoder.clone(), settings);
//! let report = scheduler.start(&files, CancellationToken::new()).await;
//! assert_eq!(encoder.encode_count().await, report.converted());
//! ```
//!
//! [`Encoder`]: crate::encoder::Encoder

mod mock_encoder;

pub use mock_encoder::{MockEncoder, RecordedEncode};
