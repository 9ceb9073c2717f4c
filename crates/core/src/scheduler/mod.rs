//! Chunked concurrent conversion scheduler.
//!
//! A run walks a fixed file list in chunks of at most `concurrency` files.
//! Every file of a chunk is converted concurrently; the next chunk starts
//! only once all of them have resolved.

mod chunk;
mod paths;
mod runner;
mod types;

pub use chunk::{chunk_count, chunk_size, plan_chunks};
pub use paths::{destination_for, PathError};
pub use runner::ConversionScheduler;
pub use types::{ChunkReport, FileOutcome, FileStatus, RunReport};
