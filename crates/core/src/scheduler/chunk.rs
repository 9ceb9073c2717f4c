//! Partitioning of the file list into bounded, order-preserving chunks.

use std::num::NonZeroUsize;

/// Size of every chunk but possibly the last: `min(concurrency, len)`.
pub fn chunk_size(concurrency: NonZeroUsize, len: usize) -> usize {
    concurrency.get().min(len)
}

/// Number of chunks [`plan_chunks`] yields for `len` items.
pub fn chunk_count(concurrency: NonZeroUsize, len: usize) -> usize {
    match chunk_size(concurrency, len) {
        0 => 0,
        size => len.div_ceil(size),
    }
}

/// Lazily splits `items` into consecutive chunks of [`chunk_size`] items.
///
/// An empty slice yields no chunks.
pub fn plan_chunks<T>(items: &[T], concurrency: NonZeroUsize) -> std::slice::Chunks<'_, T> {
    // `chunks(0)` panics; with no items any non-zero size yields nothing.
    items.chunks(chunk_size(concurrency, items.len()).max(1))
}
