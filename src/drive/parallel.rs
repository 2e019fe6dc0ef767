//! Parallel driver for in-memory content.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use bytes::Bytes;
use tracing::trace;

use crate::block::{BlockTicket, FinishedBlock};
use crate::config::EtagConfig;
use crate::encode::Etag;
use crate::engine::Engine;
use crate::error::EtagError;

/// Computes the etag of an in-memory buffer, hashing blocks in parallel.
///
/// Blocks are handed out in windows of `config.concurrency()` and hashed
/// on the rayon pool. Each window is committed in the order its blocks
/// finish, so the ring is what restores stream order. The result is
/// identical to [`digest_bytes`](crate::digest_bytes).
///
/// # Errors
///
/// Returns [`EtagError::PrimitiveFailure`] if a hashing worker panics.
///
/// # Example
///
/// ```
/// use etagrs::{digest_bytes, digest_parallel, EtagConfig};
///
/// let data = vec![7u8; 9 * 1024 * 1024];
/// let etag = digest_parallel(data.clone(), EtagConfig::new(4))?;
/// assert_eq!(etag, digest_bytes(&data)?);
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn digest_parallel(
    data: impl Into<Bytes>,
    config: EtagConfig,
) -> Result<Option<Etag>, EtagError> {
    digest_parallel_with(data.into(), config, hash_block)
}

fn digest_parallel_with<F>(
    data: Bytes,
    config: EtagConfig,
    hash: F,
) -> Result<Option<Etag>, EtagError>
where
    F: Fn(BlockTicket, &[u8]) -> Result<FinishedBlock, EtagError> + Sync,
{
    let mut engine = Engine::new(config)?;
    let window = config.concurrency();
    let mut offset = 0;

    while offset < data.len() {
        let mut batch = Vec::with_capacity(window);
        while batch.len() < window && offset < data.len() {
            let ticket = engine.next_block()?;
            let end = data.len().min(offset + ticket.remaining());
            batch.push((ticket, data.slice(offset..end)));
            offset = end;
        }
        trace!(blocks = batch.len(), offset, "hashing window");

        for block in hash_window_with(batch, &hash) {
            engine.commit_block(block?)?;
        }
    }
    engine.finalize()
}

/// Hashes every block of a window on the rayon pool and returns the results
/// in completion order. A panic in `hash` fails only the block it hit.
fn hash_window_with<F>(
    batch: Vec<(BlockTicket, Bytes)>,
    hash: &F,
) -> Vec<Result<FinishedBlock, EtagError>>
where
    F: Fn(BlockTicket, &[u8]) -> Result<FinishedBlock, EtagError> + Sync,
{
    let (tx, rx) = mpsc::channel();
    rayon::scope(|scope| {
        for (ticket, piece) in batch {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| hash(ticket, &piece)));
                let _ = tx.send(result.unwrap_or_else(|_| Err(worker_panicked())));
            });
        }
    });
    drop(tx);
    rx.into_iter().collect()
}

fn worker_panicked() -> EtagError {
    EtagError::PrimitiveFailure {
        message: "block hashing worker panicked".to_string(),
    }
}

fn hash_block(mut ticket: BlockTicket, piece: &[u8]) -> Result<FinishedBlock, EtagError> {
    ticket.update(piece)?;
    ticket.finish()
}
