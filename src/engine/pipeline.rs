//! Core etag engine - Engine with streaming API.
//!
//! This module implements the block-hash pipeline. It provides a pure
//! streaming interface:
//!
//! - [`Engine`] - Stateful engine that processes streaming bytes
//! - `update()` - Feed data in any size (1 byte, 8KB, 1MB, etc.)
//! - `finalize()` - Flush the trailing block and produce the etag
//!
//! # Example
//!
//! ```
//! use etagrs::{Engine, EtagConfig};
//!
//! let mut engine = Engine::new(EtagConfig::default())?;
//!
//! // Feed data in any size
//! engine.update(b"first")?;
//! engine.update(b"second")?;
//!
//! // When the stream ends, get the etag
//! let etag = engine.finalize()?.expect("non-empty input");
//! assert_eq!(etag.as_str().len(), 28);
//! # Ok::<(), etagrs::EtagError>(())
//! ```

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::block::{BlockHasher, BlockTicket, FinishedBlock};
use crate::config::EtagConfig;
use crate::encode::{Etag, encode};
use crate::error::EtagError;
use crate::merge::{SlotRing, TopDigestAccumulator};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(0);

/// Lifecycle of an [`Engine`] computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing has been fed since construction or the last reset.
    Empty,
    /// At least one byte or block has been accepted.
    Accumulating,
    /// The etag has been produced.
    Finalized,
    /// A call failed; the engine must be reset.
    Failed,
}

/// A streaming engine that turns a byte stream into an etag.
///
/// Bytes are cut into 4 MiB blocks. Each block is hashed on its own, and
/// finished blocks pass through a [`SlotRing`] that merges their digests
/// into the top hash strictly in stream order.
///
/// # Streaming API
///
/// - Call `update()` with data in any size (1 byte to megabytes)
/// - Call `finalize()` when the stream ends
/// - Call `reset()` to reuse the engine for another stream
///
/// # Determinism
///
/// Identical byte streams produce identical etags, regardless of:
/// - How many bytes are passed to each `update()` call
/// - The order in which blocks handed out by `next_block()` finish
///
/// # Parallel hashing
///
/// [`next_block`](Engine::next_block) hands out an owned [`BlockTicket`]
/// that can be filled and finished on another thread, then returned with
/// [`commit_block`](Engine::commit_block). Up to `concurrency` blocks may be
/// in flight; beyond that allocation fails with
/// [`EtagError::ResourceExhausted`] instead of waiting.
///
/// # Failure
///
/// An error from `update()` or `finalize()` leaves the engine in
/// [`EngineState::Failed`]. Partial block state cannot be salvaged; call
/// `reset()` and feed the content again from the start.
#[derive(Debug)]
pub struct Engine {
    id: u64,
    config: EtagConfig,
    ring: SlotRing,
    acc: TopDigestAccumulator,
    open: Option<BlockTicket>,
    block_count: u64,
    committed_bytes: u64,
    generation: u64,
    state: EngineState,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::OutOfMemory`] if the slot ring cannot be
    /// allocated.
    ///
    /// # Example
    ///
    /// ```
    /// use etagrs::{Engine, EtagConfig};
    ///
    /// let engine = Engine::new(EtagConfig::new(4))?;
    /// assert_eq!(engine.config().concurrency(), 4);
    /// # Ok::<(), etagrs::EtagError>(())
    /// ```
    pub fn new(config: EtagConfig) -> Result<Self, EtagError> {
        Ok(Self {
            id: NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed),
            ring: SlotRing::new(config.concurrency())?,
            acc: TopDigestAccumulator::new(),
            open: None,
            block_count: 0,
            committed_bytes: 0,
            generation: 0,
            state: EngineState::Empty,
            config,
        })
    }

    /// Creates an engine whose ring holds `hint` slots, clamped to `1..=16`.
    pub fn with_concurrency(hint: usize) -> Result<Self, EtagError> {
        Self::new(EtagConfig::new(hint))
    }

    /// Feeds data into the engine.
    ///
    /// The data is split at block boundaries; every block that fills up is
    /// finalized, committed, and merged as soon as all earlier blocks are.
    ///
    /// # Errors
    ///
    /// - [`EtagError::InvalidUsage`] after `finalize()` or a failed call
    /// - [`EtagError::ResourceExhausted`] if tickets handed out by
    ///   `next_block()` keep every slot busy
    ///
    /// # Example
    ///
    /// ```
    /// use etagrs::Engine;
    ///
    /// let mut engine = Engine::with_concurrency(1)?;
    /// for piece in [&b"hello"[..], b" ", b"world"] {
    ///     engine.update(piece)?;
    /// }
    /// assert_eq!(engine.bytes_processed(), 11);
    /// # Ok::<(), etagrs::EtagError>(())
    /// ```
    pub fn update(&mut self, data: &[u8]) -> Result<(), EtagError> {
        self.ensure_accepting()?;
        let result = self.update_blocks(data);
        self.settle(result)
    }

    fn update_blocks(&mut self, data: &[u8]) -> Result<(), EtagError> {
        let mut rest = data;
        while !rest.is_empty() {
            let block = self.open_block()?;
            let take = rest.len().min(block.remaining());
            block.update(&rest[..take])?;
            let full = block.remaining() == 0;
            rest = &rest[take..];
            self.state = EngineState::Accumulating;

            if full {
                if let Some(block) = self.open.take() {
                    self.commit_finished(block.finish()?)?;
                }
            }
        }
        Ok(())
    }

    /// Finalizes the stream and returns its etag.
    ///
    /// The trailing block is finalized even if it is short, the ring is
    /// drained completely, and the result is encoded. Empty input has no
    /// etag and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`EtagError::InvalidUsage`] if called twice, after a failure, or
    ///   while tickets from `next_block()` are still uncommitted
    pub fn finalize(&mut self) -> Result<Option<Etag>, EtagError> {
        self.ensure_accepting()?;
        if self.outstanding_tickets() > 0 {
            return Err(EtagError::invalid_usage(
                "finalize with blocks still in flight",
            ));
        }
        let result = self.finalize_blocks();
        let result = self.settle(result);
        if result.is_ok() {
            self.state = EngineState::Finalized;
        }
        result
    }

    fn finalize_blocks(&mut self) -> Result<Option<Etag>, EtagError> {
        if let Some(block) = self.open.take() {
            self.commit_finished(block.finish()?)?;
        }
        self.ring.drain_ready(&mut self.acc);
        if !self.ring.is_empty() {
            return Err(EtagError::invalid_usage(
                "finalize with blocks still in flight",
            ));
        }

        let hash = if self.block_count > 1 {
            Some(self.acc.finalize())
        } else {
            self.acc.first()
        };
        let etag = hash.and_then(|hash| encode(self.block_count, &hash));

        debug!(
            blocks = self.block_count,
            bytes = self.committed_bytes,
            etag = etag.as_ref().map(Etag::as_str),
            "etag finalized"
        );
        Ok(etag)
    }

    /// Resets the engine for a new stream.
    ///
    /// Clears every block, the ring, and the top hash. Tickets handed out
    /// before the reset can no longer be committed.
    pub fn reset(&mut self) {
        self.ring.reset();
        self.acc.reset();
        self.open = None;
        self.block_count = 0;
        self.committed_bytes = 0;
        self.generation += 1;
        self.state = EngineState::Empty;
        trace!(generation = self.generation, "engine reset");
    }

    /// Hands out a block for hashing outside the engine.
    ///
    /// If `update()` left a partially filled block open, that block is
    /// handed out so its bytes are kept; otherwise a fresh slot is
    /// allocated.
    ///
    /// # Errors
    ///
    /// - [`EtagError::ResourceExhausted`] if every slot is busy and the head
    ///   block has not been committed; the engine stays usable
    /// - [`EtagError::InvalidUsage`] after `finalize()` or a failed call
    pub fn next_block(&mut self) -> Result<BlockTicket, EtagError> {
        self.ensure_accepting()?;
        let ticket = match self.open.take() {
            Some(ticket) => ticket,
            None => self.allocate()?,
        };
        self.state = EngineState::Accumulating;
        Ok(ticket)
    }

    /// Commits a block finished outside the engine.
    ///
    /// Blocks may be committed in any order; they are merged in stream
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] if the block belongs to another
    /// computation, was already committed, or the engine is finalized.
    pub fn commit_block(&mut self, block: FinishedBlock) -> Result<(), EtagError> {
        self.ensure_accepting()?;
        self.commit_finished(block)
    }

    /// Returns the number of committed blocks.
    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// Returns the number of bytes in committed blocks and the open block.
    pub fn bytes_processed(&self) -> u64 {
        self.committed_bytes + self.open.as_ref().map_or(0, |b| b.len() as u64)
    }

    /// Returns the number of allocated blocks not yet merged.
    pub fn in_flight(&self) -> usize {
        self.ring.in_flight()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns `true` once the etag has been produced.
    pub fn is_finalized(&self) -> bool {
        self.state == EngineState::Finalized
    }

    /// Returns the configuration used by this engine.
    pub fn config(&self) -> &EtagConfig {
        &self.config
    }

    fn ensure_accepting(&self) -> Result<(), EtagError> {
        match self.state {
            EngineState::Finalized => Err(EtagError::invalid_usage("engine already finalized")),
            EngineState::Failed => Err(EtagError::invalid_usage(
                "engine failed; reset before reuse",
            )),
            EngineState::Empty | EngineState::Accumulating => Ok(()),
        }
    }

    fn settle<T>(&mut self, result: Result<T, EtagError>) -> Result<T, EtagError> {
        if result.is_err() {
            self.state = EngineState::Failed;
        }
        result
    }

    fn allocate(&mut self) -> Result<BlockTicket, EtagError> {
        let sequence = self.ring.allocate(&mut self.acc)?;
        Ok(BlockTicket::new(self.id, self.generation, sequence, BlockHasher::new()))
    }

    fn open_block(&mut self) -> Result<&mut BlockTicket, EtagError> {
        let ticket = match self.open.take() {
            Some(ticket) => ticket,
            None => self.allocate()?,
        };
        Ok(self.open.insert(ticket))
    }

    fn commit_finished(&mut self, block: FinishedBlock) -> Result<(), EtagError> {
        if block.engine() != self.id {
            return Err(EtagError::invalid_usage("block belongs to another engine"));
        }
        if block.generation() != self.generation {
            return Err(EtagError::invalid_usage(
                "block belongs to an earlier computation",
            ));
        }
        self.ring.commit(block.sequence(), block.digest())?;
        self.block_count += 1;
        self.committed_bytes += block.len() as u64;
        self.ring.drain_ready(&mut self.acc);
        Ok(())
    }

    fn outstanding_tickets(&self) -> usize {
        let pending = self.ring.pending();
        match self.open {
            Some(_) => pending.saturating_sub(1),
            None => pending,
        }
    }
}

impl io::Write for Engine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
