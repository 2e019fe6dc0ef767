//! Owned block handles for hashing outside the engine.

use crate::digest::BlockDigest;
use crate::error::EtagError;

use super::BlockHasher;

/// An allocated block that can be hashed on any thread.
///
/// Obtained from [`Engine::next_block`](crate::Engine::next_block). The
/// ticket owns its [`BlockHasher`], so no other caller can touch the block
/// while a worker fills it. Once filled, [`finish`](Self::finish) computes
/// the digest on the worker's thread and the resulting [`FinishedBlock`] is
/// handed back to [`Engine::commit_block`](crate::Engine::commit_block).
#[derive(Debug)]
pub struct BlockTicket {
    engine: u64,
    generation: u64,
    sequence: u64,
    hasher: BlockHasher,
}

impl BlockTicket {
    pub(crate) fn new(engine: u64, generation: u64, sequence: u64, hasher: BlockHasher) -> Self {
        Self {
            engine,
            generation,
            sequence,
            hasher,
        }
    }

    /// Returns the block's position in the stream, starting at zero.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns how many more bytes the block accepts.
    pub fn remaining(&self) -> usize {
        self.hasher.remaining_capacity()
    }

    /// Returns how many bytes the block holds so far.
    pub fn len(&self) -> usize {
        self.hasher.len()
    }

    /// Returns `true` if the block holds no bytes yet.
    pub fn is_empty(&self) -> bool {
        self.hasher.is_empty()
    }

    /// Feeds bytes into the block and returns the remaining capacity.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] if `data` exceeds the remaining
    /// capacity.
    pub fn update(&mut self, data: &[u8]) -> Result<usize, EtagError> {
        self.hasher.feed(data)?;
        Ok(self.hasher.remaining_capacity())
    }

    /// Finalizes the block.
    pub fn finish(mut self) -> Result<FinishedBlock, EtagError> {
        let len = self.hasher.len();
        let digest = self.hasher.finalize()?;
        Ok(FinishedBlock {
            engine: self.engine,
            generation: self.generation,
            sequence: self.sequence,
            digest,
            len,
        })
    }
}

/// A hashed block waiting to be committed to its engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedBlock {
    engine: u64,
    generation: u64,
    sequence: u64,
    digest: BlockDigest,
    len: usize,
}

impl FinishedBlock {
    /// Returns the block's position in the stream.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the block digest.
    pub fn digest(&self) -> BlockDigest {
        self.digest
    }

    /// Returns the number of bytes that were hashed.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the block hashed zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn engine(&self) -> u64 {
        self.engine
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}
