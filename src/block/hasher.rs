//! The BlockHasher - hashes exactly one block.

use crate::config::BLOCK_SIZE;
use crate::digest::BlockDigest;
use crate::error::EtagError;
use crate::hash::Sha1Hasher;

/// Streams the bytes of one block into its hash computation.
///
/// A block accepts at most [`BLOCK_SIZE`] bytes. Callers clip their input
/// to [`remaining_capacity`](Self::remaining_capacity); feeding past it is
/// an error and leaves the block untouched. Once finalized the digest is
/// fixed and the block accepts no more input.
///
/// # Example
///
/// ```
/// use etagrs::BlockHasher;
///
/// let mut block = BlockHasher::new();
/// block.feed(b"abc")?;
/// let digest = block.finalize()?;
///
/// assert_eq!(digest.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// assert!(block.is_done());
/// # Ok::<(), etagrs::EtagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BlockHasher {
    state: Option<Sha1Hasher>,
    remaining: usize,
    digest: Option<BlockDigest>,
}

impl BlockHasher {
    /// Creates an empty open block with the full block capacity.
    pub fn new() -> Self {
        Self {
            state: Some(Sha1Hasher::new()),
            remaining: BLOCK_SIZE,
            digest: None,
        }
    }

    /// Feeds bytes into the block.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] if the block is already
    /// finalized or `data` is longer than the remaining capacity.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), EtagError> {
        let Some(state) = self.state.as_mut() else {
            return Err(EtagError::invalid_usage("feed on a finalized block"));
        };
        if data.len() > self.remaining {
            return Err(EtagError::invalid_usage("feed exceeds block capacity"));
        }
        state.update(data);
        self.remaining -= data.len();
        Ok(())
    }

    /// Finalizes the block and returns its digest.
    ///
    /// A block may be finalized before it is full; the trailing block of a
    /// stream usually is.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] if the block was already
    /// finalized.
    pub fn finalize(&mut self) -> Result<BlockDigest, EtagError> {
        let state = self
            .state
            .take()
            .ok_or(EtagError::invalid_usage("block finalized twice"))?;
        let digest = state.finalize();
        self.digest = Some(digest);
        Ok(digest)
    }

    /// Returns how many more bytes the block accepts.
    pub fn remaining_capacity(&self) -> usize {
        self.remaining
    }

    /// Returns how many bytes have been fed.
    pub fn len(&self) -> usize {
        BLOCK_SIZE - self.remaining
    }

    /// Returns `true` if no bytes have been fed.
    pub fn is_empty(&self) -> bool {
        self.remaining == BLOCK_SIZE
    }

    /// Returns `true` once the block holds its full [`BLOCK_SIZE`] bytes.
    pub fn is_full(&self) -> bool {
        self.remaining == 0
    }

    /// Returns `true` once the block has been finalized.
    pub fn is_done(&self) -> bool {
        self.digest.is_some()
    }

    /// Returns the digest, if the block has been finalized.
    pub fn digest(&self) -> Option<BlockDigest> {
        self.digest
    }
}

impl Default for BlockHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block() {
        let block = BlockHasher::new();
        assert_eq!(block.remaining_capacity(), BLOCK_SIZE);
        assert!(block.is_empty());
        assert!(!block.is_done());
        assert!(block.digest().is_none());
    }

    #[test]
    fn test_feed_decrements_capacity() {
        let mut block = BlockHasher::new();
        block.feed(&[1u8; 100]).unwrap();
        block.feed(&[2u8; 28]).unwrap();
        assert_eq!(block.len(), 128);
        assert_eq!(block.remaining_capacity(), BLOCK_SIZE - 128);
    }

    #[test]
    fn test_split_feed_matches_one_shot() {
        let mut split = BlockHasher::new();
        split.feed(b"hello ").unwrap();
        split.feed(b"").unwrap();
        split.feed(b"world").unwrap();

        assert_eq!(split.finalize().unwrap(), Sha1Hasher::hash(b"hello world"));
    }

    #[test]
    fn test_overfeed_rejected_and_state_kept() {
        let mut block = BlockHasher::new();
        block.feed(&vec![0u8; BLOCK_SIZE - 1]).unwrap();

        let err = block.feed(&[0u8; 2]).unwrap_err();
        assert!(matches!(err, EtagError::InvalidUsage { .. }));
        assert_eq!(block.remaining_capacity(), 1);

        block.feed(&[0u8; 1]).unwrap();
        assert!(block.is_full());
        assert_eq!(
            block.finalize().unwrap(),
            Sha1Hasher::hash(&vec![0u8; BLOCK_SIZE])
        );
    }

    #[test]
    fn test_finalize_is_irreversible() {
        let mut block = BlockHasher::new();
        block.feed(b"abc").unwrap();
        let digest = block.finalize().unwrap();

        assert!(block.is_done());
        assert_eq!(block.digest(), Some(digest));
        assert!(matches!(
            block.feed(b"more"),
            Err(EtagError::InvalidUsage { .. })
        ));
        assert!(matches!(
            block.finalize(),
            Err(EtagError::InvalidUsage { .. })
        ));
        assert_eq!(block.digest(), Some(digest));
    }

    #[test]
    fn test_empty_block_digest() {
        let mut block = BlockHasher::new();
        assert_eq!(
            block.finalize().unwrap().to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }
}
