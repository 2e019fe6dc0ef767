//! Top-level digest accumulator.

use crate::digest::BlockDigest;
use crate::hash::Sha1Hasher;

/// Sequential hash context over block digests.
///
/// Fed once per block, strictly in stream order, by
/// [`SlotRing::drain_ready`](super::SlotRing::drain_ready). The first
/// digest is kept aside because a single-block etag uses it directly and
/// never consults the top hash.
#[derive(Debug, Clone, Default)]
pub struct TopDigestAccumulator {
    state: Sha1Hasher,
    first: Option<BlockDigest>,
    merged: u64,
}

impl TopDigestAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next block digest.
    pub fn feed(&mut self, digest: &BlockDigest) {
        self.state.update(digest.as_bytes());
        self.first.get_or_insert(*digest);
        self.merged += 1;
    }

    /// Returns the hash over all digests fed so far.
    ///
    /// Only meaningful for multi-block content; with a single block the
    /// etag carries [`first`](Self::first) instead.
    pub fn finalize(&self) -> BlockDigest {
        self.state.clone().finalize()
    }

    /// Returns the number of digests fed.
    pub fn merged(&self) -> u64 {
        self.merged
    }

    /// Returns the first digest fed, if any.
    pub fn first(&self) -> Option<BlockDigest> {
        self.first
    }

    /// Clears all state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
