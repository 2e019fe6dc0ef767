//! SHA-1 hashing producing block digests.

use sha1::{Digest, Sha1};

use crate::digest::BlockDigest;

/// A streaming SHA-1 hasher.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sha1Hasher {
    state: Sha1,
}

impl Sha1Hasher {
    /// Creates a new hasher.
    pub(crate) fn new() -> Self {
        Self { state: Sha1::new() }
    }

    /// Updates the hasher with more data.
    pub(crate) fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Consumes the hasher and returns the digest.
    pub(crate) fn finalize(self) -> BlockDigest {
        to_digest(&self.state.finalize())
    }

    /// Convenience method to hash data in one shot.
    #[allow(dead_code)]
    pub(crate) fn hash(data: &[u8]) -> BlockDigest {
        to_digest(&Sha1::digest(data))
    }
}

fn to_digest(out: &[u8]) -> BlockDigest {
    let mut bytes = [0u8; BlockDigest::SIZE];
    bytes.copy_from_slice(out);
    BlockDigest::new(bytes)
}
