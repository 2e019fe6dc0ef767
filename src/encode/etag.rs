//! The Etag type and its encoder.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::digest::BlockDigest;
use crate::error::EtagError;

/// Raw payload length: one format byte plus a 20-byte hash.
const PAYLOAD_LEN: usize = 1 + BlockDigest::SIZE;

/// How the hash inside an etag was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtagKind {
    /// Content fit in one block; the hash is that block's digest.
    SingleBlock,
    /// Content spans several blocks; the hash is the top hash over the
    /// ordered block digests.
    MultiBlock,
}

impl EtagKind {
    /// Returns the leading payload byte for this kind.
    pub const fn format_byte(self) -> u8 {
        match self {
            EtagKind::SingleBlock => 0x16,
            EtagKind::MultiBlock => 0x96,
        }
    }

    /// Maps a payload byte back to a kind.
    pub const fn from_format_byte(byte: u8) -> Option<Self> {
        match byte {
            0x16 => Some(EtagKind::SingleBlock),
            0x96 => Some(EtagKind::MultiBlock),
            _ => None,
        }
    }

    fn for_block_count(block_count: u64) -> Self {
        if block_count == 1 {
            EtagKind::SingleBlock
        } else {
            EtagKind::MultiBlock
        }
    }
}

/// A content identifier: URL-safe, unpadded base64 of `format byte ‖ hash`.
///
/// Always 28 ASCII characters.
///
/// # Example
///
/// ```
/// use etagrs::{Etag, EtagKind};
///
/// let etag: Etag = "FqmZPjZHBoFquj4lcXhQwmyc0Nid".parse()?;
/// assert_eq!(etag.kind(), EtagKind::SingleBlock);
/// assert_eq!(etag.hash().to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// # Ok::<(), etagrs::EtagError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Etag {
    text: String,
    kind: EtagKind,
    hash: BlockDigest,
}

impl Etag {
    /// Builds an etag from its parts.
    pub fn new(kind: EtagKind, hash: BlockDigest) -> Self {
        Self {
            text: URL_SAFE_NO_PAD.encode(frame(kind, &hash)),
            kind,
            hash,
        }
    }

    /// Returns the textual form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the textual form, consuming the etag.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns how the hash was derived.
    pub fn kind(&self) -> EtagKind {
        self.kind
    }

    /// Returns the 20-byte hash carried by the etag.
    pub fn hash(&self) -> BlockDigest {
        self.hash
    }

    /// Returns the raw 21-byte payload.
    pub fn to_bytes(&self) -> [u8; PAYLOAD_LEN] {
        frame(self.kind, &self.hash)
    }
}

fn frame(kind: EtagKind, hash: &BlockDigest) -> [u8; PAYLOAD_LEN] {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = kind.format_byte();
    payload[1..].copy_from_slice(hash.as_bytes());
    payload
}

/// Frames a final hash as an etag.
///
/// `block_count == 1` selects the single-block format (the hash must be the
/// block's own digest); anything larger selects the multi-block format (the
/// hash must be the top hash). Zero blocks means empty content, which has
/// no etag.
pub fn encode(block_count: u64, hash: &BlockDigest) -> Option<Etag> {
    if block_count == 0 {
        return None;
    }
    Some(Etag::new(EtagKind::for_block_count(block_count), *hash))
}

impl FromStr for Etag {
    type Err = EtagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| EtagError::InvalidEtag {
                message: "not unpadded url-safe base64",
            })?;
        if payload.len() != PAYLOAD_LEN {
            return Err(EtagError::InvalidEtag {
                message: "payload must be 21 bytes",
            });
        }
        let kind = EtagKind::from_format_byte(payload[0]).ok_or(EtagError::InvalidEtag {
            message: "unknown format byte",
        })?;
        let hash = BlockDigest::from_slice(&payload[1..]).ok_or(EtagError::InvalidEtag {
            message: "payload must be 21 bytes",
        })?;
        Ok(Self {
            text: s.to_owned(),
            kind,
            hash,
        })
    }
}

impl AsRef<str> for Etag {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Etag> for String {
    fn from(etag: Etag) -> Self {
        etag.text
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha1Hasher;

    #[test]
    fn test_zero_blocks_has_no_etag() {
        assert!(encode(0, &Sha1Hasher::hash(b"")).is_none());
    }

    #[test]
    fn test_single_block_vector() {
        let etag = encode(1, &Sha1Hasher::hash(b"abc")).unwrap();
        assert_eq!(etag.as_str(), "FqmZPjZHBoFquj4lcXhQwmyc0Nid");
        assert_eq!(etag.kind(), EtagKind::SingleBlock);
        assert_eq!(etag.to_bytes()[0], 0x16);
    }

    #[test]
    fn test_multi_block_format_byte() {
        let etag = encode(7, &Sha1Hasher::hash(b"top")).unwrap();
        assert_eq!(etag.kind(), EtagKind::MultiBlock);
        assert_eq!(etag.to_bytes()[0], 0x96);
        assert_eq!(etag.as_str().len(), 28);
    }

    #[test]
    fn test_text_is_encoded_payload() {
        let hash = Sha1Hasher::hash(b"payload");
        for etag in [
            Etag::new(EtagKind::SingleBlock, hash),
            Etag::new(EtagKind::MultiBlock, hash),
        ] {
            let decoded = URL_SAFE_NO_PAD.decode(etag.as_str()).unwrap();
            assert_eq!(decoded, etag.to_bytes());
            assert_eq!(&decoded[1..], hash.as_bytes());
        }
    }

    #[test]
    fn test_url_safe_alphabet_without_padding() {
        for n in 0u32..64 {
            let etag = encode(2, &Sha1Hasher::hash(&n.to_le_bytes())).unwrap();
            let text = etag.as_str();
            assert_eq!(text.len(), 28);
            assert!(!text.contains('+'));
            assert!(!text.contains('/'));
            assert!(!text.contains('='));
        }
    }

    #[test]
    fn test_parse() {
        let etag: Etag = "lhCFgki5yzon0rjN9uJusf6qtsF6".parse().unwrap();
        assert_eq!(etag.kind(), EtagKind::MultiBlock);
        assert_eq!(etag.to_string(), "lhCFgki5yzon0rjN9uJusf6qtsF6");
        assert_eq!(Etag::new(etag.kind(), etag.hash()), etag);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        // Standard alphabet and padding.
        assert!("FqmZPjZHBoFquj4lcXhQwmyc0Nid=".parse::<Etag>().is_err());
        // Too short.
        assert!("FqmZPjZH".parse::<Etag>().is_err());
        // Valid base64, unknown format byte.
        let bogus = URL_SAFE_NO_PAD.encode([0x01u8; PAYLOAD_LEN]);
        assert!(matches!(
            bogus.parse::<Etag>(),
            Err(EtagError::InvalidEtag { .. })
        ));
    }
}
