//! Hash primitive used for block and top digests.
//!
//! The etag scheme fixes the primitive to SHA-1 for both the per-block
//! digests and the top hash over them.
//!
//! - [`Sha1Hasher`] - streaming SHA-1 producing a [`BlockDigest`](crate::BlockDigest)

mod primitive;

pub(crate) use primitive::Sha1Hasher;
