//! Digest types.
//!
//! - [`BlockDigest`] - 20-byte SHA-1 digest of a block or of the top hash

mod value;

pub use value::BlockDigest;
