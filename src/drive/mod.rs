//! One-call drivers over common input sources.
//!
//! - [`digest_bytes`] - etag of an in-memory buffer
//! - [`digest_reader`] - etag of any [`std::io::Read`]
//! - [`digest_file`] - etag of a file on disk
//! - [`digest_parallel`] - etag of an in-memory buffer, blocks hashed on
//!   the rayon pool (requires the `parallel` feature)

mod read;

#[cfg(feature = "parallel")]
mod parallel;

pub use read::{digest_bytes, digest_file, digest_reader};

#[cfg(feature = "parallel")]
pub use parallel::digest_parallel;
