//! etagrs
//!
//! Block-hash content identifiers for object storage.
//!
//! `etagrs` computes a stable etag for arbitrary binary content so that a
//! storage client can detect duplicate content and name objects before
//! transferring them. Content is cut into fixed 4 MiB blocks, every block
//! is hashed with SHA-1 on its own (optionally on worker threads), and the
//! block digests are merged in stream order into a single identifier:
//!
//! - one block: `base64url(0x16 ‖ sha1(block))`
//! - several blocks: `base64url(0x96 ‖ sha1(sha1(b0) ‖ sha1(b1) ‖ …))`
//!
//! Empty content has no etag.
//!
//! The crate intentionally:
//! - does NOT talk to any storage API
//! - does NOT support other block sizes or hash functions
//! - does NOT checkpoint or resume computations
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use etagrs::{digest_reader, EtagConfig, EtagError};
//!
//! fn main() -> Result<(), EtagError> {
//!     let file = File::open("data.bin")?;
//!     if let Some(etag) = digest_reader(file, EtagConfig::default())? {
//!         println!("etag {etag}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Streaming
//!
//! ```
//! use etagrs::{Engine, EtagConfig};
//!
//! let mut engine = Engine::new(EtagConfig::default())?;
//! engine.update(b"ab")?;
//! engine.update(b"c")?;
//! let etag = engine.finalize()?.expect("non-empty input");
//! assert_eq!(etag.as_str(), "FqmZPjZHBoFquj4lcXhQwmyc0Nid");
//! # Ok::<(), etagrs::EtagError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use etagrs::{digest_async, EtagConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> Result<(), etagrs::EtagError> {
//!     let etag = digest_async(reader, EtagConfig::default())?.await?;
//!     println!("{etag:?}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod config;
mod digest;
mod drive;
mod encode;
mod engine;
mod error;
mod merge;

mod buffer; // internal (thread-local reuse)
mod hash; // internal sha1 wrapper

#[cfg(feature = "async-io")]
mod async_io;

//
// Public surface
//

pub use block::{BlockHasher, BlockTicket, FinishedBlock};
pub use config::{
    BLOCK_SIZE, DEFAULT_CONCURRENCY, DEFAULT_READ_BUFFER_SIZE, EtagConfig, MAX_CONCURRENCY,
};
pub use digest::BlockDigest;
pub use drive::{digest_bytes, digest_file, digest_reader};
pub use encode::{Etag, EtagKind, encode};
pub use engine::{Engine, EngineState};
pub use error::EtagError;
pub use merge::{SlotRing, TopDigestAccumulator};

#[cfg(feature = "parallel")]
pub use drive::digest_parallel;

#[cfg(feature = "async-io")]
pub use async_io::{DigestFuture, digest_async};
