//! Async digest support.
//!
//! This module computes etags from `futures-io::AsyncRead` sources,
//! making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! - [`digest_async`] - Creates a future resolving to the etag of an async reader
//!
//! This module requires the `async-io` feature to be enabled.

mod future;

pub use future::{DigestFuture, digest_async};
