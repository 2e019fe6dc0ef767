//! Etag framing and text encoding.
//!
//! - [`encode`] - frames `format byte ‖ hash` as URL-safe base64
//! - [`Etag`] - the resulting identifier, parseable back from text
//! - [`EtagKind`] - single-block or multi-block framing

mod etag;

pub use etag::{Etag, EtagKind, encode};
