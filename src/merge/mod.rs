//! In-order merging of block digests.
//!
//! Blocks may finish hashing in any order, but the top hash is defined
//! over block digests in stream order. The [`SlotRing`] holds finished
//! blocks until every earlier block has finished too, then drains them
//! into the [`TopDigestAccumulator`].
//!
//! - [`SlotRing`] - bounded circular buffer of in-flight blocks
//! - [`TopDigestAccumulator`] - sequential hash over block digests

mod accumulator;
mod ring;

pub use accumulator::TopDigestAccumulator;
pub use ring::SlotRing;
