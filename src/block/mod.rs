//! Per-block hashing.
//!
//! - [`BlockHasher`] - streams up to one block of bytes into SHA-1
//! - [`BlockTicket`] / [`FinishedBlock`] - owned handles for hashing a
//!   block off the engine's thread

mod hasher;
mod ticket;

pub use hasher::BlockHasher;
pub use ticket::{BlockTicket, FinishedBlock};
