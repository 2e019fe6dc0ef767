//! Internal read buffer management.
//!
//! The reader drivers pull input through a thread-local pool of read
//! buffers so that hashing many files on one thread does not allocate a
//! fresh buffer per file. It is an implementation detail and not part of
//! the public API.

mod pool;

pub(crate) use pool::ReadBuffer;
