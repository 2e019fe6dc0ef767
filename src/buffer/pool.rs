//! Thread-local pool of read buffers.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use crate::config::DEFAULT_READ_BUFFER_SIZE;

/// Buffers larger than this are dropped instead of pooled.
const MAX_POOLED_CAPACITY: usize = DEFAULT_READ_BUFFER_SIZE * 16;

/// Maximum number of buffers to keep per thread.
const MAX_POOL_SIZE: usize = 4;

/// A reusable, zero-initialized read buffer.
pub(crate) struct ReadBuffer {
    data: Vec<u8>,
}

impl ReadBuffer {
    /// Takes a buffer of `len` bytes from the thread-local pool, or
    /// allocates one.
    pub(crate) fn take(len: usize) -> Self {
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();
        data.resize(len, 0);
        Self { data }
    }
}

impl Deref for ReadBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for ReadBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for ReadBuffer {
    fn drop(&mut self) {
        if self.data.capacity() <= MAX_POOLED_CAPACITY {
            self.data.clear();
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
