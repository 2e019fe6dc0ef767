//! Configuration for etag computation.
//!
//! The block size and hash primitive are fixed by the etag scheme, so the
//! only knobs are how many blocks may be in flight at once and how much
//! the reader drivers pull per read.
//!
//! # Example
//!
//! ```
//! use etagrs::EtagConfig;
//!
//! let config = EtagConfig::default()
//!     .with_concurrency(4)
//!     .with_read_buffer_size(256 * 1024);
//!
//! assert_eq!(config.concurrency(), 4);
//! config.validate()?;
//! # Ok::<(), etagrs::EtagError>(())
//! ```

use crate::error::EtagError;

/// Size of one hashed block (4 MiB).
pub const BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Largest supported slot ring.
pub const MAX_CONCURRENCY: usize = 16;

/// Slot ring size used by [`EtagConfig::default`].
pub const DEFAULT_CONCURRENCY: usize = MAX_CONCURRENCY;

/// Default read size for the reader drivers (64 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for an [`Engine`](crate::Engine) and the digest drivers.
///
/// `concurrency` is the number of slots in the ring, which bounds how many
/// blocks may be hashed ahead of the merge point. Any value is accepted
/// and clamped into `1..=MAX_CONCURRENCY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EtagConfig {
    /// Number of ring slots, always within `1..=MAX_CONCURRENCY`.
    concurrency: usize,

    /// Bytes requested per read by the reader drivers.
    read_buffer_size: usize,
}

impl EtagConfig {
    /// Creates a configuration with the given concurrency hint.
    ///
    /// # Example
    ///
    /// ```
    /// use etagrs::EtagConfig;
    ///
    /// assert_eq!(EtagConfig::new(0).concurrency(), 1);
    /// assert_eq!(EtagConfig::new(64).concurrency(), 16);
    /// ```
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: clamp_concurrency(concurrency),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Sets the concurrency hint, clamped into `1..=MAX_CONCURRENCY`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = clamp_concurrency(concurrency);
        self
    }

    /// Sets the read buffer size used by the reader drivers.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`EtagConfig::validate`] to check it.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Returns the number of ring slots.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the read buffer size.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUsage`] if the read buffer size is zero.
    pub fn validate(&self) -> Result<(), EtagError> {
        if self.read_buffer_size == 0 {
            return Err(EtagError::invalid_usage(
                "read buffer size must be non-zero",
            ));
        }
        Ok(())
    }
}

impl Default for EtagConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

fn clamp_concurrency(hint: usize) -> usize {
    hint.clamp(1, MAX_CONCURRENCY)
}
