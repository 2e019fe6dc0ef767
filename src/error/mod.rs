//! Error types for etagrs.

use thiserror::Error;

/// Errors that can occur while computing or parsing an etag.
///
/// Every error is final for the computation in progress. Block and
/// accumulator state cannot be resumed after a fault, so callers must
/// [`reset`](crate::Engine::reset) the engine and start again from the
/// beginning of the content.
#[derive(Debug, Error)]
pub enum EtagError {
    /// An I/O error occurred while reading input data.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot ring is full and its head block has not been committed.
    #[error("no free block slot (ring capacity {capacity})")]
    ResourceExhausted {
        /// The number of slots in the ring.
        capacity: usize,
    },

    /// The hash primitive reported an internal fault.
    #[error("hash primitive failure: {message}")]
    PrimitiveFailure {
        /// Description of the fault.
        message: String,
    },

    /// Slot or buffer storage could not be allocated.
    #[error("out of memory reserving {requested} slots")]
    OutOfMemory {
        /// The number of slots that were requested.
        requested: usize,
    },

    /// An operation was called in violation of the engine state machine
    /// or a block's capacity.
    #[error("invalid usage: {message}")]
    InvalidUsage {
        /// Description of what was violated.
        message: &'static str,
    },

    /// A textual etag could not be parsed.
    #[error("invalid etag: {message}")]
    InvalidEtag {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl EtagError {
    pub(crate) const fn invalid_usage(message: &'static str) -> Self {
        EtagError::InvalidUsage { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: EtagError = io_err.into();
        assert!(matches!(err, EtagError::Io(_)));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let err = EtagError::from(std::io::Error::other("disk gone"));
        assert!(err.source().is_some());
        assert!(EtagError::invalid_usage("x").source().is_none());
    }

    #[test]
    fn test_display() {
        let err = EtagError::ResourceExhausted { capacity: 4 };
        assert!(err.to_string().contains("ring capacity 4"));

        let err = EtagError::invalid_usage("update after finalize");
        assert_eq!(err.to_string(), "invalid usage: update after finalize");
    }
}
