//! Future adapter for async readers.

use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::config::EtagConfig;
use crate::encode::Etag;
use crate::engine::Engine;
use crate::error::EtagError;

pin_project! {
    /// A future that reads an async source to the end and yields its etag.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// Works with tokio, async-std, smol, or any futures-compatible runtime.
    pub struct DigestFuture<R> {
        #[pin]
        reader: R,
        engine: Engine,
        buffer: Vec<u8>,
        done: bool,
    }
}

impl<R: AsyncRead> Future for DigestFuture<R> {
    type Output = Result<Option<Etag>, EtagError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(Err(EtagError::invalid_usage(
                "digest future polled after completion",
            )));
        }

        loop {
            match this.reader.as_mut().poll_read(cx, this.buffer) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.done = true;
                    return Poll::Ready(Err(EtagError::Io(e)));
                }
                Poll::Ready(Ok(0)) => {
                    *this.done = true;
                    return Poll::Ready(this.engine.finalize());
                }
                Poll::Ready(Ok(n)) => {
                    if let Err(e) = this.engine.update(&this.buffer[..n]) {
                        *this.done = true;
                        return Poll::Ready(Err(e));
                    }
                }
            }
        }
    }
}

/// Creates a future that computes the etag of an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, `tokio_util::compat` converts a
/// `tokio::io::AsyncRead` into a `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use etagrs::{digest_async, EtagConfig};
///
/// let file = tokio::fs::File::open("file").await?;
/// let etag = digest_async(file.compat(), EtagConfig::default())?.await?;
/// ```
///
/// # Errors
///
/// Returns [`EtagError::InvalidUsage`] for an invalid configuration and
/// [`EtagError::OutOfMemory`] if the engine cannot be allocated. Read
/// errors surface when the future is awaited.
pub fn digest_async<R: AsyncRead>(
    reader: R,
    config: EtagConfig,
) -> Result<DigestFuture<R>, EtagError> {
    config.validate()?;
    Ok(DigestFuture {
        reader,
        engine: Engine::new(config)?,
        buffer: vec![0u8; config.read_buffer_size()],
        done: false,
    })
}
