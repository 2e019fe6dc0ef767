//! Sequential drivers.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tracing::debug;

use crate::buffer::ReadBuffer;
use crate::config::EtagConfig;
use crate::encode::Etag;
use crate::engine::Engine;
use crate::error::EtagError;

/// Computes the etag of an in-memory buffer.
///
/// Returns `Ok(None)` for an empty buffer.
///
/// # Example
///
/// ```
/// let etag = etagrs::digest_bytes(b"abc")?.expect("non-empty");
/// assert_eq!(etag.as_str(), "FqmZPjZHBoFquj4lcXhQwmyc0Nid");
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn digest_bytes(data: &[u8]) -> Result<Option<Etag>, EtagError> {
    let mut engine = Engine::new(EtagConfig::new(1))?;
    engine.update(data)?;
    engine.finalize()
}

/// Computes the etag of everything `reader` yields.
///
/// Reads `config.read_buffer_size()` bytes at a time until end of input.
/// Interrupted reads are retried.
///
/// # Errors
///
/// Returns [`EtagError::Io`] if reading fails and
/// [`EtagError::InvalidUsage`] for an invalid configuration.
pub fn digest_reader<R: Read>(
    mut reader: R,
    config: EtagConfig,
) -> Result<Option<Etag>, EtagError> {
    config.validate()?;
    let mut engine = Engine::new(config)?;
    let mut buf = ReadBuffer::take(config.read_buffer_size());

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        engine.update(&buf[..n])?;
    }
    engine.finalize()
}

/// Computes the etag of the file at `path`.
///
/// # Example
///
/// ```no_run
/// use etagrs::{digest_file, EtagConfig};
///
/// match digest_file("data.bin", EtagConfig::default())? {
///     Some(etag) => println!("{etag}"),
///     None => println!("empty file"),
/// }
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn digest_file(
    path: impl AsRef<Path>,
    config: EtagConfig,
) -> Result<Option<Etag>, EtagError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let etag = digest_reader(file, config)?;
    debug!(path = %path.display(), etag = etag.as_ref().map(Etag::as_str), "file digested");
    Ok(etag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Yields one byte per read and interrupts every other call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        interrupt: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos == self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_digest_bytes_empty() {
        assert!(digest_bytes(&[]).unwrap().is_none());
    }

    #[test]
    fn test_reader_matches_bytes() {
        let data: Vec<u8> = (0..100_000).map(|i| (i % 251) as u8).collect();
        let config = EtagConfig::default().with_read_buffer_size(4096);
        assert_eq!(
            digest_reader(Cursor::new(&data), config).unwrap(),
            digest_bytes(&data).unwrap()
        );
    }

    #[test]
    fn test_reader_retries_interrupted() {
        let reader = Trickle {
            data: b"abc".to_vec(),
            pos: 0,
            interrupt: false,
        };
        let etag = digest_reader(reader, EtagConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(etag.as_str(), "FqmZPjZHBoFquj4lcXhQwmyc0Nid");
    }

    #[test]
    fn test_reader_error_propagates() {
        assert!(matches!(
            digest_reader(Broken, EtagConfig::default()),
            Err(EtagError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EtagConfig::default().with_read_buffer_size(0);
        assert!(matches!(
            digest_reader(Cursor::new(b"abc"), config),
            Err(EtagError::InvalidUsage { .. })
        ));
    }
}
