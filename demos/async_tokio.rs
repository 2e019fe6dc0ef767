//! Async etag example using tokio.
//!
//! Hashes several in-memory streams concurrently through the
//! runtime-agnostic `digest_async`, and a file through `tokio_util::compat`.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- /path/to/file

use etagrs::{EtagConfig, digest_async};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create multiple data streams
    let streams: Vec<Vec<u8>> = vec![
        (0..50_000).map(|i| (i % 256) as u8).collect(),
        (0..5_000_000).map(|i| (i % 253) as u8).collect(),
        Vec::new(),
    ];

    println!("Processing {} streams concurrently...\n", streams.len());

    let handles: Vec<_> = streams
        .into_iter()
        .enumerate()
        .map(|(stream_id, data)| {
            tokio::spawn(async move {
                let reader: &[u8] = &data;
                let etag = digest_async(reader, EtagConfig::new(2))?.await?;
                Ok::<_, etagrs::EtagError>((stream_id, data.len(), etag))
            })
        })
        .collect();

    for handle in handles {
        let (stream_id, len, etag) = handle.await??;
        println!(
            "Stream {}: {} bytes, etag {:?}",
            stream_id,
            len,
            etag.map(|e| e.into_string())
        );
    }

    if let Some(path) = std::env::args().nth(1) {
        let file = tokio::fs::File::open(&path).await?;
        let etag = digest_async(file.compat(), EtagConfig::default())?.await?;
        println!("\n{}: {:?}", path, etag.map(|e| e.into_string()));
    }

    Ok(())
}
