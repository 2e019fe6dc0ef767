//! File etag example.
//!
//! Run with:
//!     RUST_LOG=etagrs=debug cargo run --example etag_file -- /path/to/file

use std::env;

use etagrs::{EtagConfig, digest_file};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    let size = std::fs::metadata(&path)?.len();
    println!("File: {} ({} bytes)", path, size);

    // Larger reads for large files
    let config = EtagConfig::default().with_read_buffer_size(1024 * 1024);

    match digest_file(&path, config)? {
        Some(etag) => println!("Etag: {}", etag),
        None => println!("Empty file has no etag"),
    }

    Ok(())
}
