//! Basic streaming etag example.
//!
//! Run with:
//!     cargo run --example etag_basic

use etagrs::{Engine, EtagConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 9 MiB of sample data: two full blocks and a short trailing block
    let data: Vec<u8> = (0..9 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let mut engine = Engine::new(EtagConfig::default())?;

    println!("Hashing {} bytes...\n", data.len());

    // Simulate streaming data in batches
    let batch_size = 8 * 1024; // 8 KB batches
    for batch in data.chunks(batch_size) {
        engine.update(batch)?;
    }

    println!("Blocks committed before finalize: {}", engine.block_count());

    match engine.finalize()? {
        Some(etag) => {
            println!("Blocks total: {}", engine.block_count());
            println!("Kind: {:?}", etag.kind());
            println!("Etag: {}", etag);
        }
        None => println!("Empty input has no etag"),
    }

    Ok(())
}
