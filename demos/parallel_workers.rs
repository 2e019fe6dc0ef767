//! Parallel block hashing with an external scheduler.
//!
//! Hands blocks to worker threads with `next_block()`, lets them finish in
//! any order, and commits them back; the engine merges in stream order.
//!
//! Run with:
//!     cargo run --example parallel_workers

use std::sync::mpsc;
use std::thread;

use etagrs::{BLOCK_SIZE, Engine, EtagConfig, digest_bytes, digest_parallel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = (0..6 * BLOCK_SIZE + 1000)
        .map(|i| (i * 7 + 3) as u8)
        .collect();
    let workers = 4;

    let mut engine = Engine::new(EtagConfig::new(workers))?;
    let mut offset = 0;

    while offset < data.len() {
        // Hand out one window of blocks
        let (tx, rx) = mpsc::channel();
        thread::scope(|s| -> Result<(), etagrs::EtagError> {
            for _ in 0..workers {
                if offset == data.len() {
                    break;
                }
                let mut ticket = engine.next_block()?;
                let end = data.len().min(offset + ticket.remaining());
                let piece = &data[offset..end];
                offset = end;

                let tx = tx.clone();
                s.spawn(move || {
                    let result = ticket.update(piece).and_then(|_| ticket.finish());
                    let _ = tx.send(result);
                });
            }
            Ok(())
        })?;
        drop(tx);

        // Commit in completion order
        for finished in rx {
            let finished = finished?;
            println!(
                "block {} finished ({} bytes) {}",
                finished.sequence(),
                finished.len(),
                finished.digest()
            );
            engine.commit_block(finished)?;
        }
    }

    let etag = engine.finalize()?;
    println!("\nEtag (workers):  {:?}", etag.as_ref().map(|e| e.as_str()));
    println!(
        "Etag (rayon):    {:?}",
        digest_parallel(data.clone(), EtagConfig::new(workers))?.map(|e| e.into_string())
    );
    println!(
        "Etag (sequential): {:?}",
        digest_bytes(&data)?.map(|e| e.into_string())
    );

    Ok(())
}
