#![no_main]

use etagrs::{Engine, Etag, digest_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, Vec<u16>, u8)| {
    let (data, cuts, concurrency) = input;
    let expected = digest_bytes(&data).unwrap();

    // Feed the same bytes split at arbitrary points.
    let mut engine = Engine::with_concurrency(concurrency as usize).unwrap();
    let mut rest = &data[..];
    for cut in cuts {
        let n = (cut as usize).min(rest.len());
        engine.update(&rest[..n]).unwrap();
        rest = &rest[n..];
    }
    engine.update(rest).unwrap();

    let etag = engine.finalize().unwrap();
    assert_eq!(etag, expected);

    // Verify: empty input is the only input without an etag
    assert_eq!(etag.is_none(), data.is_empty());

    if let Some(etag) = etag {
        assert_eq!(etag.as_str().len(), 28);
        let parsed: Etag = etag.as_str().parse().unwrap();
        assert_eq!(parsed, etag);
    }
});
