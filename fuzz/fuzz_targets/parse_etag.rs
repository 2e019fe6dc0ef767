#![no_main]

use etagrs::Etag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    // Anything that parses must re-encode to the same text.
    if let Ok(etag) = text.parse::<Etag>() {
        assert_eq!(Etag::new(etag.kind(), etag.hash()).as_str(), text);
    }
});
