#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary description text must never panic; malformed XML becomes warnings
    let text = String::from_utf8_lossy(data);
    let md = mxa_analyzer::image::parse_property_block(&text);

    // Merging a block into itself keeps the id set unchanged
    let mut merged = md.clone();
    merged.merge(md.clone());
    assert_eq!(merged.len(), md.len());
});
