#![no_main]

use libfuzzer_sys::fuzz_target;
use mxa_analyzer::image::{extract_tag_metadata, TiffFile, ViewSettings};

fuzz_target!(|data: &[u8]| {
    // Parsing either succeeds or fails gracefully; it should NEVER panic
    let Ok(tiff) = TiffFile::from_bytes(data.to_vec()) else {
        return;
    };

    let settings = ViewSettings::default();
    for (index, page) in tiff.pages().iter().enumerate().take(16) {
        let _ = extract_tag_metadata(page);
        if let Ok(buffer) = tiff.pixels(index) {
            if let Some(image) = settings.render(&buffer) {
                let _ = settings.zoomed(&image);
            }
        }
    }
});
