//! Fuzzing target for document writes and reads
//!
//! The first line of the input is a path, the rest a JSON document. Writes
//! that succeed must be readable at the same path.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pathmap_core::Document;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let (path, body) = input.split_once('\n').unwrap_or((input, "{}"));

    let Ok(mut doc) = Document::from_slice(body.as_bytes()) else {
        return;
    };

    let _ = doc.get(path).map(|lookup| lookup.string_view());

    if doc.set(path, json!("fuzz")).is_ok() {
        if let Ok(path) = pathmap_core::Path::parse(path) {
            let appends = path.segments().iter().any(|seg| {
                matches!(seg, pathmap_core::document::Segment::Key(key) if key.is_append())
            });
            if !appends {
                assert!(doc.get_path(&path).exists());
            }
        }
    }

    let _ = doc.delete(path);
    let _ = doc.to_vec();
});
