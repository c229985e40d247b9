//! Fuzzing target for path parsing
//!
//! The parser must return an error for malformed input rather than panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pathmap_core::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = Path::parse(input);
    }

    let lossy = String::from_utf8_lossy(data);
    let _ = Path::parse(&lossy);
});
