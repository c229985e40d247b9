//! Fuzzing target for field annotations
//!
//! Arbitrary struct-tag literals must either produce directives or an
//! annotation error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pathmap_core::{directives, FieldKind, FieldTable, TagVocabulary};

fuzz_target!(|data: &[u8]| {
    let literal = String::from_utf8_lossy(data);
    let table = FieldTable::new()
        .field_of("first", FieldKind::String, literal.as_ref())
        .field_of("second", FieldKind::U16.optional(), literal.as_ref());
    let _ = directives(&table, &TagVocabulary::default());
});
