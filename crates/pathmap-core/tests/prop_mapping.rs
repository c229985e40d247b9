//! Property-based tests for the mapping engine
//!
//! These tests verify invariants that should hold for all inputs: values
//! survive a trip through renamed and remapped fields, and the document
//! layer reads back what it writes.


use pathmap_core::document::escape_key;
use pathmap_core::{marshal, unmarshal, Document, Mapper, MapperConfig, NumericMode};
use proptest::prelude::*;
use serde_json::{json, Value};
use test_support::{MappedRecord, NonMapped};

// Strategy functions for property testing

/// Strategy for generating non-mapped records with finite floats
fn non_mapped_strategy() -> impl Strategy<Value = NonMapped> {
    (
        (any::<bool>(), "\\PC{0,40}", any::<i64>(), any::<i8>(), any::<i16>(), any::<i32>(), any::<i64>()),
        (any::<u64>(), any::<u8>(), any::<u16>(), any::<u32>(), any::<u64>()),
        (-1.0e6f32..1.0e6f32, -1.0e12f64..1.0e12f64),
    )
        .prop_map(
            |(
                (a_bool, a_string, an_int, an_int_8, an_int_16, an_int_32, an_int_64),
                (a_uint, a_uint_8, a_uint_16, a_uint_32, a_uint_64),
                (a_float_32, a_float_64),
            )| NonMapped {
                a_bool,
                a_string,
                an_int,
                an_int_8,
                an_int_16,
                an_int_32,
                an_int_64,
                a_uint,
                a_uint_8,
                a_uint_16,
                a_uint_32,
                a_uint_64,
                a_float_32,
                a_float_64,
            },
        )
}

/// Strategy for generating dotted paths of plain keys
fn key_path_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z_]{1,8}", 1..5)
}

/// Strategy for generating JSON leaf values
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip_through_mapped_record(source in non_mapped_strategy()) {
        let mut mapped = MappedRecord::default();
        unmarshal(&marshal(&source).unwrap(), &mut mapped).unwrap();

        let mut back = NonMapped::default();
        unmarshal(&marshal(&mapped).unwrap(), &mut back).unwrap();

        prop_assert_eq!(back, source);
    }

    #[test]
    fn prop_checked_mode_accepts_in_range_values(source in non_mapped_strategy()) {
        let mapper = Mapper::with_config(MapperConfig {
            numeric: NumericMode::Checked,
            ..MapperConfig::default()
        });
        let mut mapped = MappedRecord::default();
        mapper.convert(&source, &mut mapped).unwrap();
        prop_assert_eq!(mapped.some_other_int_8, source.an_int_8);
        prop_assert_eq!(mapped.some_other_uint_64, source.a_uint_64);
    }

    #[test]
    fn prop_sequence_preserves_order(sources in prop::collection::vec(non_mapped_strategy(), 0..6)) {
        let mut mapped: Vec<Box<MappedRecord>> = Vec::new();
        unmarshal(&marshal(&sources).unwrap(), &mut mapped).unwrap();

        prop_assert_eq!(mapped.len(), sources.len());
        for (source, target) in sources.iter().zip(&mapped) {
            prop_assert_eq!(&target.some_other_string, &source.a_string);
            prop_assert_eq!(target.some_other_int_64, source.an_int_64);
        }
    }

    #[test]
    fn prop_document_set_then_get(keys in key_path_strategy(), leaf in leaf_strategy()) {
        let path = keys.iter().map(|k| escape_key(k)).collect::<Vec<_>>().join(".");
        let mut doc = Document::from_value(json!({}));
        doc.set(&path, leaf.clone()).unwrap();

        let lookup = doc.get(&path).unwrap();
        prop_assert_eq!(lookup.value(), Some(&leaf));
    }

    #[test]
    fn prop_delete_removes_value(keys in key_path_strategy(), leaf in leaf_strategy()) {
        let path = keys.join(".");
        let mut doc = Document::from_value(json!({}));
        doc.set(&path, leaf).unwrap();
        doc.delete(&path).unwrap();
        prop_assert!(!doc.get(&path).unwrap().exists());
    }

    #[test]
    fn prop_path_parse_never_panics(input in "\\PC{0,30}") {
        let _ = pathmap_core::Path::parse(&input);
    }
}
