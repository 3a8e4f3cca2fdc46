//! Property-based tests for the parse/serialize round trip.
//!
//! Trees are generated directly as [`TonValue`]s, serialized in both
//! presets, and re-parsed; equality is the crate's semantic equality
//! (integer bases and enum spellings are style, not meaning).

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use ton_format::{
    parse, serialize_with_options, EnumValue, IntegerBase, SerializeOptions, TonDocument,
    TonObject, TonValue,
};
use uuid::Uuid;

fn arb_scalar() -> impl Strategy<Value = TonValue> {
    prop_oneof![
        any::<String>().prop_map(TonValue::from),
        any::<i64>().prop_map(TonValue::from),
        // Hex and binary spellings; i64::MIN has no positive magnitude
        // so it stays decimal-only.
        (any::<i32>()).prop_map(|n| TonValue::integer(n as i64, IntegerBase::Hex)),
        (any::<i32>()).prop_map(|n| TonValue::integer(n as i64, IntegerBase::Binary)),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(TonValue::Float),
        any::<bool>().prop_map(TonValue::from),
        Just(TonValue::Null),
        Just(TonValue::Undefined),
        any::<u128>().prop_map(|n| TonValue::Guid(Uuid::from_u128(n))),
        (0i64..4_102_444_800).prop_map(|secs| {
            TonValue::Date(Utc.timestamp_opt(secs, 0).unwrap())
        }),
        "[a-z][a-z0-9]{0,7}".prop_map(|name| TonValue::Enum(EnumValue::new(name))),
        // A one-element set would re-parse as a single enum, so sets are
        // empty or hold at least two members.
        prop_oneof![
            Just(Vec::new()),
            prop::collection::vec("[a-z][a-z0-9]{0,7}", 2..4),
        ]
        .prop_map(TonValue::EnumSet),
    ]
}

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,10}",
        // Arbitrary keys exercise the quoting policy.
        any::<String>(),
    ]
}

fn arb_value() -> impl Strategy<Value = TonValue> {
    arb_scalar().prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(TonValue::Array),
            (
                prop::collection::vec((arb_key(), inner), 0..6),
                proptest::option::of("[A-Z][a-z]{0,6}"),
            )
                .prop_map(|(entries, class_name)| {
                    let mut object = TonObject::new();
                    object.set_class_name(class_name);
                    for (key, value) in entries {
                        object.set(key, value);
                    }
                    TonValue::Object(object)
                }),
        ]
    })
}

fn round_trips(value: &TonValue, options: &SerializeOptions) -> bool {
    let doc = TonDocument::new(value.clone());
    let text = match serialize_with_options(&doc, options) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("serialize failed: {}", e);
            return false;
        }
    };
    match parse(&text) {
        Ok(reparsed) => {
            let equal = reparsed.root() == value;
            if !equal {
                eprintln!("mismatch\n  input: {:?}\n  text: {}\n  output: {:?}", value, text, reparsed.root());
            }
            equal
        }
        Err(e) => {
            eprintln!("reparse failed: {}\n  text: {}", e, text);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_pretty_round_trip(value in arb_value()) {
        prop_assert!(round_trips(&value, &SerializeOptions::pretty()));
    }

    #[test]
    fn prop_compact_round_trip_without_omission(value in arb_value()) {
        // Compact layout, but with nothing omitted so equality holds.
        let options = SerializeOptions::compact()
            .with_omit_nulls(false)
            .with_omit_undefined(false);
        prop_assert!(round_trips(&value, &options));
    }

    #[test]
    fn prop_serialization_is_idempotent(value in arb_value()) {
        let doc = TonDocument::new(value);
        for options in [SerializeOptions::pretty(), SerializeOptions::compact()] {
            let once = serialize_with_options(&doc, &options).unwrap();
            let reparsed = parse(&once).unwrap();
            let twice = serialize_with_options(&reparsed, &options).unwrap();
            prop_assert_eq!(&once, &twice);
        }
    }

    #[test]
    fn prop_scalar_documents(value in arb_scalar()) {
        prop_assert!(round_trips(&value, &SerializeOptions::pretty()));
    }
}
