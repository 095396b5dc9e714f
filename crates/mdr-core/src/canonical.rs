//! # Canonical Serialization
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used in
//! digest computation across the MDR Stack. Ledger event hashes are only
//! tamper-evident if two logically equal record snapshots always produce
//! byte-identical serializations, regardless of key insertion order or the
//! process that produced them.
//!
//! ## Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which applies the
//! coercion rules below before RFC 8785 (JCS) serialization. Any function
//! that hashes a snapshot must accept `&CanonicalBytes`, so no code path
//! can hash a non-canonical serialization.
//!
//! ## Coercion Rules
//!
//! 1. **Reject non-integer floats.** Float serialization has
//!    platform-dependent edge cases; fractional quantities are carried as
//!    strings in record fields.
//! 2. **Normalize absent values to `null`.** `Option::None` and explicit
//!    JSON `null` serialize identically.
//! 3. **Sort object keys lexicographically at every level**; arrays keep
//!    their order (`serde_jcs`).
//! 4. **Datetimes** enter as strings produced by [`crate::Timestamp`],
//!    which pins UTC, `Z` suffix, and whole-second precision at the type
//!    level.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization of a coerced JSON
/// value tree.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numeric values are integers; floats are rejected.
/// - All object keys are strings, sorted lexicographically in the output.
/// - Serialization is compact (no whitespace) per RFC 8785.
///
/// The inner `Vec<u8>` is private, so downstream code cannot construct a
/// value that skipped the coercion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// a non-integer number, or `CanonicalizationError::SerializationFailed`
    /// if JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_json_value(value)?;
        let bytes = serialize_canonical(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The canonical serialization as a UTF-8 string.
    ///
    /// Canonical bytes are always valid UTF-8 (they are compact JSON), so
    /// this conversion is lossless.
    pub fn as_str(&self) -> &str {
        // serde_jcs emits UTF-8 JSON text.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively coerce JSON values according to the canonicalization rules.
///
/// `null`, `bool`, `string`, and integer values pass through unchanged.
/// Non-integer numbers are rejected. Objects and arrays are recursed.
/// Absent optional fields have already become `Value::Null` at the serde
/// boundary, which is exactly the normalization the ledger requires.
fn coerce_json_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785): sorted keys,
/// compact separators, UTF-8 output.
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_keys() {
        let data = serde_json::json!({"status": "DRAFT", "id": "x", "tenant": "acme"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_str(), r#"{"id":"x","status":"DRAFT","tenant":"acme"}"#);
    }

    #[test]
    fn test_key_order_independence() {
        let a = serde_json::json!({"a": 1, "b": 2});
        let b = serde_json::json!({"b": 2, "a": 1});
        assert_eq!(
            CanonicalBytes::new(&a).unwrap(),
            CanonicalBytes::new(&b).unwrap()
        );
    }

    #[test]
    fn test_nested_objects_sorted() {
        let data = serde_json::json!({
            "fields": {"risk_class": "IIa", "legal_name": "Acme"},
            "refs": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            cb.as_str(),
            r#"{"fields":{"legal_name":"Acme","risk_class":"IIa"},"refs":[3,2,1]}"#
        );
    }

    #[test]
    fn test_idempotent() {
        // Canonicalizing the parse of a canonical string reproduces it.
        let data = serde_json::json!({"b": {"y": null, "x": [1, 2]}, "a": true});
        let once = CanonicalBytes::new(&data).unwrap();
        let reparsed: Value = serde_json::from_slice(once.as_bytes()).unwrap();
        let twice = CanonicalBytes::new(&reparsed).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_null_passthrough() {
        let data = serde_json::json!({"last_validated_at": null});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"last_validated_at":null}"#);
    }

    #[test]
    fn test_absent_option_serializes_as_null() {
        #[derive(serde::Serialize)]
        struct Snap {
            exported_at: Option<String>,
        }
        let cb = CanonicalBytes::new(&Snap { exported_at: None }).unwrap();
        assert_eq!(cb.as_str(), r#"{"exported_at":null}"#);
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"quantity": 1.5});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 1.5),
            other => panic!("expected FloatRejected, got: {other:?}"),
        }
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": {"b": [{"c": 3.14}]}});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_integers_accepted() {
        let data = serde_json::json!({"sequence": 42, "offset": -7});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"offset":-7,"sequence":42}"#);
    }

    #[test]
    fn test_empty_object_and_array() {
        assert_eq!(CanonicalBytes::new(&serde_json::json!({})).unwrap().as_bytes(), b"{}");
        assert_eq!(CanonicalBytes::new(&serde_json::json!([])).unwrap().as_bytes(), b"[]");
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"legal_name": "Gesellschaft f\u{00fc}r Medizintechnik"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(cb.as_str().contains('\u{00fc}'));
    }

    #[test]
    fn test_len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        assert!(!cb.is_empty());
        assert!(cb.len() > 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for JSON-compatible values without floats, mirroring the
    /// restricted domain of the coercion pipeline.
    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,50}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,10}", inner, 0..8).prop_map(|m| {
                    let map: serde_json::Map<String, Value> = m.into_iter().collect();
                    Value::Object(map)
                }),
            ]
        })
    }

    proptest! {
        /// Canonicalization never panics for float-free values.
        #[test]
        fn canonical_bytes_never_panics(value in json_value_no_floats()) {
            prop_assert!(CanonicalBytes::new(&value).is_ok());
        }

        /// Same input always produces the same bytes.
        #[test]
        fn canonical_bytes_deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Canonicalizing a reparsed canonical output is a fixed point.
        #[test]
        fn canonical_bytes_idempotent(value in json_value_no_floats()) {
            let once = CanonicalBytes::new(&value).unwrap();
            let reparsed: Value = serde_json::from_slice(once.as_bytes()).unwrap();
            let twice = CanonicalBytes::new(&reparsed).unwrap();
            prop_assert_eq!(once.as_bytes(), twice.as_bytes());
        }

        /// Object keys are sorted lexicographically in canonical output.
        #[test]
        fn canonical_bytes_sorted_keys(
            keys in prop::collection::btree_set("[a-z]{1,8}", 2..6)
        ) {
            let map: serde_json::Map<String, Value> = keys.iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), serde_json::json!(i)))
                .collect();
            let cb = CanonicalBytes::new(&Value::Object(map)).unwrap();
            let parsed: serde_json::Map<String, Value> =
                serde_json::from_slice(cb.as_bytes()).unwrap();
            let output_keys: Vec<&String> = parsed.keys().collect();
            let mut sorted = output_keys.clone();
            sorted.sort();
            prop_assert_eq!(output_keys, sorted);
        }

        /// Any value containing a non-integer float is rejected.
        #[test]
        fn float_always_rejected(f in any::<f64>().prop_filter("not integer", |f| {
            f.fract() != 0.0 && f.is_finite()
        })) {
            let rejected = CanonicalBytes::new(&serde_json::json!({"v": f})).is_err();
            prop_assert!(rejected);
        }
    }
}
