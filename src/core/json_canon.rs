//! Canonical JSON encoding and document digests.
//!
//! Canonical rules:
//! - object keys sorted by UTF-8 byte order, recursively
//! - no insignificant whitespace
//!
//! Non-finite floats cannot occur here: every value this crate
//! canonicalizes was itself decoded from JSON.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::document::Document;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CanonJsonError {
    #[error("json encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a value to canonical JSON bytes.
pub fn to_canon_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonJsonError> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&canon_value(value))?)
}

fn canon_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut canon = Map::new();
            for (key, value) in entries {
                canon.insert(key, canon_value(value));
            }
            Value::Object(canon)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canon_value).collect()),
        other => other,
    }
}

/// SHA-256 over a document's canonical JSON bytes.
///
/// Two documents digest equal iff they are the same document up to object
/// key order. Backs the determinism and settledness checks.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocDigest([u8; 32]);

impl DocDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for DocDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocDigest({})", self.to_hex())
    }
}

impl fmt::Display for DocDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn digest_document(doc: &Document) -> Result<DocDigest, CanonJsonError> {
    let bytes = to_canon_json_bytes(doc)?;
    let mut h = Sha256::new();
    h.update(&bytes);
    Ok(DocDigest(h.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canon_json_sorts_keys_recursively() {
        let value = json!({
            "b": 1,
            "a": { "d": 4, "c": 3 },
            "aa": [ { "z": 1, "y": 2 } ]
        });

        let bytes = to_canon_json_bytes(&value).unwrap();
        let expected = br#"{"a":{"c":3,"d":4},"aa":[{"y":2,"z":1}],"b":1}"#;
        assert_eq!(bytes, expected);
    }

    #[test]
    fn digest_ignores_key_order() {
        let a = Document::from_value(json!({
            "root": { "props": { "x": 1, "y": 2 } }
        }))
        .unwrap();
        let b = Document::from_value(json!({
            "root": { "props": { "y": 2, "x": 1 } }
        }))
        .unwrap();

        assert_eq!(
            digest_document(&a).unwrap(),
            digest_document(&b).unwrap()
        );
    }

    #[test]
    fn digest_distinguishes_values() {
        let a = Document::from_value(json!({ "root": { "props": { "x": 1 } } })).unwrap();
        let b = Document::from_value(json!({ "root": { "props": { "x": 2 } } })).unwrap();
        assert_ne!(
            digest_document(&a).unwrap(),
            digest_document(&b).unwrap()
        );
    }

    #[test]
    fn digest_hex_is_64_chars() {
        let doc = Document::default();
        assert_eq!(digest_document(&doc).unwrap().to_hex().len(), 64);
    }
}
