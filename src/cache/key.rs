//! Deterministic cache-key derivation
//!
//! Keys are derived from a prefix plus a JSON projection of the input:
//! the value is recursively canonicalized (object keys sorted, array order
//! preserved), serialized, and digested with SHA-256. Two semantically
//! equal inputs always map to the same key regardless of object-key
//! insertion order; two different inputs collide only with cryptographic
//! improbability. A depth limit bounds pathological nesting with a
//! sentinel instead of recursing without end.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Nesting depth beyond which canonicalization stops descending.
const MAX_DEPTH: usize = 64;

/// Sentinel serialized in place of values past the depth limit.
const DEPTH_SENTINEL: &str = "<max-depth>";

/// Derive a cache key for `data` under `prefix`.
///
/// The key has the shape `{prefix}_{sha256 hex}_{type tag}`; the coarse
/// type tag keeps keys for, say, a string and an object visibly distinct
/// even before comparing digests.
pub fn generate_key(prefix: &str, data: &Value) -> String {
    let canonical = canonicalize(data, 0);
    let serialized = canonical.to_string();

    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(serialized.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }

    format!("{}_{}_{}", prefix, hex, type_tag(data))
}

/// Key for a whole-result cache entry: the digest of the raw input text.
pub fn text_digest_key(prefix: &str, text: &str) -> String {
    generate_key(prefix, &Value::String(text.to_string()))
}

fn canonicalize(value: &Value, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::String(DEPTH_SENTINEL.to_string());
    }
    match value {
        Value::Object(map) => {
            // serde_json's map iterates in sorted key order already; the
            // explicit rebuild keeps that guarantee independent of the
            // map's backing implementation.
            let mut sorted: Vec<(&String, &Value)> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, inner) in sorted {
                out.insert(key.clone(), canonicalize(inner, depth + 1));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| canonicalize(item, depth + 1))
                .collect(),
        ),
        primitive => primitive.clone(),
    }
}

fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
