//! crates/fa_io/src/hasher.rs
//!
//! SHA-256 digests and artifact ids.
//!
//! - `sha256_hex` hashes raw bytes (the input table as read from disk).
//! - `sha256_canonical` hashes the canonical JSON of a value.
//! - `ASG:<hex64>` and `RUN:<hex64>` ids are canonical hashes of the doc
//!   *without* its `id` field. Hex is lowercase.

#![forbid(unsafe_code)]

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical_json::{canonical_value_bytes, to_canonical_bytes};
use crate::IoError;

pub const ASG_PREFIX: &str = "ASG:";
pub const RUN_PREFIX: &str = "RUN:";

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> Result<String, IoError> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// Hash `doc` with any top-level `"id"` removed, then prefix.
fn id_without_self<T: Serialize + ?Sized>(prefix: &str, doc: &T) -> Result<String, IoError> {
    let mut v = serde_json::to_value(doc)?;
    if let Value::Object(map) = &mut v {
        map.remove("id");
    }
    let hex = sha256_hex(&canonical_value_bytes(&v)?);
    Ok(format!("{prefix}{hex}"))
}

/// `ASG:<hex64>` for an assignment document.
pub fn asg_id<T: Serialize + ?Sized>(doc: &T) -> Result<String, IoError> {
    id_without_self(ASG_PREFIX, doc)
}

/// `RUN:<hex64>` for a run record.
pub fn run_id<T: Serialize + ?Sized>(doc: &T) -> Result<String, IoError> {
    id_without_self(RUN_PREFIX, doc)
}

/// True for `<prefix><64 lowercase hex>`.
pub fn is_valid_id(prefix: &str, id: &str) -> bool {
    id.strip_prefix(prefix).is_some_and(|h| {
        h.len() == 64 && h.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_digest_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn canonical_digest_ignores_key_order() {
        #[derive(Serialize)]
        struct Row {
            player: &'static str,
            faction: &'static str,
        }
        let a = sha256_canonical(&Row { player: "Alice", faction: "Fremen" }).unwrap();
        let b = sha256_canonical(&json!({"faction": "Fremen", "player": "Alice"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ids_skip_their_own_field() {
        let bare = json!({"assignments": [], "leftover": ["Emperor"]});
        let with_id = json!({"id": "ASG:old", "assignments": [], "leftover": ["Emperor"]});
        let id = asg_id(&bare).unwrap();
        assert_eq!(id, asg_id(&with_id).unwrap());
        assert!(is_valid_id(ASG_PREFIX, &id));
        assert!(!is_valid_id(RUN_PREFIX, &id));
        assert_ne!(id[4..], run_id(&json!({"x": 1})).unwrap()[4..]);
    }
}
