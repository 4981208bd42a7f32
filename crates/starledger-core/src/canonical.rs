//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 seconds)
//!
//! Two things get canonicalized here: the block body (so the same logical
//! claim always produces the same stored bytes) and the digest preimage
//! (height, timestamp, previous_hash, encoded body). The stored hash field
//! is never part of the preimage. The body is digested as its encoded
//! bytes, so the digest can never depend on field serialization order.

use ciborium::value::Value;

use crate::block::{BlockBody, ClaimBody};
use crate::error::DecodeError;
use crate::types::BlockHash;

/// Body field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod body_keys {
    pub const KIND: u64 = 0;
    pub const SENTINEL: u64 = 1; // genesis only
    pub const OWNER: u64 = 1; // claim only
    pub const SIGNATURE: u64 = 2;
    pub const STAR: u64 = 3;
}

/// Digest preimage field keys.
mod preimage_keys {
    pub const HEIGHT: u64 = 0;
    pub const TIMESTAMP: u64 = 1;
    pub const PREVIOUS_HASH: u64 = 2;
    pub const BODY: u64 = 3;
}

/// Body kind discriminants.
mod kinds {
    pub const GENESIS: u64 = 0;
    pub const CLAIM: u64 = 1;
}

/// Encode a block body to canonical CBOR bytes.
pub fn encode_body(body: &BlockBody) -> Vec<u8> {
    let value = body_to_cbor_value(body);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Decode a block body from its canonical bytes.
pub fn decode_body(bytes: &[u8]) -> Result<BlockBody, DecodeError> {
    let cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(cursor).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    cbor_value_to_body(&value)
}

/// Encode the digest preimage: every block field except the stored hash.
pub fn digest_preimage(
    height: u64,
    timestamp: i64,
    previous_hash: Option<&BlockHash>,
    body: &[u8],
) -> Vec<u8> {
    let prev_value = match previous_hash {
        Some(hash) => Value::Bytes(hash.0.to_vec()),
        None => Value::Null,
    };

    let entries = vec![
        (
            Value::Integer(preimage_keys::HEIGHT.into()),
            Value::Integer(height.into()),
        ),
        (
            Value::Integer(preimage_keys::TIMESTAMP.into()),
            Value::Integer(timestamp.into()),
        ),
        (Value::Integer(preimage_keys::PREVIOUS_HASH.into()), prev_value),
        (
            Value::Integer(preimage_keys::BODY.into()),
            Value::Bytes(body.to_vec()),
        ),
    ];

    let mut buf = Vec::new();
    encode_value_to(&mut buf, &Value::Map(entries));
    buf
}

/// Convert a body to a CBOR Value (map with integer keys).
fn body_to_cbor_value(body: &BlockBody) -> Value {
    let entries = match body {
        BlockBody::Genesis(sentinel) => vec![
            (
                Value::Integer(body_keys::KIND.into()),
                Value::Integer(kinds::GENESIS.into()),
            ),
            (
                Value::Integer(body_keys::SENTINEL.into()),
                Value::Text(sentinel.clone()),
            ),
        ],
        BlockBody::Claim(claim) => vec![
            (
                Value::Integer(body_keys::KIND.into()),
                Value::Integer(kinds::CLAIM.into()),
            ),
            (
                Value::Integer(body_keys::OWNER.into()),
                Value::Text(claim.owner.clone()),
            ),
            (
                Value::Integer(body_keys::SIGNATURE.into()),
                Value::Text(claim.signature.clone()),
            ),
            (
                Value::Integer(body_keys::STAR.into()),
                Value::Bytes(claim.star.to_vec()),
            ),
        ],
    };
    Value::Map(entries)
}

/// Convert a CBOR Value (map) back to a block body.
fn cbor_value_to_body(value: &Value) -> Result<BlockBody, DecodeError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(DecodeError::Malformed("expected map".into())),
    };

    // Helper to get a value by integer key
    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
    };

    let kind = match get(body_keys::KIND) {
        Some(Value::Integer(i)) => i128::from(*i),
        _ => return Err(DecodeError::Malformed("missing kind".into())),
    };

    match kind as u64 {
        kinds::GENESIS => {
            let sentinel = match get(body_keys::SENTINEL) {
                Some(Value::Text(s)) => s.clone(),
                _ => return Err(DecodeError::Malformed("invalid genesis sentinel".into())),
            };
            Ok(BlockBody::Genesis(sentinel))
        }
        kinds::CLAIM => {
            let owner = match get(body_keys::OWNER) {
                Some(Value::Text(s)) => s.clone(),
                _ => return Err(DecodeError::Malformed("invalid owner".into())),
            };
            let signature = match get(body_keys::SIGNATURE) {
                Some(Value::Text(s)) => s.clone(),
                _ => return Err(DecodeError::Malformed("invalid signature".into())),
            };
            let star = match get(body_keys::STAR) {
                Some(Value::Bytes(b)) => b.clone().into(),
                _ => return Err(DecodeError::Malformed("invalid star payload".into())),
            };
            Ok(BlockBody::Claim(ClaimBody {
                owner,
                signature,
                star,
            }))
        }
        other => Err(DecodeError::Malformed(format!("invalid kind: {}", other))),
    }
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            encode_integer(buf, *i);
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        Value::Null => {
            buf.push(0xf6);
        }
        _ => {
            panic!("unsupported CBOR value type in canonical encoding");
        }
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        // Major type 0: unsigned integer
        encode_uint(buf, 0, n as u64);
    } else {
        // Major type 1: negative integer
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);

    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn claim_body(owner: &str, star: &[u8]) -> BlockBody {
        BlockBody::Claim(ClaimBody {
            owner: owner.to_string(),
            signature: "c2lnbmF0dXJl".to_string(),
            star: star.to_vec().into(),
        })
    }

    #[test]
    fn test_body_encoding_deterministic() {
        let body = claim_body("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", b"Orion");
        assert_eq!(encode_body(&body), encode_body(&body));
    }

    #[test]
    fn test_body_roundtrip_claim() {
        let body = claim_body("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", b"Orion");
        let bytes = encode_body(&body);
        let decoded = decode_body(&bytes).unwrap();
        assert_eq!(body, decoded);
    }

    #[test]
    fn test_body_roundtrip_genesis() {
        let body = BlockBody::genesis();
        let bytes = encode_body(&body);
        let decoded = decode_body(&bytes).unwrap();
        assert_eq!(body, decoded);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_body(&[0xff, 0x00, 0x13]),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let entries = vec![(Value::Integer(0.into()), Value::Integer(9.into()))];
        let mut buf = Vec::new();
        encode_value_to(&mut buf, &Value::Map(entries));
        assert!(matches!(decode_body(&buf), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_preimage_excludes_nothing_but_hash() {
        // Any field change must change the preimage.
        let body = encode_body(&claim_body("addr", b"star"));
        let base = digest_preimage(1, 1_700_000_000, Some(&BlockHash::ZERO), &body);

        assert_ne!(
            base,
            digest_preimage(2, 1_700_000_000, Some(&BlockHash::ZERO), &body)
        );
        assert_ne!(
            base,
            digest_preimage(1, 1_700_000_001, Some(&BlockHash::ZERO), &body)
        );
        assert_ne!(
            base,
            digest_preimage(1, 1_700_000_000, Some(&BlockHash::from_bytes([1; 32])), &body)
        );
        assert_ne!(base, digest_preimage(1, 1_700_000_000, None, &body));
        assert_ne!(
            base,
            digest_preimage(1, 1_700_000_000, Some(&BlockHash::ZERO), b"other")
        );
    }

    #[test]
    fn test_integer_encoding() {
        // Smallest encoding for various integer sizes
        let mut buf = Vec::new();

        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);
    }

    #[test]
    fn test_map_key_ordering() {
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Integer(3.into()), Value::Integer(30.into())),
            (Value::Integer(0.into()), Value::Integer(0.into())),
            (Value::Integer(2.into()), Value::Integer(20.into())),
        ];
        encode_map_canonical(&mut buf, &entries);

        // Map header (3 entries), then keys in order 0, 2, 3
        assert_eq!(buf[0], 0xa3);
        assert_eq!(buf[1], 0x00);
        assert_eq!(buf[3], 0x02);
        assert_eq!(buf[5], 0x03);
    }

    proptest! {
        #[test]
        fn prop_claim_body_roundtrip(
            owner in "[a-zA-Z0-9]{1,40}",
            signature in "[a-zA-Z0-9+/=]{0,96}",
            star in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let body = BlockBody::Claim(ClaimBody {
                owner,
                signature,
                star: star.into(),
            });
            let bytes = encode_body(&body);
            prop_assert_eq!(decode_body(&bytes).unwrap(), body);
        }

        #[test]
        fn prop_preimage_deterministic(
            height in 0u64..1_000_000,
            timestamp in 0i64..4_000_000_000,
            body in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            let p1 = digest_preimage(height, timestamp, None, &body);
            let p2 = digest_preimage(height, timestamp, None, &body);
            prop_assert_eq!(p1, p2);
        }
    }
}
