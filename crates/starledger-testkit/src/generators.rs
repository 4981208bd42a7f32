//! Proptest strategies for ledger data.

use bytes::Bytes;
use proptest::prelude::*;

use starledger_core::{BlockBody, ClaimBody};

/// Arbitrary opaque star payloads (0..=512 bytes).
pub fn arb_star() -> impl Strategy<Value = Bytes> {
    proptest::collection::vec(any::<u8>(), 0..=512).prop_map(Bytes::from)
}

/// Address-shaped base58 strings. Not real addresses, but enough to
/// exercise body encoding and owner filtering.
pub fn arb_address() -> impl Strategy<Value = String> {
    "[1mn][1-9A-HJ-NP-Za-km-z]{25,34}"
}

/// Arbitrary claim bodies.
pub fn arb_claim_body() -> impl Strategy<Value = BlockBody> {
    (arb_address(), "[a-zA-Z0-9+/]{0,88}", arb_star()).prop_map(|(owner, signature, star)| {
        BlockBody::Claim(ClaimBody {
            owner,
            signature,
            star,
        })
    })
}
