//! Chain validation: per-block digest and link checks.
//!
//! The validator is read-only and side-effect-free. It is both a
//! standalone diagnostic and the precondition the engine runs before
//! every insertion.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::types::BlockHash;

/// A reported inconsistency at one height.
///
/// `linked` and `hash_ok` are computed independently, so one fault can
/// report both a broken link and a broken self-digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFault {
    /// Height of the faulty block.
    pub height: u64,
    /// The stored (possibly stale) hash of the faulty block.
    pub hash: BlockHash,
    /// Whether previous_hash matches the predecessor's stored hash.
    /// Always true at height 0.
    pub linked: bool,
    /// Whether the stored hash matches the recomputed digest.
    pub hash_ok: bool,
}

/// Walk the chain in order and report every block whose self-digest or
/// link to its predecessor fails.
///
/// Returns the empty vector iff the chain is fully consistent.
pub fn validate_chain(chain: &[Block]) -> Vec<ValidationFault> {
    let mut faults = Vec::new();

    for (i, block) in chain.iter().enumerate() {
        let linked = if i == 0 {
            true
        } else {
            block.previous_hash == Some(chain[i - 1].hash)
        };
        let hash_ok = block.recompute_hash() == block.hash;

        if !linked || !hash_ok {
            faults.push(ValidationFault {
                height: block.height,
                hash: block.hash,
                linked,
                hash_ok,
            });
        }
    }

    faults
}
