//! Block: the atomic, hash-addressed unit of the ledger.
//!
//! A block is stamped exactly once with its chain position and digest.
//! Once sealed it is never edited; the validator only ever recomputes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{decode_body, digest_preimage, encode_body};
use crate::error::DecodeError;
use crate::types::BlockHash;

/// Sentinel data carried by the height-0 block. Fixed, and distinguishable
/// from any claim body by the body's kind tag.
pub const GENESIS_SENTINEL: &str = "Genesis Block";

/// The logical content of a block body, before canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    /// The fixed genesis sentinel.
    Genesis(String),
    /// An owner claim admitted after an ownership proof succeeded.
    Claim(ClaimBody),
}

/// The decoded owner/claim view of a non-genesis body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBody {
    /// The wallet address that proved ownership.
    pub owner: String,
    /// The wallet signature presented at submission (base64).
    pub signature: String,
    /// Opaque caller-supplied claim data.
    pub star: Bytes,
}

impl BlockBody {
    /// The genesis sentinel body.
    pub fn genesis() -> Self {
        BlockBody::Genesis(GENESIS_SENTINEL.to_string())
    }

    /// A claim body.
    pub fn claim(
        owner: impl Into<String>,
        signature: impl Into<String>,
        star: impl Into<Bytes>,
    ) -> Self {
        BlockBody::Claim(ClaimBody {
            owner: owner.into(),
            signature: signature.into(),
            star: star.into(),
        })
    }

    /// Encode to canonical CBOR bytes.
    pub fn encode(&self) -> Bytes {
        encode_body(self).into()
    }
}

/// One immutable, hash-addressed entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the ledger; 0 is reserved for genesis.
    pub height: u64,

    /// Seconds since epoch, stamped by the ledger at insertion.
    pub timestamp: i64,

    /// Hash of the preceding block; `None` only at height 0.
    pub previous_hash: Option<BlockHash>,

    /// SHA-256 over canonical content, excluding this field itself.
    /// Computed once at insertion and never mutated.
    pub hash: BlockHash,

    /// Canonical CBOR encoding of the body.
    pub body: Bytes,
}

impl Block {
    /// Stamp a body with its chain position and compute the digest.
    ///
    /// This is the only constructor. The digest covers height, timestamp,
    /// previous_hash, and the encoded body bytes.
    pub fn seal(
        body: BlockBody,
        height: u64,
        timestamp: i64,
        previous_hash: Option<BlockHash>,
    ) -> Self {
        let body = body.encode();
        let hash = BlockHash::digest(&digest_preimage(
            height,
            timestamp,
            previous_hash.as_ref(),
            &body,
        ));
        Self {
            height,
            timestamp,
            previous_hash,
            hash,
            body,
        }
    }

    /// Recompute the digest over current content, excluding the stored
    /// hash. Used by the validator; never mutates the block.
    pub fn recompute_hash(&self) -> BlockHash {
        BlockHash::digest(&digest_preimage(
            self.height,
            self.timestamp,
            self.previous_hash.as_ref(),
            &self.body,
        ))
    }

    /// Decode the stored body as an owner claim.
    ///
    /// Fails with [`DecodeError::NotAClaim`] for the genesis block, whose
    /// sentinel body is not owner/claim-shaped.
    pub fn decode_body(&self) -> Result<ClaimBody, DecodeError> {
        match decode_body(&self.body)? {
            BlockBody::Genesis(_) => Err(DecodeError::NotAClaim),
            BlockBody::Claim(claim) => Ok(claim),
        }
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash.is_none()
    }
}
