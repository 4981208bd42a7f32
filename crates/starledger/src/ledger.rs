//! The ledger engine: serialized insertion over an in-memory chain.
//!
//! The chain is the one piece of mutable shared state. Every insertion
//! holds the write lock across validate + stamp + append, so two
//! submissions can never observe the same pre-insertion height. Reads
//! take the read lock and return owned clones.

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use starledger_core::{
    validate_chain, Block, BlockBody, BlockHash, DecodeError, ValidationFault,
};
use starledger_proof::{issue_challenge, verify_submission_at, Network};

use crate::error::{InsertError, SubmitError};

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Which network's address encoding wallet signatures are checked
    /// against.
    pub network: Network,
}

/// A decoded claim attributed to one owner, as returned by
/// [`Ledger::claims_by_owner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerClaim {
    /// Height of the block carrying the claim.
    pub height: u64,
    /// The proven owner address.
    pub owner: String,
    /// The opaque claim data.
    pub star: Bytes,
}

/// The append-only, tamper-evident chain of claims.
///
/// Created with a genesis block already in place; grows monotonically by
/// single-block appends, never shrinks, never reorders, never edits in
/// place. Destroyed with the process.
pub struct Ledger {
    chain: RwLock<Vec<Block>>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create a ledger, synchronously materializing the genesis block
    /// through the same seal-and-append path ordinary claims use, so
    /// genesis obeys every invariant a normal block does.
    pub fn with_config(config: LedgerConfig) -> Self {
        let mut chain = Vec::new();
        append_block(&mut chain, BlockBody::genesis(), now_seconds())
            .expect("an empty chain cannot fail validation");
        Self {
            chain: RwLock::new(chain),
            config,
        }
    }

    /// Rebuild an engine around an existing chain, taken as-is.
    ///
    /// No checks are run on the given blocks; callers are expected to
    /// run [`validate`](Self::validate), and every insertion re-checks
    /// the whole chain anyway. An empty input gets a fresh genesis
    /// block, so the next claim can never land at height 0.
    pub fn from_blocks(chain: Vec<Block>) -> Self {
        if chain.is_empty() {
            return Self::new();
        }
        Self {
            chain: RwLock::new(chain),
            config: LedgerConfig::default(),
        }
    }

    /// Index of the last block. A fresh ledger reports 0 (genesis).
    pub async fn height(&self) -> u64 {
        let chain = self.chain.read().await;
        (chain.len() as u64).saturating_sub(1)
    }

    /// Format a challenge binding `address` to the current time, for a
    /// wallet to sign. Stateless: the embedded timestamp is the only
    /// state, re-validated at submission.
    pub fn issue_challenge(&self, address: &str) -> String {
        issue_challenge(address, now_seconds())
    }

    /// Verify an ownership proof and append the claim.
    ///
    /// Verification happens before the lock is taken; the write lock is
    /// then held across the full-chain validation, stamping, and append,
    /// so concurrent submissions serialize into contiguous heights.
    pub async fn submit_claim(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        star: impl Into<Bytes>,
    ) -> Result<Block, SubmitError> {
        if let Err(e) =
            verify_submission_at(message, address, signature, self.config.network, now_seconds())
        {
            debug!(owner = address, error = %e, "submission rejected");
            return Err(e.into());
        }

        let body = BlockBody::claim(address, signature, star.into());

        let mut chain = self.chain.write().await;
        let block = append_block(&mut chain, body, now_seconds())?;
        debug!(height = block.height, hash = %block.hash, owner = address, "claim appended");
        Ok(block)
    }

    /// Look up a block by its hash. Unknown hashes are absent, not an
    /// error.
    pub async fn find_by_hash(&self, hash: &BlockHash) -> Option<Block> {
        let chain = self.chain.read().await;
        chain.iter().find(|b| b.hash == *hash).cloned()
    }

    /// Look up a block by height. Out-of-range heights are absent, not
    /// an error.
    pub async fn find_by_height(&self, height: u64) -> Option<Block> {
        let chain = self.chain.read().await;
        usize::try_from(height)
            .ok()
            .and_then(|h| chain.get(h))
            .cloned()
    }

    /// Decode every non-genesis body and collect the claims owned by
    /// `address`.
    ///
    /// Fail-fast: a decode failure on any single block fails the whole
    /// call rather than silently skipping it.
    pub async fn claims_by_owner(&self, address: &str) -> Result<Vec<OwnerClaim>, DecodeError> {
        let chain = self.chain.read().await;
        let mut claims = Vec::new();
        for block in chain.iter().skip(1) {
            let body = block.decode_body()?;
            if body.owner == address {
                claims.push(OwnerClaim {
                    height: block.height,
                    owner: body.owner,
                    star: body.star,
                });
            }
        }
        Ok(claims)
    }

    /// Walk the whole chain and report every fault. Read-only; the empty
    /// vector means the chain is fully consistent.
    pub async fn validate(&self) -> Vec<ValidationFault> {
        let chain = self.chain.read().await;
        validate_chain(&chain)
    }

    /// Owned copy of the entire chain, consistent at one instant.
    pub async fn snapshot(&self) -> Vec<Block> {
        self.chain.read().await.clone()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the existing chain, then stamp and append one block.
///
/// The caller must hold exclusive access to the chain across the whole
/// call; every successful append is thereby an implicit proof that the
/// prior history was consistent at that moment.
fn append_block(
    chain: &mut Vec<Block>,
    body: BlockBody,
    timestamp: i64,
) -> Result<Block, InsertError> {
    let faults = validate_chain(chain);
    if !faults.is_empty() {
        warn!(fault_count = faults.len(), "refusing to append to an inconsistent chain");
        return Err(InsertError::ChainTampered { faults });
    }

    let height = chain.len() as u64;
    let previous_hash = chain.last().map(|b| b.hash);
    let block = Block::seal(body, height, timestamp, previous_hash);
    chain.push(block.clone());
    Ok(block)
}

/// Current time in whole seconds since the epoch.
fn now_seconds() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
