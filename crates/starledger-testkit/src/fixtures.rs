//! Deterministic fixtures for ledger tests.

use starledger_core::{Block, BlockBody};

use crate::wallet::TestWallet;

/// Star names used as sample claim payloads.
pub const STAR_FIXTURES: &[&str] = &["Polaris", "Betelgeuse", "Vega", "Sirius", "Deneb"];

/// A deterministic wallet shared across tests.
pub fn seeded_wallet() -> TestWallet {
    TestWallet::from_seed([0x42; 32])
}

/// Seal a valid chain: genesis plus `count` claim blocks owned by
/// `owner`, with fixed timestamps.
///
/// The embedded signatures are placeholders; the chain validator checks
/// digests and links, not wallet signatures, so these chains validate
/// cleanly while staying cheap to build.
pub fn claim_chain(owner: &str, count: usize) -> Vec<Block> {
    let base_time = 1_700_000_000;
    let mut chain = vec![Block::seal(BlockBody::genesis(), 0, base_time, None)];

    for i in 1..=count {
        let star = STAR_FIXTURES[(i - 1) % STAR_FIXTURES.len()];
        let prev = chain.last().map(|b| b.hash);
        chain.push(Block::seal(
            BlockBody::claim(owner, format!("sig-{i}"), star.as_bytes().to_vec()),
            i as u64,
            base_time + i as i64,
            prev,
        ));
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use starledger_core::validate_chain;

    #[test]
    fn test_claim_chain_validates() {
        let chain = claim_chain("alice", 4);
        assert_eq!(chain.len(), 5);
        assert!(validate_chain(&chain).is_empty());
    }

    #[test]
    fn test_claim_chain_bodies_decode() {
        let chain = claim_chain("alice", 2);
        for block in &chain[1..] {
            let claim = block.decode_body().unwrap();
            assert_eq!(claim.owner, "alice");
        }
    }
}
