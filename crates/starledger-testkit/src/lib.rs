//! # Starledger Testkit
//!
//! Shared test utilities: a wallet counterpart that produces
//! standard-scheme signatures (the ledger itself only verifies),
//! deterministic chain fixtures, and proptest generators.
//!
//! Not intended for production use.

pub mod fixtures;
pub mod generators;
pub mod wallet;

pub use fixtures::{claim_chain, seeded_wallet, STAR_FIXTURES};
pub use wallet::TestWallet;
