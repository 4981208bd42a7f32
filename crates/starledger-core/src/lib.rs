//! # Starledger Core
//!
//! Pure primitives for the star ledger: blocks, canonical encoding, and
//! chain validation.
//!
//! This crate contains no I/O, no clock, and no locking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable, hash-addressed entry in the ledger
//! - [`BlockHash`] - Content address (SHA-256 of canonical content)
//! - [`BlockBody`] - Tagged body union: genesis sentinel or owner claim
//! - [`ValidationFault`] - A reported inconsistency at one height
//!
//! ## Canonicalization
//!
//! Digest preimages and bodies are encoded with deterministic CBOR so the
//! same logical content always yields the same digest. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod error;
pub mod types;
pub mod validation;

pub use block::{Block, BlockBody, ClaimBody, GENESIS_SENTINEL};
pub use error::DecodeError;
pub use types::BlockHash;
pub use validation::{validate_chain, ValidationFault};
