//! # Starledger
//!
//! A minimal append-only, tamper-evident ledger: a sequence of linked,
//! content-addressed blocks, where a claim is admitted only after its
//! owner proves control of a wallet address by signing a time-boxed
//! challenge.
//!
//! The [`Ledger`] is the engine: it issues challenges, verifies
//! submissions, validates the entire existing chain before every
//! insertion, and serves lookups over consistent snapshots. It keeps the
//! chain resident in memory only; persistence, networking, and signing
//! are external collaborators.
//!
//! ```no_run
//! # async fn demo() {
//! use starledger::Ledger;
//!
//! let ledger = Ledger::new();
//! let challenge = ledger.issue_challenge("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
//! // ... the wallet signs `challenge` out of band ...
//! # let signature = String::new();
//! let block = ledger
//!     .submit_claim(
//!         "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
//!         &challenge,
//!         &signature,
//!         b"Orion's Belt".to_vec(),
//!     )
//!     .await;
//! # }
//! ```

pub mod error;
pub mod ledger;

pub use error::{InsertError, SubmitError};
pub use ledger::{Ledger, LedgerConfig, OwnerClaim};

pub use starledger_core::{
    validate_chain, Block, BlockBody, BlockHash, ClaimBody, DecodeError, ValidationFault,
};
pub use starledger_proof::{Network, VerifyError, CHALLENGE_WINDOW_SECS};
