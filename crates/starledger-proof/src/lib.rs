//! # Starledger Proof
//!
//! The ownership-proof protocol: challenge issuance and time-boxed
//! wallet signature verification.
//!
//! A caller asks for a challenge bound to a wallet address and the
//! current time, signs it with standard wallet software, and returns
//! with the message, a signature, and a claim. This crate issues the
//! challenge and re-validates the time window and signature; it never
//! signs anything itself.
//!
//! All time-dependent checks take the clock as an argument, so callers
//! own the wall clock and tests can pin it.

pub mod challenge;
pub mod error;
pub mod verify;

pub use challenge::{
    check_window, issue_challenge, parse_issue_time, CHALLENGE_SUFFIX, CHALLENGE_WINDOW_SECS,
};
pub use error::VerifyError;
pub use verify::{magic_hash, p2pkh_address, verify_submission_at, verify_wallet_signature, Network};
