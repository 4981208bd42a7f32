//! Error types for the ownership-proof protocol.

use thiserror::Error;

/// Failures from challenge parsing and signature verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Challenge older than the expiry window. Recoverable: the caller
    /// re-issues a challenge and signs again.
    #[error("challenge expired: {elapsed}s elapsed, window is {window}s")]
    Expired { elapsed: i64, window: i64 },

    /// The signature does not verify for the given address and message.
    /// Recoverable by re-signing.
    #[error("signature does not verify for the given address and message")]
    SignatureInvalid,

    /// The challenge message does not carry a parseable issue time.
    #[error("malformed challenge message: {0}")]
    MalformedChallenge(String),

    /// The signature could not be decoded at all.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}
