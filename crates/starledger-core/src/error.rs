//! Error types for Starledger Core.

use thiserror::Error;

/// Errors from decoding a block body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The body is the genesis sentinel, which is not owner/claim-shaped.
    #[error("block body is the genesis sentinel, not a claim")]
    NotAClaim,

    #[error("malformed block body: {0}")]
    Malformed(String),
}
