//! Validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("wallet address is empty")]
    EmptyWallet,

    #[error("identity handle is empty")]
    EmptyIdentity,

    #[error("campaign capacity must be greater than zero")]
    ZeroCapacity,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
