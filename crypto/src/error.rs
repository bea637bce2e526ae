use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid secret key encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid secret key length: expected 32 or 64 bytes, got {0}")]
    InvalidLength(usize),

    #[error("embedded public key does not match the secret key")]
    KeyMismatch,

    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
