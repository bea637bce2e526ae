use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verification timed out after {0:?}")]
    Timeout(Duration),

    #[error("verification service unreachable: {0}")]
    Unreachable(String),

    #[error("verification request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from verification service: {0}")]
    InvalidResponse(String),

    #[error("verifier misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for VerifierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VerifierError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            VerifierError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            VerifierError::InvalidResponse(e.to_string())
        } else {
            VerifierError::RequestFailed(e.to_string())
        }
    }
}
