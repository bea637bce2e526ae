//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use claimdrop_service::{ClaimError, ErrorKind};
use thiserror::Error;
use tracing::error;

use crate::handlers::ErrorResponse;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// Verification failed and the operator configured which account to follow.
    #[error("identity verification failed (must follow @{follow_account})")]
    NotEligible { follow_account: String },

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// Map a claim failure, naming the account to follow when verification failed.
    pub fn from_claim(e: ClaimError, follow_account: Option<&str>) -> Self {
        match (e, follow_account) {
            (ClaimError::VerificationFailed, Some(account)) => RpcError::NotEligible {
                follow_account: account.to_string(),
            },
            (e, _) => RpcError::Claim(e),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::InvalidRequest(_) => ErrorKind::InvalidInput,
            RpcError::Claim(e) => e.kind(),
            RpcError::NotEligible { .. } => ErrorKind::VerificationFailed,
            RpcError::Server(_) => ErrorKind::InternalFault,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InternalFault => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput
            | ErrorKind::CampaignFull
            | ErrorKind::IdentityAlreadyUsed
            | ErrorKind::VerificationFailed => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the caller. Internal detail never leaves the server.
    pub fn public_message(&self) -> String {
        match self {
            RpcError::InvalidRequest(detail) => format!("Invalid request: {detail}"),
            RpcError::NotEligible { follow_account } => {
                format!("Must follow @{follow_account} on Twitter")
            }
            RpcError::Claim(ClaimError::InvalidInput(_)) => {
                "Missing wallet or twitterHandle".to_string()
            }
            RpcError::Claim(ClaimError::CampaignFull) => {
                "Campaign is full! All red packets have been claimed.".to_string()
            }
            RpcError::Claim(ClaimError::IdentityAlreadyUsed) => {
                "This Twitter account has already been used".to_string()
            }
            RpcError::Claim(ClaimError::VerificationFailed) => {
                "Identity verification failed".to_string()
            }
            RpcError::Claim(ClaimError::InternalFault(_)) | RpcError::Server(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        if self.kind() == ErrorKind::InternalFault {
            error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            success: false,
            error: self.kind().as_str(),
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (RpcError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (RpcError::Claim(ClaimError::CampaignFull), StatusCode::BAD_REQUEST),
            (RpcError::Claim(ClaimError::IdentityAlreadyUsed), StatusCode::BAD_REQUEST),
            (RpcError::Claim(ClaimError::VerificationFailed), StatusCode::BAD_REQUEST),
            (
                RpcError::Claim(ClaimError::InternalFault("lock".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = RpcError::Claim(ClaimError::InternalFault("secret key at /etc/key".into()));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn verification_failure_names_follow_account() {
        let err = RpcError::from_claim(ClaimError::VerificationFailed, Some("Stair_AI"));
        assert_eq!(err.public_message(), "Must follow @Stair_AI on Twitter");
        assert_eq!(err.kind(), ErrorKind::VerificationFailed);

        let bare = RpcError::from_claim(ClaimError::VerificationFailed, None);
        assert_eq!(bare.public_message(), "Identity verification failed");
    }
}
