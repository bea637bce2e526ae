//! Caller-facing claim errors.

use claimdrop_ledger::LedgerError;
use claimdrop_types::TypesError;
use thiserror::Error;

/// Why a claim was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Malformed or missing request fields. Retry only after correcting them.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every slot has been handed out. Permanent for this campaign.
    #[error("campaign is full: all slots have been claimed")]
    CampaignFull,

    /// Another wallet already claimed with this identity.
    #[error("this identity has already been used")]
    IdentityAlreadyUsed,

    /// The identity check returned false or could not be completed.
    #[error("identity verification failed")]
    VerificationFailed,

    /// Unexpected failure inside the service. The detail is for logs only.
    #[error("internal fault: {0}")]
    InternalFault(String),
}

/// Machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    CampaignFull,
    IdentityAlreadyUsed,
    VerificationFailed,
    InternalFault,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::InvalidInput,
        ErrorKind::CampaignFull,
        ErrorKind::IdentityAlreadyUsed,
        ErrorKind::VerificationFailed,
        ErrorKind::InternalFault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::CampaignFull => "campaign_full",
            ErrorKind::IdentityAlreadyUsed => "identity_already_used",
            ErrorKind::VerificationFailed => "verification_failed",
            ErrorKind::InternalFault => "internal_fault",
        }
    }
}

impl ClaimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::InvalidInput(_) => ErrorKind::InvalidInput,
            ClaimError::CampaignFull => ErrorKind::CampaignFull,
            ClaimError::IdentityAlreadyUsed => ErrorKind::IdentityAlreadyUsed,
            ClaimError::VerificationFailed => ErrorKind::VerificationFailed,
            ClaimError::InternalFault(_) => ErrorKind::InternalFault,
        }
    }
}

impl From<TypesError> for ClaimError {
    fn from(e: TypesError) -> Self {
        ClaimError::InvalidInput(e.to_string())
    }
}

impl From<LedgerError> for ClaimError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::CampaignFull { .. } => ClaimError::CampaignFull,
            LedgerError::IdentityAlreadyUsed(_) => ClaimError::IdentityAlreadyUsed,
            other => ClaimError::InternalFault(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimdrop_types::WalletAddress;

    #[test]
    fn kinds_have_stable_codes() {
        let codes: Vec<_> = ErrorKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            codes,
            [
                "invalid_input",
                "campaign_full",
                "identity_already_used",
                "verification_failed",
                "internal_fault"
            ]
        );
    }

    #[test]
    fn ledger_errors_fold_into_claim_kinds() {
        assert_eq!(
            ClaimError::from(LedgerError::CampaignFull { capacity: 3 }).kind(),
            ErrorKind::CampaignFull
        );
        let wallet = WalletAddress::parse("W").unwrap();
        assert_eq!(
            ClaimError::from(LedgerError::WalletAlreadyClaimed(wallet)).kind(),
            ErrorKind::InternalFault
        );
        assert_eq!(ClaimError::from(LedgerError::Poisoned).kind(), ErrorKind::InternalFault);
    }

    #[test]
    fn type_errors_are_invalid_input() {
        let err = ClaimError::from(TypesError::EmptyIdentity);
        assert_eq!(err, ClaimError::InvalidInput("identity handle is empty".into()));
    }
}
