use claimdrop_types::{NormalizedIdentity, WalletAddress};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("campaign is full: all {capacity} slots have been claimed")]
    CampaignFull { capacity: u64 },

    #[error("identity already used: {0}")]
    IdentityAlreadyUsed(NormalizedIdentity),

    #[error("wallet already holds a claim: {0}")]
    WalletAlreadyClaimed(WalletAddress),

    #[error("ledger lock poisoned")]
    Poisoned,

    #[error("ledger invariant violated: {0}")]
    InvariantViolated(String),
}
