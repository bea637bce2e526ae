//! Accepted claim records.

use serde::Serialize;

use crate::{NormalizedIdentity, Signature, Timestamp, WalletAddress};

/// Zero-based, gapless sequence number of an accepted claim.
pub type SlotIndex = u64;

/// The ledger's record of one accepted claim.
///
/// Created exactly once per accepted claim and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimRecord {
    pub wallet: WalletAddress,
    pub identity: NormalizedIdentity,
    pub slot_index: SlotIndex,
    pub signature: Signature,
    pub issued_at: Timestamp,
}
