//! In-memory claim ledger guarded by a single read/write lock.
//!
//! Reads (`stats`, `lookup`, `is_identity_used`, `is_full`) share the lock.
//! [`ClaimLedger::commit`] holds the write lock across the whole
//! re-validate, assign, sign and insert sequence, so two commits can never
//! both observe the last free slot or both spend the same identity.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use claimdrop_types::{
    CampaignConfig, CampaignStats, ClaimRecord, NormalizedIdentity, Signature, SlotIndex,
    Timestamp, WalletAddress,
};
use tracing::info;

use crate::LedgerError;

#[derive(Default)]
struct LedgerState {
    next_slot: SlotIndex,
    claims_by_wallet: HashMap<WalletAddress, ClaimRecord>,
    used_identities: HashSet<NormalizedIdentity>,
}

/// Authoritative store of campaign capacity and accepted claims.
///
/// State exists for the lifetime of the process only.
pub struct ClaimLedger {
    capacity: u64,
    state: RwLock<LedgerState>,
}

impl ClaimLedger {
    /// Create an empty ledger with `capacity` slots.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn from_config(config: &CampaignConfig) -> Self {
        Self::new(config.capacity())
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state.read().map_err(|_| LedgerError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state.write().map_err(|_| LedgerError::Poisoned)
    }

    /// Slot usage at call time.
    pub fn stats(&self) -> Result<CampaignStats, LedgerError> {
        let state = self.read()?;
        Ok(CampaignStats::new(self.capacity, state.next_slot))
    }

    /// Number of accepted claims.
    pub fn claimed(&self) -> Result<u64, LedgerError> {
        Ok(self.read()?.next_slot)
    }

    /// The record held by `wallet`, if any.
    pub fn lookup(&self, wallet: &WalletAddress) -> Result<Option<ClaimRecord>, LedgerError> {
        Ok(self.read()?.claims_by_wallet.get(wallet).cloned())
    }

    pub fn is_identity_used(&self, identity: &NormalizedIdentity) -> Result<bool, LedgerError> {
        Ok(self.read()?.used_identities.contains(identity))
    }

    pub fn is_full(&self) -> Result<bool, LedgerError> {
        Ok(self.read()?.next_slot >= self.capacity)
    }

    /// Atomically accept a claim.
    ///
    /// Re-validates capacity, wallet and identity uniqueness under the write
    /// lock regardless of what the caller checked earlier, then assigns the
    /// next slot, asks `sign` for the signature over that exact slot, and
    /// records the claim. Either every piece of state advances or none does.
    pub fn commit<F>(
        &self,
        wallet: WalletAddress,
        identity: NormalizedIdentity,
        issued_at: Timestamp,
        sign: F,
    ) -> Result<ClaimRecord, LedgerError>
    where
        F: FnOnce(&WalletAddress, &NormalizedIdentity, SlotIndex) -> Signature,
    {
        let mut state = self.write()?;

        if state.next_slot >= self.capacity {
            return Err(LedgerError::CampaignFull {
                capacity: self.capacity,
            });
        }
        if state.claims_by_wallet.contains_key(&wallet) {
            return Err(LedgerError::WalletAlreadyClaimed(wallet));
        }
        if state.used_identities.contains(&identity) {
            return Err(LedgerError::IdentityAlreadyUsed(identity));
        }

        let slot_index = state.next_slot;
        let signature = sign(&wallet, &identity, slot_index);
        let record = ClaimRecord {
            wallet: wallet.clone(),
            identity: identity.clone(),
            slot_index,
            signature,
            issued_at,
        };

        state.used_identities.insert(identity);
        state.claims_by_wallet.insert(wallet, record.clone());
        state.next_slot += 1;

        info!(
            slot = slot_index,
            wallet = %record.wallet.short(),
            identity = %record.identity,
            "claim committed"
        );
        Ok(record)
    }

    /// Snapshot of all accepted claims, ordered by slot index.
    pub fn records(&self) -> Result<Vec<ClaimRecord>, LedgerError> {
        let state = self.read()?;
        let mut records: Vec<ClaimRecord> = state.claims_by_wallet.values().cloned().collect();
        records.sort_by_key(|r| r.slot_index);
        Ok(records)
    }

    /// Check the structural invariants of the ledger state.
    ///
    /// - `next_slot` equals the number of records and never exceeds capacity
    /// - records and used identities are in one-to-one correspondence
    /// - slot indices are exactly `0..next_slot`
    pub fn check_invariants(&self) -> Result<(), LedgerError> {
        let state = self.read()?;
        let count = state.claims_by_wallet.len() as u64;

        if state.next_slot != count {
            return Err(LedgerError::InvariantViolated(format!(
                "next slot {} but {} records",
                state.next_slot, count
            )));
        }
        if state.next_slot > self.capacity {
            return Err(LedgerError::InvariantViolated(format!(
                "next slot {} exceeds capacity {}",
                state.next_slot, self.capacity
            )));
        }
        if state.used_identities.len() != state.claims_by_wallet.len() {
            return Err(LedgerError::InvariantViolated(format!(
                "{} used identities for {} records",
                state.used_identities.len(),
                state.claims_by_wallet.len()
            )));
        }

        let mut seen = vec![false; state.claims_by_wallet.len()];
        for (wallet, record) in &state.claims_by_wallet {
            if &record.wallet != wallet {
                return Err(LedgerError::InvariantViolated(format!(
                    "record for {wallet} is keyed under another wallet"
                )));
            }
            if !state.used_identities.contains(&record.identity) {
                return Err(LedgerError::InvariantViolated(format!(
                    "identity {} of slot {} is not marked used",
                    record.identity, record.slot_index
                )));
            }
            match seen.get_mut(record.slot_index as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(LedgerError::InvariantViolated(format!(
                        "slot {} assigned twice",
                        record.slot_index
                    )))
                }
                None => {
                    return Err(LedgerError::InvariantViolated(format!(
                        "slot {} outside 0..{}",
                        record.slot_index, state.next_slot
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn wallet(s: &str) -> WalletAddress {
        WalletAddress::parse(s).unwrap()
    }

    fn ident(s: &str) -> NormalizedIdentity {
        NormalizedIdentity::normalize(s).unwrap()
    }

    fn fake_sign(_: &WalletAddress, _: &NormalizedIdentity, slot: SlotIndex) -> Signature {
        let mut sig = [0u8; 64];
        sig[..8].copy_from_slice(&slot.to_le_bytes());
        Signature(sig)
    }

    fn commit(ledger: &ClaimLedger, w: &str, id: &str) -> Result<ClaimRecord, LedgerError> {
        ledger.commit(wallet(w), ident(id), Timestamp::new(1_700_000_000), fake_sign)
    }

    #[test]
    fn empty_ledger_stats() {
        let ledger = ClaimLedger::new(5);
        assert_eq!(ledger.stats().unwrap(), CampaignStats::new(5, 0));
        assert!(!ledger.is_full().unwrap());
        assert!(ledger.lookup(&wallet("A")).unwrap().is_none());
        assert!(!ledger.is_identity_used(&ident("alice")).unwrap());
    }

    #[test]
    fn commit_assigns_sequential_slots() {
        let ledger = ClaimLedger::new(3);
        assert_eq!(commit(&ledger, "A", "alice").unwrap().slot_index, 0);
        assert_eq!(commit(&ledger, "B", "bob").unwrap().slot_index, 1);
        assert_eq!(commit(&ledger, "C", "carol").unwrap().slot_index, 2);
        assert_eq!(ledger.stats().unwrap(), CampaignStats::new(3, 3));
        assert!(ledger.is_full().unwrap());
        ledger.check_invariants().unwrap();
    }

    #[test]
    fn signer_sees_final_slot() {
        let ledger = ClaimLedger::new(3);
        commit(&ledger, "A", "alice").unwrap();
        let record = ledger
            .commit(wallet("B"), ident("bob"), Timestamp::EPOCH, |w, id, slot| {
                assert_eq!(w.as_str(), "B");
                assert_eq!(id.as_str(), "bob");
                assert_eq!(slot, 1);
                fake_sign(w, id, slot)
            })
            .unwrap();
        assert_eq!(record.signature, fake_sign(&wallet("B"), &ident("bob"), 1));
    }

    #[test]
    fn full_campaign_rejects_commit() {
        let ledger = ClaimLedger::new(1);
        commit(&ledger, "A", "alice").unwrap();
        assert_eq!(
            commit(&ledger, "B", "bob"),
            Err(LedgerError::CampaignFull { capacity: 1 })
        );
        assert_eq!(ledger.claimed().unwrap(), 1);
        assert!(!ledger.is_identity_used(&ident("bob")).unwrap());
    }

    #[test]
    fn used_identity_rejects_commit() {
        let ledger = ClaimLedger::new(5);
        commit(&ledger, "A", "alice").unwrap();
        assert_eq!(
            commit(&ledger, "B", "alice"),
            Err(LedgerError::IdentityAlreadyUsed(ident("alice")))
        );
        assert!(ledger.lookup(&wallet("B")).unwrap().is_none());
        assert_eq!(ledger.claimed().unwrap(), 1);
    }

    #[test]
    fn claimed_wallet_rejects_second_commit() {
        let ledger = ClaimLedger::new(5);
        let first = commit(&ledger, "A", "alice").unwrap();
        assert_eq!(
            commit(&ledger, "A", "bob"),
            Err(LedgerError::WalletAlreadyClaimed(wallet("A")))
        );
        assert_eq!(ledger.lookup(&wallet("A")).unwrap(), Some(first));
        assert!(!ledger.is_identity_used(&ident("bob")).unwrap());
    }

    #[test]
    fn signer_not_called_on_rejection() {
        let ledger = ClaimLedger::new(1);
        commit(&ledger, "A", "alice").unwrap();
        let result = ledger.commit(wallet("B"), ident("bob"), Timestamp::EPOCH, |_, _, _| {
            panic!("signer must not run for a rejected claim")
        });
        assert!(result.is_err());
    }

    #[test]
    fn records_are_ordered_by_slot() {
        let ledger = ClaimLedger::new(10);
        for (w, id) in [("Z", "zed"), ("M", "mike"), ("A", "amy")] {
            commit(&ledger, w, id).unwrap();
        }
        let slots: Vec<_> = ledger.records().unwrap().iter().map(|r| r.slot_index).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn concurrent_commits_race_for_last_slots() {
        let capacity = 8;
        let ledger = Arc::new(ClaimLedger::new(capacity));
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || commit(&ledger, &format!("W{i}"), &format!("user{i}")))
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| r.is_ok())
            .count();

        assert_eq!(accepted as u64, capacity);
        assert_eq!(ledger.stats().unwrap(), CampaignStats::new(capacity, capacity));
        ledger.check_invariants().unwrap();
    }

    #[test]
    fn concurrent_commits_same_identity_accept_one() {
        let ledger = Arc::new(ClaimLedger::new(100));
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || commit(&ledger, &format!("W{i}"), "@Alice"))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let accepted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == LedgerError::IdentityAlreadyUsed(ident("alice"))));
        assert_eq!(ledger.claimed().unwrap(), 1);
        ledger.check_invariants().unwrap();
    }
}
