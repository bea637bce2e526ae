//! End-to-end claim orchestration.
//!
//! The checks performed before the identity call (existing wallet, full
//! campaign, spent identity) only exist to answer early without touching the
//! network. Correctness rests on [`ClaimLedger::commit`], which repeats them
//! under its write lock and is the only place a slot is assigned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use claimdrop_crypto::TicketSigner;
use claimdrop_ledger::{ClaimLedger, LedgerError};
use claimdrop_types::{
    Clock, ClaimRecord, NormalizedIdentity, Signature, SlotIndex, WalletAddress,
};
use claimdrop_verifier::{IdentityVerifier, TimeoutVerifier};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{ClaimError, ClaimMetrics};

/// Upper bound on a single identity check.
pub const DEFAULT_VERIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

/// The ticket handed back for an accepted claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub slot_index: SlotIndex,
    pub signature: Signature,
    /// True when the wallet had already claimed and the stored ticket was
    /// returned without any new work.
    pub already_claimed: bool,
}

impl ClaimReceipt {
    fn issued(record: ClaimRecord) -> Self {
        Self {
            slot_index: record.slot_index,
            signature: record.signature,
            already_claimed: false,
        }
    }

    fn existing(record: ClaimRecord) -> Self {
        Self {
            slot_index: record.slot_index,
            signature: record.signature,
            already_claimed: true,
        }
    }
}

pub struct ClaimService {
    ledger: Arc<ClaimLedger>,
    verifier: Arc<dyn IdentityVerifier>,
    signer: Arc<TicketSigner>,
    clock: Arc<dyn Clock>,
    verification_timeout: Duration,
    metrics: Option<Arc<ClaimMetrics>>,
}

impl ClaimService {
    pub fn new(
        ledger: Arc<ClaimLedger>,
        verifier: Arc<dyn IdentityVerifier>,
        signer: Arc<TicketSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            verifier,
            signer,
            clock,
            verification_timeout: DEFAULT_VERIFICATION_TIMEOUT,
            metrics: None,
        }
    }

    pub fn with_verification_timeout(mut self, timeout: Duration) -> Self {
        self.verification_timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ClaimMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn ledger(&self) -> &Arc<ClaimLedger> {
        &self.ledger
    }

    pub fn signer(&self) -> &Arc<TicketSigner> {
        &self.signer
    }

    /// Run one claim attempt for `wallet` with the raw social handle.
    ///
    /// Repeating a claim for a wallet that already holds a ticket returns
    /// that ticket unchanged.
    pub async fn claim(&self, wallet: &str, identity_handle: &str) -> Result<ClaimReceipt, ClaimError> {
        let result = self.try_claim(wallet, identity_handle).await;

        if let Err(ClaimError::InternalFault(ref detail)) = result {
            error!(detail = %detail, "claim failed with internal fault");
        }
        if let Some(ref metrics) = self.metrics {
            metrics.observe(&result);
            if let Ok(claimed) = self.ledger.claimed() {
                metrics.slots_claimed.set(claimed as i64);
            }
        }
        result
    }

    async fn try_claim(&self, wallet: &str, identity_handle: &str) -> Result<ClaimReceipt, ClaimError> {
        let wallet = WalletAddress::parse(wallet)?;
        let identity = NormalizedIdentity::normalize(identity_handle)?;

        if let Some(existing) = self.ledger.lookup(&wallet)? {
            info!(
                wallet = %wallet.short(),
                slot = existing.slot_index,
                "wallet already claimed, returning stored ticket"
            );
            return Ok(ClaimReceipt::existing(existing));
        }
        if self.ledger.is_full()? {
            return Err(ClaimError::CampaignFull);
        }
        if self.ledger.is_identity_used(&identity)? {
            return Err(ClaimError::IdentityAlreadyUsed);
        }

        self.check_eligibility(&identity).await?;

        let issued_at = self.clock.now();
        let committed = self
            .ledger
            .commit(wallet.clone(), identity, issued_at, |w, id, slot| {
                self.signer.sign(w, id, slot)
            });

        match committed {
            Ok(record) => {
                info!(
                    wallet = %record.wallet.short(),
                    identity = %record.identity,
                    slot = record.slot_index,
                    "verified"
                );
                Ok(ClaimReceipt::issued(record))
            }
            // A concurrent request for the same wallet committed first.
            Err(LedgerError::WalletAlreadyClaimed(_)) => match self.ledger.lookup(&wallet)? {
                Some(record) => Ok(ClaimReceipt::existing(record)),
                None => Err(ClaimError::InternalFault(format!(
                    "wallet {} reported claimed but has no record",
                    wallet.short()
                ))),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Ask the verifier, bounded by the configured timeout. Anything but a
    /// clear yes fails the claim.
    async fn check_eligibility(&self, identity: &NormalizedIdentity) -> Result<(), ClaimError> {
        let bounded = TimeoutVerifier::new(Arc::clone(&self.verifier), self.verification_timeout);
        let started = Instant::now();
        let outcome = bounded.verify(identity).await;
        if let Some(ref metrics) = self.metrics {
            metrics
                .verification_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        match outcome {
            Ok(true) => Ok(()),
            Ok(false) => {
                info!(identity = %identity, verifier = self.verifier.name(), "identity not eligible");
                Err(ClaimError::VerificationFailed)
            }
            Err(e) => {
                warn!(
                    identity = %identity,
                    verifier = self.verifier.name(),
                    error = %e,
                    "identity check could not be completed"
                );
                Err(ClaimError::VerificationFailed)
            }
        }
    }
}
