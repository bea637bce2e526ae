//! Read-only campaign stats.

use std::sync::Arc;

use claimdrop_ledger::ClaimLedger;
use claimdrop_types::CampaignStats;

use crate::ClaimError;

/// Pass-through over [`ClaimLedger::stats`]. Holds no state of its own and is
/// safe to poll while claims are being committed.
#[derive(Clone)]
pub struct StatsReporter {
    ledger: Arc<ClaimLedger>,
}

impl StatsReporter {
    pub fn new(ledger: Arc<ClaimLedger>) -> Self {
        Self { ledger }
    }

    pub fn stats(&self) -> Result<CampaignStats, ClaimError> {
        Ok(self.ledger.stats()?)
    }
}
