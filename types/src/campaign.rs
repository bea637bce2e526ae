//! Campaign configuration and capacity snapshots.

use serde::{Deserialize, Serialize};

use crate::TypesError;

/// Campaign parameters, fixed for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampaignConfig {
    capacity: u64,
    bypass_verification: bool,
}

impl CampaignConfig {
    pub fn new(capacity: u64, bypass_verification: bool) -> Result<Self, TypesError> {
        if capacity == 0 {
            return Err(TypesError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            bypass_verification,
        })
    }

    /// Total number of slots in the pool.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Whether the identity check is skipped entirely.
    pub fn bypass_verification(&self) -> bool {
        self.bypass_verification
    }
}

/// Point-in-time view of slot usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub capacity: u64,
    pub claimed: u64,
    pub remaining: u64,
}

impl CampaignStats {
    pub fn new(capacity: u64, claimed: u64) -> Self {
        Self {
            capacity,
            claimed,
            remaining: capacity.saturating_sub(claimed),
        }
    }

    pub fn is_full(&self) -> bool {
        self.claimed >= self.capacity
    }
}
