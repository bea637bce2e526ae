//! Prometheus metrics for the claim flow.
//!
//! [`ClaimMetrics`] owns a dedicated [`Registry`] that the HTTP `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::{ClaimError, ClaimReceipt, ErrorKind};

/// Outcome label for a newly accepted claim.
pub const OUTCOME_ACCEPTED: &str = "accepted";
/// Outcome label for a wallet that had already claimed.
pub const OUTCOME_REPEAT: &str = "repeat";

pub struct ClaimMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    /// Claim attempts by outcome (`accepted`, `repeat`, or an error code).
    pub claims: IntCounterVec,
    /// Slots handed out so far.
    pub slots_claimed: IntGauge,
    /// Time spent in the identity check, in seconds.
    pub verification_seconds: Histogram,
}

impl ClaimMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let claims = register_int_counter_vec_with_registry!(
            Opts::new("claimdrop_claims_total", "Claim attempts by outcome"),
            &["outcome"],
            registry
        )
        .expect("failed to register claims counter");

        let slots_claimed = register_int_gauge_with_registry!(
            Opts::new("claimdrop_slots_claimed", "Slots handed out so far"),
            registry
        )
        .expect("failed to register slots_claimed gauge");

        // 5 ms to ~20 s, covering a slow upstream social API.
        let verification_seconds = register_histogram_with_registry!(
            HistogramOpts::new(
                "claimdrop_verification_seconds",
                "Identity verification latency in seconds"
            )
            .buckets(prometheus::exponential_buckets(0.005, 2.0, 13).expect("valid buckets")),
            registry
        )
        .expect("failed to register verification_seconds histogram");

        // Pre-create every label so zero counts are exported.
        claims.with_label_values(&[OUTCOME_ACCEPTED]);
        claims.with_label_values(&[OUTCOME_REPEAT]);
        for kind in ErrorKind::ALL {
            claims.with_label_values(&[kind.as_str()]);
        }

        Self {
            registry,
            claims,
            slots_claimed,
            verification_seconds,
        }
    }

    /// Record the outcome of one claim attempt.
    pub fn observe(&self, result: &Result<ClaimReceipt, ClaimError>) {
        let outcome = match result {
            Ok(receipt) if receipt.already_claimed => OUTCOME_REPEAT,
            Ok(_) => OUTCOME_ACCEPTED,
            Err(e) => e.kind().as_str(),
        };
        self.claims.with_label_values(&[outcome]).inc();
    }

    /// Number of attempts recorded under `outcome`.
    pub fn count(&self, outcome: &str) -> u64 {
        self.claims.with_label_values(&[outcome]).get()
    }

    /// Render all metrics in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for ClaimMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_outcomes() {
        let metrics = ClaimMetrics::new();
        metrics.observe(&Err(ClaimError::CampaignFull));
        metrics.observe(&Err(ClaimError::CampaignFull));
        metrics.observe(&Err(ClaimError::VerificationFailed));
        assert_eq!(metrics.count("campaign_full"), 2);
        assert_eq!(metrics.count("verification_failed"), 1);
        assert_eq!(metrics.count(OUTCOME_ACCEPTED), 0);
    }

    #[test]
    fn encode_lists_all_families() {
        let metrics = ClaimMetrics::new();
        metrics.slots_claimed.set(4);
        let text = metrics.encode().unwrap();
        assert!(text.contains("claimdrop_claims_total{outcome=\"identity_already_used\"} 0"));
        assert!(text.contains("claimdrop_slots_claimed 4"));
        assert!(text.contains("claimdrop_verification_seconds_bucket"));
    }
}
