//! Verifier combinators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use claimdrop_types::NormalizedIdentity;
use tracing::warn;

use crate::{IdentityVerifier, VerifierError};

/// Eligible iff every inner verifier says so. Stops at the first `false`.
pub struct AllOf {
    verifiers: Vec<Arc<dyn IdentityVerifier>>,
}

impl AllOf {
    pub fn new(verifiers: Vec<Arc<dyn IdentityVerifier>>) -> Self {
        Self { verifiers }
    }
}

#[async_trait]
impl IdentityVerifier for AllOf {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError> {
        for verifier in &self.verifiers {
            if !verifier.verify(identity).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "all-of"
    }
}

/// Bounds an inner verifier in time. Running out of time is an error.
pub struct TimeoutVerifier {
    inner: Arc<dyn IdentityVerifier>,
    timeout: Duration,
}

impl TimeoutVerifier {
    pub fn new(inner: Arc<dyn IdentityVerifier>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl IdentityVerifier for TimeoutVerifier {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError> {
        match tokio::time::timeout(self.timeout, self.inner.verify(identity)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    verifier = self.inner.name(),
                    identity = %identity,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "verification timed out"
                );
                Err(VerifierError::Timeout(self.timeout))
            }
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
