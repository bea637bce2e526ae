//! Nullable identity verifier with a programmable allow-list.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use claimdrop_types::NormalizedIdentity;
use claimdrop_verifier::{IdentityVerifier, VerifierError};

/// A verifier whose answers are scripted by the test.
///
/// Identities on the allow-list pass, everything else fails. It can also be
/// told to error out or to sleep before answering, and counts its calls.
#[derive(Default)]
pub struct NullVerifier {
    allowed: Mutex<HashSet<String>>,
    allow_all: bool,
    failing: bool,
    delay: Duration,
    calls: AtomicUsize,
}

impl NullVerifier {
    /// Pass only the given identities (compared in normalized form).
    pub fn allowing<'a>(identities: impl IntoIterator<Item = &'a str>) -> Self {
        let allowed = identities
            .into_iter()
            .filter_map(|raw| NormalizedIdentity::normalize(raw).ok())
            .map(|id| id.as_str().to_string())
            .collect();
        Self {
            allowed: Mutex::new(allowed),
            ..Self::default()
        }
    }

    /// Pass every identity.
    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            ..Self::default()
        }
    }

    /// Fail every check with a transport error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Add an identity to the allow-list.
    pub fn allow(&self, raw: &str) {
        if let (Ok(id), Ok(mut allowed)) = (NormalizedIdentity::normalize(raw), self.allowed.lock()) {
            allowed.insert(id.as_str().to_string());
        }
    }

    /// Number of `verify` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for NullVerifier {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing {
            return Err(VerifierError::Unreachable("null verifier set to fail".into()));
        }
        if self.allow_all {
            return Ok(true);
        }
        let allowed = self
            .allowed
            .lock()
            .map_err(|_| VerifierError::RequestFailed("allow-list lock poisoned".into()))?;
        Ok(allowed.contains(identity.as_str()))
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
