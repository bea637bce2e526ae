//! Verifier that accepts every identity.

use async_trait::async_trait;
use claimdrop_types::NormalizedIdentity;
use tracing::info;

use crate::{IdentityVerifier, VerifierError};

/// Accepts every identity without contacting anything.
///
/// Used when the campaign runs with verification bypassed.
#[derive(Clone, Copy, Debug, Default)]
pub struct BypassVerifier;

#[async_trait]
impl IdentityVerifier for BypassVerifier {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError> {
        info!(identity = %identity, "[skip] verification bypassed");
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "bypass"
    }
}
