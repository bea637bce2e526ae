//! Identity eligibility checks.
//!
//! The claim flow asks an [`IdentityVerifier`] whether a normalized social
//! handle is eligible (for example, follows the campaign account). Verifiers
//! compose: [`AllOf`] requires every inner check, [`TimeoutVerifier`] bounds a
//! check in time, and [`BypassVerifier`] accepts everything.

pub mod bypass;
pub mod client;
pub mod combinators;
pub mod error;
pub mod twitter;

pub use bypass::BypassVerifier;
pub use client::{TwitterClient, DEFAULT_API_BASE};
pub use combinators::{AllOf, TimeoutVerifier};
pub use error::VerifierError;
pub use twitter::{TwitterFollowVerifier, TwitterRetweetVerifier, PLACEHOLDER_TWEET_ID};

use async_trait::async_trait;
use claimdrop_types::NormalizedIdentity;

/// Decides whether an identity is eligible to claim.
///
/// `Ok(false)` means "checked and not eligible", including when the account
/// does not exist. `Err` means the check could not be completed; callers treat
/// that as not eligible too.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}
