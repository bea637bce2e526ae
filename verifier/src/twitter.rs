//! Twitter-backed eligibility checks.

use async_trait::async_trait;
use claimdrop_types::NormalizedIdentity;
use tracing::info;

use crate::{IdentityVerifier, TwitterClient, VerifierError};

/// Tweet id value that means "campaign tweet not announced yet".
pub const PLACEHOLDER_TWEET_ID: &str = "PLACEHOLDER_UNTIL_LAUNCH";

/// Eligible iff the user follows the campaign account.
pub struct TwitterFollowVerifier {
    client: TwitterClient,
    target_account_id: String,
    target_handle: String,
    max_pages: usize,
}

impl TwitterFollowVerifier {
    pub fn new(
        client: TwitterClient,
        target_account_id: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            client,
            target_account_id: target_account_id.into(),
            target_handle: target_handle.into(),
            max_pages: 1,
        }
    }

    /// Follow up to `max_pages` pages of the following list (1000 per page).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

#[async_trait]
impl IdentityVerifier for TwitterFollowVerifier {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError> {
        let Some(user_id) = self.client.user_id(identity.as_str()).await? else {
            info!(handle = %identity, "twitter user not found");
            return Ok(false);
        };

        let following = self.client.following_ids(&user_id, self.max_pages).await?;
        let is_following = following.iter().any(|id| *id == self.target_account_id);

        info!(
            handle = %identity,
            target = %self.target_handle,
            following = is_following,
            "follow check"
        );
        Ok(is_following)
    }

    fn name(&self) -> &'static str {
        "twitter-follow"
    }
}

/// Eligible iff the user retweeted the campaign tweet.
///
/// With no tweet configured (or the launch placeholder) the check passes.
pub struct TwitterRetweetVerifier {
    client: TwitterClient,
    tweet_id: Option<String>,
    max_pages: usize,
}

impl TwitterRetweetVerifier {
    pub fn new(client: TwitterClient, tweet_id: Option<String>) -> Self {
        let tweet_id = tweet_id.filter(|id| !id.is_empty() && id != PLACEHOLDER_TWEET_ID);
        Self {
            client,
            tweet_id,
            max_pages: 1,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

#[async_trait]
impl IdentityVerifier for TwitterRetweetVerifier {
    async fn verify(&self, identity: &NormalizedIdentity) -> Result<bool, VerifierError> {
        let Some(ref tweet_id) = self.tweet_id else {
            info!(handle = %identity, "[skip] no campaign tweet configured");
            return Ok(true);
        };

        let Some(user_id) = self.client.user_id(identity.as_str()).await? else {
            return Ok(false);
        };

        let retweeters = self.client.retweeter_ids(tweet_id, self.max_pages).await?;
        let has_retweeted = retweeters.iter().any(|id| *id == user_id);

        info!(handle = %identity, retweeted = has_retweeted, "retweet check");
        Ok(has_retweeted)
    }

    fn name(&self) -> &'static str {
        "twitter-retweet"
    }
}
