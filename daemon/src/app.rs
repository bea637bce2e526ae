//! Wiring: turns a validated [`DaemonConfig`] and the verifier key into the
//! shared HTTP state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use claimdrop_crypto::TicketSigner;
use claimdrop_ledger::ClaimLedger;
use claimdrop_rpc::{AppState, CampaignInfo};
use claimdrop_service::{ClaimMetrics, ClaimService, StatsReporter};
use claimdrop_types::{KeyPair, SystemClock};
use claimdrop_verifier::{
    AllOf, BypassVerifier, IdentityVerifier, TwitterClient, TwitterFollowVerifier,
    TwitterRetweetVerifier,
};

use crate::config::DaemonConfig;

/// Pick the eligibility check the configuration asks for.
pub fn build_verifier(config: &DaemonConfig) -> anyhow::Result<Arc<dyn IdentityVerifier>> {
    if config.campaign.bypass_verification {
        return Ok(Arc::new(BypassVerifier));
    }

    let twitter = &config.twitter;
    let token = twitter
        .bearer_token
        .clone()
        .context("twitter.bearer_token is not set")?;
    let account_id = twitter
        .account_id
        .clone()
        .context("twitter.account_id is not set")?;
    let client = TwitterClient::new(
        &twitter.api_base,
        token,
        Duration::from_secs(twitter.timeout_secs),
    )
    .context("failed to build Twitter client")?;

    let follow: Arc<dyn IdentityVerifier> = Arc::new(TwitterFollowVerifier::new(
        client.clone(),
        account_id,
        twitter.account_to_follow.clone(),
    ));
    if !twitter.require_retweet {
        return Ok(follow);
    }

    let retweet: Arc<dyn IdentityVerifier> = Arc::new(TwitterRetweetVerifier::new(
        client,
        twitter.campaign_tweet_id.clone(),
    ));
    Ok(Arc::new(AllOf::new(vec![follow, retweet])))
}

/// Assemble the ledger, verifier, signer and metrics behind the router.
pub fn build_state(config: &DaemonConfig, keypair: KeyPair) -> anyhow::Result<Arc<AppState>> {
    config.validate()?;
    let campaign = config.campaign_config()?;

    let ledger = Arc::new(ClaimLedger::from_config(&campaign));
    let metrics = Arc::new(ClaimMetrics::new());
    let service = ClaimService::new(
        Arc::clone(&ledger),
        build_verifier(config)?,
        Arc::new(TicketSigner::new(keypair)),
        Arc::new(SystemClock),
    )
    .with_verification_timeout(Duration::from_secs(config.twitter.timeout_secs))
    .with_metrics(Arc::clone(&metrics));

    Ok(Arc::new(AppState {
        service: Arc::new(service),
        stats: StatsReporter::new(ledger),
        metrics,
        info: CampaignInfo {
            follow_account: Some(config.twitter.account_to_follow.clone()),
            network: config.campaign.network.clone(),
            bypass_verification: campaign.bypass_verification(),
        },
    }))
}
