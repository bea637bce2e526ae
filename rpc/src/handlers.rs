//! RPC request handlers and their wire types.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use claimdrop_crypto::CLAIM_MESSAGE_FORMAT;
use claimdrop_types::{CampaignStats, PublicKey, Signature, SlotIndex};
use serde::{Deserialize, Serialize};

use crate::server::AppState;
use crate::RpcError;

// ── Claim ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    #[serde(default, alias = "walletAddress")]
    pub wallet: Option<String>,
    #[serde(default, rename = "twitterHandle", alias = "identityHandle")]
    pub twitter_handle: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub success: bool,
    pub slot_index: SlotIndex,
    /// Same value as `slot_index`, under the name the claim widget reads.
    pub claim_index: SlotIndex,
    pub signature: Signature,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

pub async fn claim(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<Json<ClaimResponse>, RpcError> {
    let Json(request) = payload.map_err(|e| RpcError::InvalidRequest(e.body_text()))?;
    let wallet = request.wallet.unwrap_or_default();
    let handle = request.twitter_handle.unwrap_or_default();

    let receipt = state
        .service
        .claim(&wallet, &handle)
        .await
        .map_err(|e| RpcError::from_claim(e, state.info.follow_account.as_deref()))?;

    Ok(Json(ClaimResponse {
        success: true,
        slot_index: receipt.slot_index,
        claim_index: receipt.slot_index,
        signature: receipt.signature,
        message: if receipt.already_claimed {
            "Already verified"
        } else {
            "Verified! You can now claim your red packet."
        },
    }))
}

// ── Stats ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CampaignStats,
    /// Alias of `capacity` kept for existing clients.
    pub total_slots: u64,
}

impl From<CampaignStats> for StatsResponse {
    fn from(stats: CampaignStats) -> Self {
        Self {
            total_slots: stats.capacity,
            stats,
        }
    }
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, RpcError> {
    let stats = state.stats.stats()?;
    Ok(Json(stats.into()))
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub verifier: PublicKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_account: Option<String>,
    pub network: String,
    pub skip_verification: bool,
    #[serde(flatten)]
    pub stats: StatsResponse,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, RpcError> {
    let stats = state.stats.stats()?;
    Ok(Json(HealthResponse {
        status: "ok",
        verifier: state.service.signer().public_key().clone(),
        twitter_account: state.info.follow_account.as_ref().map(|a| format!("@{a}")),
        network: state.info.network.clone(),
        skip_verification: state.info.bypass_verification,
        stats: stats.into(),
    }))
}

// ── Verification key ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierKeyResponse {
    pub public_key: PublicKey,
    pub algorithm: &'static str,
    pub message_format: &'static str,
}

pub async fn verifier_key(State(state): State<Arc<AppState>>) -> Json<VerifierKeyResponse> {
    Json(VerifierKeyResponse {
        public_key: state.service.signer().public_key().clone(),
        algorithm: "ed25519",
        message_format: CLAIM_MESSAGE_FORMAT,
    })
}

// ── Metrics ──────────────────────────────────────────────────────────────

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, RpcError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| RpcError::Server(format!("metrics encoding failed: {e}")))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
