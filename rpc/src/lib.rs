//! HTTP JSON API for the claim campaign.
//!
//! Provides endpoints for:
//! - Claim submission (`POST /api/verify`, alias `POST /api/claim`)
//! - Slot usage (`GET /api/stats`)
//! - Service health (`GET /api/health`)
//! - The published ticket verification key (`GET /api/verifier`)
//! - Prometheus metrics (`GET /metrics`)

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, AppState, CampaignInfo, RpcServer};
