//! Fundamental types for the claimdrop campaign service.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! wallet addresses, normalized identities, key and signature newtypes,
//! timestamps, claim records and the campaign configuration.

pub mod address;
pub mod campaign;
pub mod claim;
pub mod error;
pub mod identity;
pub mod keys;
pub mod time;

pub use address::WalletAddress;
pub use campaign::{CampaignConfig, CampaignStats};
pub use claim::{ClaimRecord, SlotIndex};
pub use error::TypesError;
pub use identity::NormalizedIdentity;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::{Clock, SystemClock, Timestamp};
