//! Claim tickets: the canonical claim message and its signer.
//!
//! A ticket is `(slot_index, signature)` where the signature covers
//! `claim:{wallet}:{identity}:{slot_index}`. Anyone holding the published
//! public key can check a ticket without asking the service.

use std::fmt;

use claimdrop_types::{KeyPair, NormalizedIdentity, PublicKey, Signature, SlotIndex, WalletAddress};

use crate::sign::{sign_message, verify_signature};

/// Human-readable template of the signed message, published with the key.
pub const CLAIM_MESSAGE_FORMAT: &str = "claim:{wallet}:{identity}:{slot}";

/// Build the canonical claim message.
pub fn claim_message(wallet: &str, identity: &str, slot: SlotIndex) -> String {
    format!("claim:{wallet}:{identity}:{slot}")
}

/// Check a ticket against a published verification key.
pub fn verify_ticket(
    public_key: &PublicKey,
    wallet: &str,
    identity: &str,
    slot: SlotIndex,
    signature: &Signature,
) -> bool {
    let message = claim_message(wallet, identity, slot);
    verify_signature(message.as_bytes(), signature, public_key)
}

/// Holds the campaign's long-lived signing key.
///
/// Only the public half is ever handed out.
pub struct TicketSigner {
    keypair: KeyPair,
}

impl TicketSigner {
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// Sign the claim message for `(wallet, identity, slot)`.
    pub fn sign(&self, wallet: &WalletAddress, identity: &NormalizedIdentity, slot: SlotIndex) -> Signature {
        let message = claim_message(wallet.as_str(), identity.as_str(), slot);
        sign_message(message.as_bytes(), &self.keypair.private)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }
}

impl fmt::Debug for TicketSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketSigner")
            .field("public_key", &self.keypair.public)
            .finish_non_exhaustive()
    }
}
