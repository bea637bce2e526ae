//! Cryptographic primitives for claimdrop.
//!
//! - **Ed25519** for signing and verifying claim tickets
//! - Secret-key loading from hex or Solana-style JSON keypair files
//! - The canonical claim message and [`TicketSigner`]

pub mod error;
pub mod keys;
pub mod sign;
pub mod ticket;

pub use error::CryptoError;
pub use keys::{
    generate_keypair, keypair_from_private, keypair_from_seed, parse_private_key,
    public_from_private, read_private_key_file,
};
pub use sign::{sign_message, verify_signature};
pub use ticket::{claim_message, verify_ticket, TicketSigner, CLAIM_MESSAGE_FORMAT};
