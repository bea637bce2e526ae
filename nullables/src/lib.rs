//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the claim flow (the clock and the identity
//! verifier) sit behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod verifier;

pub use clock::NullClock;
pub use verifier::NullVerifier;
