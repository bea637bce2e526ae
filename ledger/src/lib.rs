//! Claim ledger.
//!
//! The single source of truth for how many slots have been handed out, which
//! wallet holds which slot, and which identities have been spent. All state
//! lives behind one lock; callers only see the operations on [`ClaimLedger`].

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::ClaimLedger;
