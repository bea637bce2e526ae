//! Claim orchestration.
//!
//! [`ClaimService`] runs one claim attempt end to end: input validation,
//! idempotent lookup, fast-path rejection, the identity check, and the atomic
//! commit that assigns a slot and signs the ticket. [`StatsReporter`] is the
//! read-only view polled by clients.

pub mod error;
pub mod metrics;
pub mod service;
pub mod stats;

pub use error::{ClaimError, ErrorKind};
pub use metrics::ClaimMetrics;
pub use service::{ClaimReceipt, ClaimService, DEFAULT_VERIFICATION_TIMEOUT};
pub use stats::StatsReporter;
