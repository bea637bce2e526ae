//! Shared utilities for the claimdrop services.

pub mod logging;

pub use logging::{init_logging, LogFormat, ParseLogFormatError};
