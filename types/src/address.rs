//! Wallet address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A participant's wallet address.
///
/// The address is opaque to the campaign: any chain encoding is accepted, it
/// only serves as the key a claim is recorded under. Surrounding whitespace is
/// removed on parse; nothing else is rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse a raw wallet string, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyWallet);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A short prefix of the address for log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for WalletAddress {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let addr = WalletAddress::parse("  7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU \n").unwrap();
        assert_eq!(addr.as_str(), "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU");
    }

    #[test]
    fn blank_wallet_is_rejected() {
        assert_eq!(WalletAddress::parse(""), Err(TypesError::EmptyWallet));
        assert_eq!(WalletAddress::parse("   \t"), Err(TypesError::EmptyWallet));
    }

    #[test]
    fn case_is_preserved() {
        let addr = WalletAddress::parse("AbCdEf").unwrap();
        assert_eq!(addr.as_str(), "AbCdEf");
    }

    #[test]
    fn short_prefix() {
        let addr = WalletAddress::parse("7xKXtg2CW87d97TX").unwrap();
        assert_eq!(addr.short(), "7xKXtg2C");
        let tiny = WalletAddress::parse("abc").unwrap();
        assert_eq!(tiny.short(), "abc");
    }
}
