//! Social-account identity canonicalization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A social-account handle in canonical form.
///
/// Two handles that refer to the same account (`@Alice`, ` alice `) map to the
/// same `NormalizedIdentity`, which is what uniqueness is enforced on. The only
/// way to build one is [`NormalizedIdentity::normalize`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedIdentity(String);

impl NormalizedIdentity {
    /// Trim, lowercase and strip a single leading `@`.
    pub fn normalize(raw: &str) -> Result<Self, TypesError> {
        let lowered = raw.trim().to_lowercase();
        let stripped = lowered.strip_prefix('@').unwrap_or(lowered.as_str()).trim();
        if stripped.is_empty() {
            return Err(TypesError::EmptyIdentity);
        }
        Ok(Self(stripped.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        NormalizedIdentity::normalize(s).unwrap().as_str().to_string()
    }

    #[test]
    fn lowercases_and_strips_marker() {
        assert_eq!(norm("@Alice"), "alice");
        assert_eq!(norm("  @BoB  "), "bob");
        assert_eq!(norm("carol"), "carol");
    }

    #[test]
    fn only_one_leading_marker_is_stripped() {
        assert_eq!(norm("@@dave"), "@dave");
        assert_eq!(norm("e@ve"), "e@ve");
    }

    #[test]
    fn blank_or_bare_marker_is_rejected() {
        assert_eq!(NormalizedIdentity::normalize(""), Err(TypesError::EmptyIdentity));
        assert_eq!(NormalizedIdentity::normalize("   "), Err(TypesError::EmptyIdentity));
        assert_eq!(NormalizedIdentity::normalize(" @ "), Err(TypesError::EmptyIdentity));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NormalizedIdentity::normalize("@Stair_AI").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"stair_ai\"");
    }
}
