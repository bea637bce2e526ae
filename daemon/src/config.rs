//! Daemon configuration with TOML file support.

use std::net::SocketAddr;
use std::path::Path;

use claimdrop_types::CampaignConfig;
use claimdrop_utils::LogFormat;
use claimdrop_verifier::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the claim daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`] and then
/// overridden by command-line flags and `CLAIMDROP_*` environment variables.
/// Every section and field is optional in the file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub campaign: CampaignSection,
    pub twitter: TwitterSection,
    pub server: ServerSection,
    pub log: LogSection,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSection {
    /// Number of slots handed out before the campaign is full.
    pub capacity: u64,
    /// Accept every identity without asking Twitter.
    pub bypass_verification: bool,
    /// Network label of the token distribution. Reported by health only.
    pub network: String,
}

impl Default for CampaignSection {
    fn default() -> Self {
        Self {
            capacity: 1000,
            bypass_verification: false,
            network: "devnet".into(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterSection {
    pub bearer_token: Option<String>,
    /// Handle participants must follow, without the `@`.
    pub account_to_follow: String,
    /// Numeric user id of `account_to_follow`.
    pub account_id: Option<String>,
    pub campaign_tweet_id: Option<String>,
    pub require_retweet: bool,
    pub api_base: String,
    /// Bound on one whole eligibility check.
    pub timeout_secs: u64,
}

impl Default for TwitterSection {
    fn default() -> Self {
        Self {
            bearer_token: None,
            account_to_follow: "Stair_AI".into(),
            account_id: None,
            campaign_tweet_id: None,
            require_retweet: false,
            api_base: DEFAULT_API_BASE.into(),
            timeout_secs: 10,
        }
    }
}

// Hand-written so the bearer token never reaches a log line.
impl std::fmt::Debug for TwitterSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterSection")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("account_to_follow", &self.account_to_follow)
            .field("account_id", &self.account_id)
            .field("campaign_tweet_id", &self.campaign_tweet_id)
            .field("require_retweet", &self.require_retweet)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub listen: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            level: "info".into(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("DaemonConfig is always serializable to TOML")
    }

    /// The immutable campaign parameters derived from this configuration.
    pub fn campaign_config(&self) -> Result<CampaignConfig, ConfigError> {
        CampaignConfig::new(self.campaign.capacity, self.campaign.bypass_verification)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check everything `run` needs before any socket is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.campaign_config()?;
        if self.campaign.bypass_verification {
            return Ok(());
        }

        let twitter = &self.twitter;
        if twitter.bearer_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "twitter.bearer_token is required unless verification is bypassed".into(),
            ));
        }
        if twitter.account_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "twitter.account_id is required unless verification is bypassed".into(),
            ));
        }
        if twitter.account_to_follow.trim().is_empty() {
            return Err(ConfigError::Invalid("twitter.account_to_follow is empty".into()));
        }
        if twitter.timeout_secs == 0 {
            return Err(ConfigError::Invalid("twitter.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn twitter_ready() -> DaemonConfig {
        let mut config = DaemonConfig::default();
        config.twitter.bearer_token = Some("token".into());
        config.twitter.account_id = Some("1234".into());
        config
    }

    #[test]
    fn defaults() {
        let config = DaemonConfig::from_toml_str("").unwrap();
        assert_eq!(config.campaign.capacity, 1000);
        assert!(!config.campaign.bypass_verification);
        assert_eq!(config.campaign.network, "devnet");
        assert_eq!(config.twitter.account_to_follow, "Stair_AI");
        assert_eq!(config.twitter.api_base, "https://api.twitter.com");
        assert_eq!(config.twitter.timeout_secs, 10);
        assert_eq!(config.server.listen.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log.format, LogFormat::Human);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = DaemonConfig::from_toml_str(
            r#"
            [campaign]
            capacity = 2

            [twitter]
            require_retweet = true
            campaign_tweet_id = "1750000000000000000"

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.campaign.capacity, 2);
        assert_eq!(config.campaign.network, "devnet");
        assert!(config.twitter.require_retweet);
        assert_eq!(config.twitter.campaign_tweet_id.as_deref(), Some("1750000000000000000"));
        assert_eq!(config.twitter.account_to_follow, "Stair_AI");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = twitter_ready();
        config.server.listen = SocketAddr::from(([127, 0, 0, 1], 8080));
        let parsed = DaemonConfig::from_toml_str(&config.to_toml_string()).unwrap();
        assert_eq!(parsed.server.listen, config.server.listen);
        assert_eq!(parsed.twitter.account_id, config.twitter.account_id);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlisten = \"127.0.0.1:4000\"").unwrap();
        let config = DaemonConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.server.listen.port(), 4000);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DaemonConfig::from_toml_file(Path::new("/nonexistent/claimdrop.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = DaemonConfig::from_toml_str("[campaign]\ncapacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn twitter_credentials_required_without_bypass() {
        let config = DaemonConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut no_id = twitter_ready();
        no_id.twitter.account_id = None;
        assert!(no_id.validate().is_err());

        assert!(twitter_ready().validate().is_ok());

        let mut bypass = DaemonConfig::default();
        bypass.campaign.bypass_verification = true;
        assert!(bypass.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = twitter_ready();
        config.campaign.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_bearer_token() {
        let config = twitter_ready();
        let rendered = format!("{config:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"token\""));
    }
}
