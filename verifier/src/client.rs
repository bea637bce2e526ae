//! HTTP client for the Twitter v2 API endpoints the eligibility checks use.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::VerifierError;

/// Public Twitter API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Page size requested from list endpoints (API maximum for `following`).
const PAGE_SIZE: &str = "1000";

/// Thin bearer-token client over the handful of endpoints we need.
#[derive(Clone)]
pub struct TwitterClient {
    http: reqwest::Client,
    api_base: Url,
    bearer_token: String,
}

/// `{"data": …}` envelope. Lookups for unknown users come back without `data`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    id: String,
}

impl TwitterClient {
    /// Build a client with a per-request timeout.
    pub fn new(
        api_base: &str,
        bearer_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VerifierError> {
        let api_base = Url::parse(api_base)
            .map_err(|e| VerifierError::Config(format!("invalid api base {api_base}: {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(VerifierError::Config(format!("invalid api base {api_base}")));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| VerifierError::Config(e.to_string()))?;
        Ok(Self {
            http,
            api_base,
            bearer_token: bearer_token.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET `url`, returning `None` on 404.
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        url: Url,
    ) -> Result<Option<Envelope<T>>, VerifierError> {
        debug!(%url, "twitter api request");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(VerifierError::RequestFailed(format!("HTTP status {status}")));
        }

        let envelope = response.json::<Envelope<T>>().await.map_err(|e| {
            VerifierError::InvalidResponse(format!("failed to parse twitter response: {e}"))
        })?;
        Ok(Some(envelope))
    }

    /// Resolve a handle to its numeric user id. `None` if no such user.
    pub async fn user_id(&self, handle: &str) -> Result<Option<String>, VerifierError> {
        let url = self.endpoint(&["2", "users", "by", "username", handle]);
        Ok(self
            .get::<UserRef>(url)
            .await?
            .and_then(|env| env.data)
            .map(|user| user.id))
    }

    /// Collect up to `max_pages` pages of a paginated user list.
    async fn user_list(&self, segments: &[&str], max_pages: usize) -> Result<Vec<String>, VerifierError> {
        let mut ids = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..max_pages.max(1) {
            let mut url = self.endpoint(segments);
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("max_results", PAGE_SIZE);
                if let Some(ref t) = token {
                    query.append_pair("pagination_token", t);
                }
            }

            let Some(envelope) = self.get::<Vec<UserRef>>(url).await? else {
                break;
            };
            ids.extend(envelope.data.unwrap_or_default().into_iter().map(|u| u.id));

            token = envelope.meta.and_then(|m| m.next_token);
            if token.is_none() {
                break;
            }
        }
        Ok(ids)
    }

    /// Ids of the accounts `user_id` follows.
    pub async fn following_ids(&self, user_id: &str, max_pages: usize) -> Result<Vec<String>, VerifierError> {
        self.user_list(&["2", "users", user_id, "following"], max_pages)
            .await
    }

    /// Ids of the accounts that retweeted `tweet_id`.
    pub async fn retweeter_ids(&self, tweet_id: &str, max_pages: usize) -> Result<Vec<String>, VerifierError> {
        self.user_list(&["2", "tweets", tweet_id, "retweeted_by"], max_pages)
            .await
    }
}
