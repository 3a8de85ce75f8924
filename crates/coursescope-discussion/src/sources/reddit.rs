//! Reddit search client.
//!
//! With client credentials configured the client authenticates against
//! `oauth.reddit.com`; otherwise it falls back to the public `.json`
//! endpoints on `www.reddit.com`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use coursescope_core::AppConfig;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::DiscussionError;
use crate::types::{RawPost, SearchRequest};

use super::reddit_helpers::{to_raw_post, Listing};
use super::DiscussionSearch;

const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";
const PUBLIC_BASE_URL: &str = "https://www.reddit.com";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
/// Tokens are refreshed this long before Reddit says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Connection settings for [`RedditClient`].
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub user_agent: String,
    /// `(client_id, client_secret)` for the client-credentials grant.
    pub credentials: Option<(String, String)>,
    /// Base URL for search requests.
    pub api_base_url: String,
    /// Base URL for the token endpoint.
    pub auth_base_url: String,
    pub request_timeout: Duration,
}

impl RedditConfig {
    /// Derive client settings from application config.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let credentials = config
            .reddit_credentials()
            .map(|(id, secret)| (id.to_string(), secret.to_string()));
        let default_base = if credentials.is_some() {
            OAUTH_BASE_URL
        } else {
            PUBLIC_BASE_URL
        };

        Self {
            user_agent: config.user_agent.clone(),
            credentials,
            api_base_url: config
                .reddit_base_url
                .clone()
                .unwrap_or_else(|| default_base.to_string()),
            auth_base_url: PUBLIC_BASE_URL.to_string(),
            request_timeout: config.forum_timeout(),
        }
    }
}

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Reddit search client. Safe to share across concurrent forum searches.
pub struct RedditClient {
    client: reqwest::Client,
    config: RedditConfig,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// Build a client. No network traffic happens until the first search.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::Reddit`] if the HTTP client cannot be built.
    pub fn new(config: RedditConfig) -> Result<Self, DiscussionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(3))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DiscussionError::Reddit(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    /// Build a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::Reddit`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DiscussionError> {
        Self::new(RedditConfig::from_app_config(config))
    }

    /// Whether searches go through the OAuth API.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.config.credentials.is_some()
    }

    async fn bearer_token(&self) -> Result<Option<String>, DiscussionError> {
        let Some((client_id, client_secret)) = &self.config.credentials else {
            return Ok(None);
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(Some(token.value.clone()));
            }
        }

        let token = self.fetch_token(client_id, client_secret).await?;
        let value = token.access_token.clone();
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        });
        tracing::debug!(expires_in = token.expires_in, "refreshed Reddit access token");

        Ok(Some(value))
    }

    async fn fetch_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, DiscussionError> {
        let url = format!(
            "{}/api/v1/access_token",
            self.config.auth_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscussionError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DiscussionError::Reddit(format!("token parse error: {e}")))
    }

    fn search_url(&self, forum: &str) -> String {
        let base = self.config.api_base_url.trim_end_matches('/');
        let forum = utf8_percent_encode(forum.trim(), NON_ALPHANUMERIC);
        if self.is_authenticated() {
            format!("{base}/r/{forum}/search")
        } else {
            format!("{base}/r/{forum}/search.json")
        }
    }
}

#[async_trait]
impl DiscussionSearch for RedditClient {
    async fn search(
        &self,
        forum: &str,
        request: &SearchRequest,
    ) -> Result<Vec<RawPost>, DiscussionError> {
        let params: [(&str, String); 7] = [
            ("q", request.query.clone()),
            ("restrict_sr", "true".to_string()),
            ("sort", request.sort.as_str().to_string()),
            ("t", request.window.as_str().to_string()),
            ("limit", request.limit.to_string()),
            ("type", "link".to_string()),
            ("raw_json", "1".to_string()),
        ];

        let mut req = self.client.get(self.search_url(forum)).query(&params);
        if let Some(token) = self.bearer_token().await? {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(DiscussionError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(DiscussionError::Reddit(format!(
                "search in r/{forum} failed with status {status}"
            )));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| DiscussionError::Reddit(format!("Reddit response parse error: {e}")))?;

        let posts: Vec<RawPost> = listing.data.children.iter().filter_map(to_raw_post).collect();

        tracing::debug!(forum, posts = posts.len(), "Reddit search complete");
        Ok(posts)
    }
}
