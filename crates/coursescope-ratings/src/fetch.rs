//! Page fetching for the ratings site.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RatingsError;

/// Fetches one HTML page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return its body.
    ///
    /// # Errors
    ///
    /// Returns [`RatingsError::HttpStatus`] on a non-2xx response and
    /// [`RatingsError::Http`] on transport failure, including the
    /// per-request `timeout` elapsing.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, RatingsError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// # Errors
    ///
    /// Returns [`RatingsError::Http`] if the HTTP client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, RatingsError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, RatingsError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RatingsError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "fetched ratings page");
        Ok(body)
    }
}
