use coursescope_core::DeadlineElapsed;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscussionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit API error: {0}")]
    Reddit(String),

    #[error("rate limited by Reddit (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("upstream timeout: {0}")]
    Timeout(#[from] DeadlineElapsed),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
