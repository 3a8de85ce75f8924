use coursescope_core::DeadlineElapsed;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RatingsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("upstream timeout: {0}")]
    Timeout(#[from] DeadlineElapsed),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
