//! Discussion provider abstractions.

mod reddit;
pub(crate) mod reddit_helpers;

pub use reddit::{RedditClient, RedditConfig};

use async_trait::async_trait;

use crate::error::DiscussionError;
use crate::types::{RawPost, SearchRequest};

/// Search capability of a discussion platform.
///
/// Implementations apply their own rate limiting. Callers issue at most one
/// call per forum per request.
#[async_trait]
pub trait DiscussionSearch: Send + Sync {
    /// Search a single forum.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError`] on transport or provider failure.
    async fn search(
        &self,
        forum: &str,
        request: &SearchRequest,
    ) -> Result<Vec<RawPost>, DiscussionError>;
}
