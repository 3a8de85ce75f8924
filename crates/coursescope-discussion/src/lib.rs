//! Course discussion search for coursescope.
//!
//! Builds a search expression from a course code and question, queries every
//! configured forum concurrently under per-forum and overall deadlines, then
//! filters, ranks and optionally summarizes the posts that mention the course.

pub mod error;
pub mod query;
pub mod ranker;
pub mod search;
pub mod sources;
pub mod summary;
pub mod topic;
pub mod types;

pub use error::DiscussionError;
pub use query::{course_variants, synthesize};
pub use ranker::{rank_posts, relevance_score};
pub use search::{resolve_topic, search_forums, DiscussionService, ForumSearch, SearchSettings};
pub use sources::{DiscussionSearch, RedditClient, RedditConfig};
pub use summary::{relative_age, summarize};
pub use topic::classify;
pub use types::{
    Digest, DiscussionPost, DiscussionQuery, DiscussionResponse, RawPost, ScoredPost,
    SearchRequest, SortOrder, SourceItem, TimeWindow, Topic,
};
