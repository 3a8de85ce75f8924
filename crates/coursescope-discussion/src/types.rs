use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse intent of a course question, used to pick keyword vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Difficulty,
    Instructor,
    Exam,
    Tips,
}

impl Topic {
    /// Parse a topic tag. Unknown tags yield `None`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "difficulty" => Some(Self::Difficulty),
            "instructor" => Some(Self::Instructor),
            "exam" => Some(Self::Exam),
            "tips" => Some(Self::Tips),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Instructor => "instructor",
            Self::Exam => "exam",
            Self::Tips => "tips",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post as returned by the discussion provider, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    pub id: String,
    pub title: String,
    pub permalink: String,
    pub score: i64,
    pub comment_count: u64,
    pub created_at_epoch_secs: f64,
}

/// A normalized discussion post. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscussionPost {
    pub id: String,
    pub forum_name: String,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub comment_count: u64,
    pub created_at_utc: DateTime<Utc>,
}

/// A post with its request-scoped relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub post: DiscussionPost,
    pub relevance: f64,
}

/// Provider-side result ordering. Searches always ask for the newest posts
/// and rank locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    New,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
        }
    }
}

/// Provider-side time window; the smallest window covering the cutoff is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    /// Smallest provider window that still covers `days` of history.
    #[must_use]
    pub fn covering_days(days: u32) -> Self {
        match days {
            0..=1 => Self::Day,
            2..=7 => Self::Week,
            8..=31 => Self::Month,
            32..=365 => Self::Year,
            _ => Self::All,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

/// One provider search call, issued once per forum.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub sort: SortOrder,
    pub window: TimeWindow,
    pub limit: usize,
}

/// Consumer-facing discussion query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscussionQuery {
    pub course_id: String,
    /// Explicit topic tag. Unknown tags search without a keyword clause.
    pub topic: Option<String>,
    /// Free-text question, classified when no explicit topic is given.
    pub question: Option<String>,
    pub window_days: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscussionResponse {
    pub posts: Vec<ScoredPost>,
    pub count: usize,
}

/// One row of a digest's source list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceItem {
    pub title: String,
    pub url: String,
    pub relative_age: String,
    pub forum_name: String,
    pub score: i64,
}

/// Natural-language digest plus the posts it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub course_id: String,
    pub topic: Option<Topic>,
    pub text: String,
    pub sources: Vec<SourceItem>,
}
