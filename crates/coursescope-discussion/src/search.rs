//! Concurrent multi-forum search and the discussion service facade.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use coursescope_core::{with_deadline, AppConfig};
use futures::future::join_all;

use crate::error::DiscussionError;
use crate::query::{synthesize, title_match_variants, title_mentions_course};
use crate::ranker::rank_posts;
use crate::sources::reddit_helpers::to_discussion_post;
use crate::sources::{DiscussionSearch, RedditClient};
use crate::summary::{summarize, DIGEST_SIZE};
use crate::topic::classify;
use crate::types::{
    Digest, DiscussionPost, DiscussionQuery, DiscussionResponse, ScoredPost, SearchRequest,
    SortOrder, TimeWindow, Topic,
};

pub const DEFAULT_WINDOW_DAYS: u32 = 540;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;
/// Posts requested from each forum before title filtering.
const PROVIDER_PAGE_LIMIT: usize = 50;

/// Deadlines for one discussion search.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub forum_timeout: Duration,
    pub overall_timeout: Duration,
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            forum_timeout: config.forum_timeout(),
            overall_timeout: config.discussion_timeout(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            forum_timeout: Duration::from_millis(4_000),
            overall_timeout: Duration::from_millis(6_000),
        }
    }
}

/// Inputs of one multi-forum search.
#[derive(Debug, Clone)]
pub struct ForumSearch<'a> {
    pub forums: &'a [String],
    pub course_id: &'a str,
    pub expression: String,
    /// Posts created before this instant are dropped.
    pub cutoff: DateTime<Utc>,
    pub window: TimeWindow,
    pub limit: usize,
}

/// Search every forum concurrently and return ranked posts.
///
/// A forum that errors or exceeds its own deadline contributes nothing.
///
/// # Errors
///
/// Returns [`DiscussionError::Timeout`] if the whole search exceeds
/// `settings.overall_timeout`. Partial results are never returned.
pub async fn search_forums(
    searcher: &dyn DiscussionSearch,
    search: &ForumSearch<'_>,
    settings: &SearchSettings,
    now: DateTime<Utc>,
) -> Result<Vec<ScoredPost>, DiscussionError> {
    let ranked = with_deadline(
        "discussion_search",
        settings.overall_timeout,
        collect_ranked(searcher, search, settings.forum_timeout, now),
    )
    .await?;
    Ok(ranked)
}

async fn collect_ranked(
    searcher: &dyn DiscussionSearch,
    search: &ForumSearch<'_>,
    forum_timeout: Duration,
    now: DateTime<Utc>,
) -> Vec<ScoredPost> {
    let request = SearchRequest {
        query: search.expression.clone(),
        sort: SortOrder::New,
        window: search.window,
        limit: PROVIDER_PAGE_LIMIT,
    };

    let mut seen_forums = HashSet::new();
    let unique_forums: Vec<&String> = search
        .forums
        .iter()
        .filter(|f| seen_forums.insert(f.to_lowercase()))
        .collect();

    let futures = unique_forums.iter().map(|forum| {
        let request = &request;
        async move {
            let outcome = with_deadline(
                format!("forum:{forum}"),
                forum_timeout,
                searcher.search(forum, request),
            )
            .await;

            match outcome {
                Ok(Ok(raw)) => raw
                    .into_iter()
                    .filter_map(|p| to_discussion_post(p, forum))
                    .collect(),
                Ok(Err(e)) => {
                    tracing::warn!(forum = forum.as_str(), error = %e, "forum search failed");
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(forum = forum.as_str(), error = %e, "forum search timed out");
                    Vec::new()
                }
            }
        }
    });

    let per_forum: Vec<Vec<DiscussionPost>> = join_all(futures).await;

    let needles = title_match_variants(search.course_id);
    let mut seen_urls = HashSet::new();
    let candidates: Vec<DiscussionPost> = per_forum
        .into_iter()
        .flatten()
        .filter(|p| seen_urls.insert(p.url.clone()))
        .filter(|p| title_mentions_course(&p.title, &needles))
        .filter(|p| p.created_at_utc >= search.cutoff)
        .collect();

    let mut ranked = rank_posts(candidates, search.course_id, now);
    ranked.truncate(search.limit);

    tracing::debug!(
        course = search.course_id,
        forums = unique_forums.len(),
        count = ranked.len(),
        "discussion search complete"
    );
    ranked
}

/// Oldest creation time kept for a `window_days` search. Windows reaching
/// past the representable range keep everything.
fn window_cutoff(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(chrono::Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Resolve the topic of a query: an explicit tag wins, then the classified
/// question, then difficulty. An unknown explicit tag yields `None`.
#[must_use]
pub fn resolve_topic(query: &DiscussionQuery) -> Option<Topic> {
    if let Some(tag) = query.topic.as_deref().filter(|t| !t.trim().is_empty()) {
        return Topic::parse(tag);
    }
    match query.question.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(question) => Some(classify(question)),
        None => Some(Topic::Difficulty),
    }
}

/// Course discussion queries and digests over a configured set of forums.
pub struct DiscussionService {
    searcher: Arc<dyn DiscussionSearch>,
    forums: Vec<String>,
    settings: SearchSettings,
}

impl DiscussionService {
    #[must_use]
    pub fn new(
        searcher: Arc<dyn DiscussionSearch>,
        forums: Vec<String>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            searcher,
            forums,
            settings,
        }
    }

    /// Build a Reddit-backed service from application config.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::Reddit`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DiscussionError> {
        let client = RedditClient::from_app_config(config)?;
        Ok(Self::new(
            Arc::new(client),
            config.forums.clone(),
            SearchSettings::from_app_config(config),
        ))
    }

    #[must_use]
    pub fn forums(&self) -> &[String] {
        &self.forums
    }

    /// Ranked posts for a course.
    ///
    /// # Errors
    ///
    /// Returns [`DiscussionError::InvalidInput`] for a blank course id and
    /// [`DiscussionError::Timeout`] if the search exceeds its deadline.
    pub async fn query(
        &self,
        query: &DiscussionQuery,
    ) -> Result<DiscussionResponse, DiscussionError> {
        self.query_at(query, Utc::now()).await
    }

    /// [`Self::query`] against a fixed clock.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn query_at(
        &self,
        query: &DiscussionQuery,
        now: DateTime<Utc>,
    ) -> Result<DiscussionResponse, DiscussionError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let posts = self.run(query, limit, now).await?;
        let count = posts.len();
        Ok(DiscussionResponse { posts, count })
    }

    /// Digest of the top posts for a course.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn digest(&self, query: &DiscussionQuery) -> Result<Digest, DiscussionError> {
        self.digest_at(query, Utc::now()).await
    }

    /// [`Self::digest`] against a fixed clock.
    ///
    /// # Errors
    ///
    /// See [`Self::query`].
    pub async fn digest_at(
        &self,
        query: &DiscussionQuery,
        now: DateTime<Utc>,
    ) -> Result<Digest, DiscussionError> {
        let posts = self.run(query, DIGEST_SIZE, now).await?;
        let course_id = query.course_id.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(summarize(&posts, &course_id, resolve_topic(query), now))
    }

    async fn run(
        &self,
        query: &DiscussionQuery,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredPost>, DiscussionError> {
        let course_id = query.course_id.trim();
        if course_id.is_empty() {
            return Err(DiscussionError::InvalidInput(
                "course_id is required".to_string(),
            ));
        }

        let window_days = query.window_days.unwrap_or(DEFAULT_WINDOW_DAYS).max(1);
        let topic = resolve_topic(query);
        let search = ForumSearch {
            forums: &self.forums,
            course_id,
            expression: synthesize(course_id, topic),
            cutoff: window_cutoff(now, window_days),
            window: TimeWindow::covering_days(window_days),
            limit,
        };

        search_forums(self.searcher.as_ref(), &search, &self.settings, now).await
    }
}
