//! Heuristic relevance scoring for discussion posts.

use chrono::{DateTime, Utc};

use crate::query::course_variants;
use crate::types::{DiscussionPost, ScoredPost};

/// Generic course-chatter terms. Each one present in a title adds
/// [`KEYWORD_POINTS`].
pub(crate) const RANK_KEYWORDS: &[&str] = &[
    "hard",
    "easy",
    "difficult",
    "exam",
    "final",
    "midterm",
    "prof",
    "professor",
    "teacher",
    "tips",
    "advice",
    "workload",
    "review",
];

const KEYWORD_POINTS: f64 = 5.0;
const EXACT_TITLE_BONUS: f64 = 10.0;
const RECENCY_MAX: f64 = 10.0;
/// Recency loses one point per this many days, reaching zero at 300 days.
const RECENCY_DAYS_PER_POINT: f64 = 30.0;

/// Score one post title.
///
/// Keyword hits use substring containment on the lowercased title. Posts
/// dated in the future are treated as brand new.
#[must_use]
pub fn relevance_score(
    title: &str,
    created_at: DateTime<Utc>,
    exact_variants: &[String],
    now: DateTime<Utc>,
) -> f64 {
    let lower = title.to_lowercase();

    #[allow(clippy::cast_precision_loss)]
    let keyword_hits = RANK_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count() as f64;
    let mut score = keyword_hits * KEYWORD_POINTS;

    if exact_variants.iter().any(|v| *v == lower.trim()) {
        score += EXACT_TITLE_BONUS;
    }

    score + recency_points(days_old(created_at, now))
}

/// Linear recency decay, floored at zero.
#[must_use]
pub fn recency_points(days_old: f64) -> f64 {
    (RECENCY_MAX - days_old / RECENCY_DAYS_PER_POINT).max(0.0)
}

/// Fractional age in days; never negative.
#[must_use]
pub fn days_old(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let secs = (now - created_at).num_seconds().max(0) as f64;
    secs / 86_400.0
}

/// Score and order posts for a course. The sort is stable, so ties keep
/// their input order.
#[must_use]
pub fn rank_posts(
    posts: Vec<DiscussionPost>,
    course_id: &str,
    now: DateTime<Utc>,
) -> Vec<ScoredPost> {
    let mut exact_variants: Vec<String> = course_variants(course_id)
        .into_iter()
        .map(|v| v.to_lowercase())
        .collect();
    exact_variants.dedup();

    let mut scored: Vec<ScoredPost> = posts
        .into_iter()
        .map(|post| {
            let relevance =
                relevance_score(&post.title, post.created_at_utc, &exact_variants, now);
            ScoredPost { post, relevance }
        })
        .collect();

    scored.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    scored
}
