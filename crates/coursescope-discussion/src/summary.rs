//! Digest rendering for ranked discussion posts.

use chrono::{DateTime, Utc};

use crate::ranker::days_old;
use crate::types::{Digest, ScoredPost, SourceItem, Topic};

/// Posts included in a digest.
pub const DIGEST_SIZE: usize = 5;

const DISCLAIMER: &str =
    "These are unverified student opinions from Reddit; check the official course outline for current details.";

/// Render the top posts for a course into a short digest.
#[must_use]
pub fn summarize(
    posts: &[ScoredPost],
    course_id: &str,
    topic: Option<Topic>,
    now: DateTime<Utc>,
) -> Digest {
    let top = &posts[..posts.len().min(DIGEST_SIZE)];

    let mut lines = vec![heading(course_id, topic)];
    if top.is_empty() {
        lines.push("No recent discussions found.".to_string());
    }
    for scored in top {
        let post = &scored.post;
        lines.push(format!(
            "- {} — {} (r/{}) — {}",
            post.title,
            relative_age(post.created_at_utc, now),
            post.forum_name,
            post.url
        ));
    }
    lines.push(DISCLAIMER.to_string());

    let sources = top
        .iter()
        .map(|scored| SourceItem {
            title: scored.post.title.clone(),
            url: scored.post.url.clone(),
            relative_age: relative_age(scored.post.created_at_utc, now),
            forum_name: scored.post.forum_name.clone(),
            score: scored.post.score,
        })
        .collect();

    Digest {
        course_id: course_id.to_string(),
        topic,
        text: lines.join("\n"),
        sources,
    }
}

fn heading(course_id: &str, topic: Option<Topic>) -> String {
    match topic {
        Some(Topic::Difficulty) | None => {
            format!("What students say about how hard {course_id} is:")
        }
        Some(Topic::Instructor) => format!("Instructor recommendations for {course_id}:"),
        Some(Topic::Exam) => format!("What students say about {course_id} exams:"),
        Some(Topic::Tips) => format!("Student tips for {course_id}:"),
    }
}

/// Compact age label: `3d ago`, `2w ago`, `5mo ago`, `2y ago`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = days_old(created_at, now);
    let weeks = days / 7.0;
    let months = days / 30.0;

    if days < 7.0 {
        format!("{}d ago", days.round() as i64)
    } else if weeks < 8.0 {
        format!("{}w ago", weeks.round() as i64)
    } else if months < 18.0 {
        format!("{}mo ago", months.round() as i64)
    } else {
        format!("{}y ago", (days / 365.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscussionPost;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn scored(id: &str, age_days: i64) -> ScoredPost {
        ScoredPost {
            post: DiscussionPost {
                id: id.to_string(),
                forum_name: "Concordia".to_string(),
                title: format!("COMP 232 post {id}"),
                url: format!("https://www.reddit.com/r/Concordia/comments/{id}/"),
                score: 12,
                comment_count: 3,
                created_at_utc: now() - Duration::days(age_days),
            },
            relevance: 1.0,
        }
    }

    #[test]
    fn relative_age_buckets() {
        let at = |days: i64| relative_age(now() - Duration::days(days), now());
        assert_eq!(at(0), "0d ago");
        assert_eq!(at(6), "6d ago");
        assert_eq!(at(7), "1w ago");
        assert_eq!(at(55), "8w ago");
        assert_eq!(at(56), "2mo ago");
        assert_eq!(at(300), "10mo ago");
        assert_eq!(at(539), "18mo ago");
        assert_eq!(at(540), "1y ago");
        assert_eq!(at(1_000), "3y ago");
    }

    #[test]
    fn digest_lists_at_most_five_posts() {
        let posts: Vec<ScoredPost> = (0..8).map(|i| scored(&format!("p{i}"), i)).collect();
        let digest = summarize(&posts, "COMP 232", Some(Topic::Exam), now());

        assert_eq!(digest.sources.len(), 5);
        let lines: Vec<&str> = digest.text.lines().collect();
        assert_eq!(lines.len(), 7, "heading + 5 bullets + disclaimer");
        assert_eq!(lines[0], "What students say about COMP 232 exams:");
        assert_eq!(
            lines[1],
            "- COMP 232 post p0 — 0d ago (r/Concordia) — https://www.reddit.com/r/Concordia/comments/p0/"
        );
        assert_eq!(lines[6], DISCLAIMER);
    }

    #[test]
    fn sources_mirror_the_bullets() {
        let digest = summarize(&[scored("x", 14)], "COMP 232", Some(Topic::Tips), now());
        assert_eq!(
            digest.sources,
            vec![SourceItem {
                title: "COMP 232 post x".to_string(),
                url: "https://www.reddit.com/r/Concordia/comments/x/".to_string(),
                relative_age: "2w ago".to_string(),
                forum_name: "Concordia".to_string(),
                score: 12,
            }]
        );
    }

    #[test]
    fn empty_digest_still_has_heading_and_disclaimer() {
        let digest = summarize(&[], "COMP 232", None, now());
        assert_eq!(
            digest.text,
            format!(
                "What students say about how hard COMP 232 is:\nNo recent discussions found.\n{DISCLAIMER}"
            )
        );
        assert!(digest.sources.is_empty());
    }
}
