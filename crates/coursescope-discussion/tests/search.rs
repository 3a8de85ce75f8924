//! Multi-forum search behavior with an in-memory provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use coursescope_discussion::{
    DiscussionError, DiscussionQuery, DiscussionSearch, DiscussionService, RawPost,
    SearchRequest, SearchSettings,
};

enum ForumBehavior {
    Posts(Vec<RawPost>),
    Fail,
    Hang,
}

struct FakeSearch {
    forums: HashMap<String, ForumBehavior>,
}

#[async_trait]
impl DiscussionSearch for FakeSearch {
    async fn search(
        &self,
        forum: &str,
        _request: &SearchRequest,
    ) -> Result<Vec<RawPost>, DiscussionError> {
        match self.forums.get(forum) {
            Some(ForumBehavior::Posts(posts)) => Ok(posts.clone()),
            Some(ForumBehavior::Fail) => Err(DiscussionError::Reddit("boom".to_string())),
            Some(ForumBehavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

#[allow(clippy::cast_precision_loss)]
fn raw(id: &str, title: &str, age_days: i64) -> RawPost {
    RawPost {
        id: id.to_string(),
        title: title.to_string(),
        permalink: format!("/r/test/comments/{id}/"),
        score: 5,
        comment_count: 2,
        created_at_epoch_secs: (now().timestamp() - age_days * 86_400) as f64,
    }
}

fn settings(forum_ms: u64, overall_ms: u64) -> SearchSettings {
    SearchSettings {
        forum_timeout: Duration::from_millis(forum_ms),
        overall_timeout: Duration::from_millis(overall_ms),
    }
}

fn service(forums: Vec<(&str, ForumBehavior)>, settings: SearchSettings) -> DiscussionService {
    let names = forums.iter().map(|(name, _)| (*name).to_string()).collect();
    let searcher = FakeSearch {
        forums: forums
            .into_iter()
            .map(|(name, behavior)| (name.to_string(), behavior))
            .collect(),
    };
    DiscussionService::new(Arc::new(searcher), names, settings)
}

fn course_query() -> DiscussionQuery {
    DiscussionQuery {
        course_id: "COMP 232".to_string(),
        ..DiscussionQuery::default()
    }
}

#[tokio::test]
async fn failing_and_hanging_forums_are_isolated() {
    let svc = service(
        vec![
            (
                "Concordia",
                ForumBehavior::Posts(vec![raw("a", "COMP 232 hard?", 3)]),
            ),
            ("Broken", ForumBehavior::Fail),
            ("Stuck", ForumBehavior::Hang),
        ],
        settings(50, 2_000),
    );

    let response = svc
        .query_at(&course_query(), now())
        .await
        .expect("healthy forum still answers");

    assert_eq!(response.count, 1);
    assert_eq!(response.posts[0].post.id, "a");
    assert_eq!(response.posts[0].post.forum_name, "Concordia");
}

#[tokio::test]
async fn outer_deadline_returns_timeout_not_partial_results() {
    let svc = service(
        vec![
            (
                "Concordia",
                ForumBehavior::Posts(vec![raw("a", "COMP 232 hard?", 3)]),
            ),
            ("Stuck", ForumBehavior::Hang),
        ],
        settings(5_000, 50),
    );

    let err = svc
        .query_at(&course_query(), now())
        .await
        .expect_err("outer deadline fires");

    assert!(
        matches!(err, DiscussionError::Timeout(_)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn filters_by_title_cutoff_and_limit() {
    let svc = service(
        vec![(
            "Concordia",
            ForumBehavior::Posts(vec![
                raw("on-topic", "COMP-232 exam tips", 1),
                raw("compact", "comp232 review", 2),
                raw("other-course", "COMP 233 is great", 1),
                raw("too-old", "COMP 232 in 2019", 900),
                raw("third", "Taking COMP 232", 4),
            ]),
        )],
        settings(500, 2_000),
    );

    let query = DiscussionQuery {
        limit: Some(2),
        window_days: Some(30),
        ..course_query()
    };
    let response = svc.query_at(&query, now()).await.expect("search succeeds");

    let ids: Vec<&str> = response.posts.iter().map(|p| p.post.id.as_str()).collect();
    assert_eq!(ids, vec!["on-topic", "compact"]);
    assert_eq!(response.count, 2);
}

#[tokio::test]
async fn duplicate_urls_across_forums_are_dropped() {
    let shared = raw("same", "COMP 232 advice", 1);
    let svc = service(
        vec![
            ("Concordia", ForumBehavior::Posts(vec![shared.clone()])),
            ("Montreal", ForumBehavior::Posts(vec![shared])),
        ],
        settings(500, 2_000),
    );

    let response = svc
        .query_at(&course_query(), now())
        .await
        .expect("search succeeds");
    assert_eq!(response.count, 1);
}

#[tokio::test]
async fn blank_course_id_is_rejected_before_searching() {
    let svc = service(vec![("Stuck", ForumBehavior::Hang)], settings(5_000, 5_000));

    let err = svc
        .query_at(
            &DiscussionQuery {
                course_id: "   ".to_string(),
                ..DiscussionQuery::default()
            },
            now(),
        )
        .await
        .expect_err("blank course id is invalid");

    assert!(matches!(err, DiscussionError::InvalidInput(_)));
}

#[tokio::test]
async fn digest_uses_the_top_five_posts() {
    let posts = (0..7)
        .map(|i| raw(&format!("p{i}"), &format!("COMP 232 thread {i}"), i))
        .collect();
    let svc = service(
        vec![("Concordia", ForumBehavior::Posts(posts))],
        settings(500, 2_000),
    );

    let query = DiscussionQuery {
        question: Some("any tips for labs".to_string()),
        ..course_query()
    };
    let digest = svc.digest_at(&query, now()).await.expect("digest builds");

    assert_eq!(digest.sources.len(), 5);
    assert!(digest.text.starts_with("Student tips for COMP 232:"));
    assert_eq!(digest.sources[0].relative_age, "0d ago");
}

struct CountingSearch {
    calls: AtomicUsize,
    posts: Vec<RawPost>,
}

#[async_trait]
impl DiscussionSearch for CountingSearch {
    async fn search(
        &self,
        _forum: &str,
        _request: &SearchRequest,
    ) -> Result<Vec<RawPost>, DiscussionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.posts.clone())
    }
}

#[allow(clippy::cast_precision_loss)]
fn raw_at_secs(id: &str, secs_before_now: i64) -> RawPost {
    RawPost {
        created_at_epoch_secs: (now().timestamp() - secs_before_now) as f64,
        ..raw(id, "COMP 232 question", 0)
    }
}

#[tokio::test]
async fn cutoff_is_inclusive() {
    let svc = service(
        vec![(
            "Concordia",
            ForumBehavior::Posts(vec![
                raw_at_secs("on-cutoff", 7 * 86_400),
                raw_at_secs("past-cutoff", 7 * 86_400 + 1),
            ]),
        )],
        settings(500, 2_000),
    );

    let query = DiscussionQuery {
        window_days: Some(7),
        ..course_query()
    };
    let response = svc.query_at(&query, now()).await.expect("search succeeds");

    let ids: Vec<&str> = response.posts.iter().map(|p| p.post.id.as_str()).collect();
    assert_eq!(ids, vec!["on-cutoff"]);
}

#[tokio::test]
async fn forums_differing_only_in_case_are_searched_once() {
    let searcher = Arc::new(CountingSearch {
        calls: AtomicUsize::new(0),
        posts: vec![raw("a", "COMP 232 hard?", 1)],
    });
    let svc = DiscussionService::new(
        searcher.clone(),
        vec!["Concordia".to_string(), "concordia".to_string()],
        settings(500, 2_000),
    );

    let response = svc
        .query_at(&course_query(), now())
        .await
        .expect("search succeeds");

    assert_eq!(searcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.count, 1);
}

#[tokio::test]
async fn huge_window_keeps_every_post() {
    let svc = service(
        vec![(
            "Concordia",
            ForumBehavior::Posts(vec![
                raw("recent", "COMP 232 hard?", 1),
                raw("ancient", "COMP 232 in 2010", 5_000),
            ]),
        )],
        settings(500, 2_000),
    );

    let query = DiscussionQuery {
        window_days: Some(100_000_000),
        ..course_query()
    };
    let response = svc.query_at(&query, now()).await.expect("search succeeds");

    assert_eq!(response.count, 2);
}
