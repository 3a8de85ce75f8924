//! Integration tests for `RedditClient` against a local `wiremock` server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coursescope_discussion::{
    DiscussionError, DiscussionSearch, RedditClient, RedditConfig, SearchRequest, SortOrder,
    TimeWindow,
};

fn config(server: &MockServer, credentials: Option<(&str, &str)>) -> RedditConfig {
    RedditConfig {
        user_agent: "coursescope-test/0.1".to_string(),
        credentials: credentials.map(|(id, secret)| (id.to_string(), secret.to_string())),
        api_base_url: server.uri(),
        auth_base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
    }
}

fn request() -> SearchRequest {
    SearchRequest {
        query: "(\"COMP 232\" OR COMP232)".to_string(),
        sort: SortOrder::New,
        window: TimeWindow::Year,
        limit: 25,
    }
}

fn listing() -> serde_json::Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "a1",
                        "title": "COMP 232 midterm was brutal",
                        "permalink": "/r/Concordia/comments/a1/comp_232_midterm/",
                        "score": 31,
                        "num_comments": 12,
                        "created_utc": 1_717_000_000.0
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "a2",
                        "title": "",
                        "permalink": "/r/Concordia/comments/a2/",
                        "created_utc": 1_717_000_100.0
                    }
                }
            ]
        }
    })
}

#[tokio::test]
async fn anonymous_search_hits_public_json_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/Concordia/search.json"))
        .and(query_param("restrict_sr", "true"))
        .and(query_param("sort", "new"))
        .and(query_param("t", "year"))
        .and(query_param("limit", "25"))
        .and(query_param("type", "link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;

    let client = RedditClient::new(config(&server, None)).expect("client builds");
    let posts = client
        .search("Concordia", &request())
        .await
        .expect("search succeeds");

    assert_eq!(posts.len(), 1, "blank-title child is skipped");
    assert_eq!(posts[0].id, "a1");
    assert_eq!(posts[0].score, 31);
    assert_eq!(posts[0].comment_count, 12);
}

#[tokio::test]
async fn authenticated_search_reuses_cached_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/Concordia/search"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(2)
        .mount(&server)
        .await;

    let client =
        RedditClient::new(config(&server, Some(("id", "secret")))).expect("client builds");
    assert!(client.is_authenticated());

    for _ in 0..2 {
        let posts = client
            .search("Concordia", &request())
            .await
            .expect("search succeeds");
        assert_eq!(posts.len(), 1);
    }
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/Concordia/search.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&server)
        .await;

    let client = RedditClient::new(config(&server, None)).expect("client builds");
    let err = client
        .search("Concordia", &request())
        .await
        .expect_err("429 is an error");

    assert!(
        matches!(err, DiscussionError::RateLimited { retry_after_secs: 17 }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn server_error_maps_to_reddit_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/Concordia/search.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = RedditClient::new(config(&server, None)).expect("client builds");
    let err = client
        .search("Concordia", &request())
        .await
        .expect_err("503 is an error");

    assert!(
        matches!(err, DiscussionError::Reddit(ref msg) if msg.contains("503")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn failed_token_exchange_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client =
        RedditClient::new(config(&server, Some(("id", "wrong")))).expect("client builds");
    let err = client
        .search("Concordia", &request())
        .await
        .expect_err("token failure is an error");

    assert!(
        matches!(err, DiscussionError::Reddit(ref msg) if msg.contains("token exchange")),
        "unexpected error: {err:?}"
    );
}
