//! Reddit listing shapes and conversion into normalized posts.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{DiscussionPost, RawPost};

/// Reddit search listing wrapper.
#[derive(Debug, Deserialize)]
pub(super) struct Listing {
    pub(super) data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListingData {
    #[serde(default)]
    pub(super) children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Child {
    pub(super) data: PostData,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostData {
    pub(super) id: Option<String>,
    pub(super) title: Option<String>,
    pub(super) permalink: Option<String>,
    #[serde(default)]
    pub(super) score: i64,
    #[serde(default)]
    pub(super) num_comments: u64,
    pub(super) created_utc: Option<f64>,
}

/// Convert a listing child into a provider-native post.
///
/// Children without an id, a non-blank title, a permalink, or a timestamp
/// are skipped.
pub(super) fn to_raw_post(child: &Child) -> Option<RawPost> {
    let data = &child.data;
    let title = data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?;

    Some(RawPost {
        id: data.id.clone()?,
        title: title.to_string(),
        permalink: data.permalink.clone()?,
        score: data.score,
        comment_count: data.num_comments,
        created_at_epoch_secs: data.created_utc?,
    })
}

/// Normalize a provider post for the given forum.
pub(crate) fn to_discussion_post(raw: RawPost, forum: &str) -> Option<DiscussionPost> {
    #[allow(clippy::cast_possible_truncation)]
    let created_at_utc: DateTime<Utc> =
        DateTime::from_timestamp(raw.created_at_epoch_secs.trunc() as i64, 0)?;

    let url = if raw.permalink.starts_with("http") {
        raw.permalink
    } else {
        format!("https://www.reddit.com{}", raw.permalink)
    };

    Some(DiscussionPost {
        id: raw.id,
        forum_name: forum.to_string(),
        title: raw.title,
        url,
        score: raw.score,
        comment_count: raw.comment_count,
        created_at_utc,
    })
}
