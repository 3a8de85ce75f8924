//! Search-results pages: one candidate per profile link.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::dom::visible_text;
use super::{embedded, extract_fields, Scope};
use crate::types::ProfileCandidate;

/// Container tags that delimit one search result.
const BLOCK_TAGS: &[&str] = &["li", "article", "section", "div", "tr", "td"];
const RAW_TEXT_LIMIT: usize = 500;

static PROFILE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/professor/"]"#).expect("valid selector"));

static BLOCK_CHILD_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("li, article, section, div, tr, td, p").expect("valid selector")
});

static PROFILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/professor/(\d+)").expect("valid profile id regex"));

/// Numeric profile id from a `/professor/<id>` link.
#[must_use]
pub fn profile_id_from_url(url: &str) -> Option<String> {
    PROFILE_ID_RE
        .captures(url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every profile linked from a search-results page, in page order,
/// deduplicated by resolved link target.
#[must_use]
pub fn extract_candidates(html: &str, page_url: &str) -> Vec<ProfileCandidate> {
    let document = Html::parse_document(html);
    let payloads = embedded::find_payloads(html);
    let base = Url::parse(page_url).ok();

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for anchor in document.select(&PROFILE_LINK_SEL) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(profile_url) = resolve_url(base.as_ref(), href) else {
            continue;
        };
        if !seen.insert(profile_url.clone()) {
            continue;
        }

        let block = enclosing_block(anchor);
        let block_text = visible_text(block);
        let profile_id = profile_id_from_url(&profile_url);

        // Without an id there is no way to tell which embedded record
        // belongs to this block.
        let embedded: &[serde_json::Value] = if profile_id.is_some() {
            &payloads
        } else {
            &[]
        };

        let fields = extract_fields(&Scope {
            root: block,
            text: block_text.clone(),
            embedded,
            profile_id: profile_id.as_deref(),
        });

        candidates.push(ProfileCandidate::from_fields(
            fields,
            &visible_text(anchor),
            profile_url,
            block_text.chars().take(RAW_TEXT_LIMIT).collect(),
        ));
    }

    tracing::debug!(
        page_url,
        count = candidates.len(),
        "extracted profile candidates"
    );
    candidates
}

fn resolve_url(base: Option<&Url>, href: &str) -> Option<String> {
    let mut url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    url.set_fragment(None);
    Some(url.to_string())
}

/// The anchor itself when it wraps block content (card-style results),
/// otherwise its closest structural ancestor.
fn enclosing_block(anchor: ElementRef<'_>) -> ElementRef<'_> {
    if anchor.select(&BLOCK_CHILD_SEL).next().is_some() {
        return anchor;
    }
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| BLOCK_TAGS.contains(&el.value().name()))
        .unwrap_or(anchor)
}
