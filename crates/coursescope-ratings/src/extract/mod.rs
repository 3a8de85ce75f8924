//! Profile extraction from ratings-site HTML.
//!
//! Fields are filled by an ordered cascade: embedded JSON payloads, then DOM
//! widget heuristics, then free-text regexes. A field set by an earlier
//! strategy is never overwritten by a later one.
//!
//! Everything here is synchronous. The parsed document is not `Send`, so
//! callers must finish extraction before their next `.await`.

mod candidates;
mod dom;
mod embedded;
mod text;

pub use candidates::{extract_candidates, profile_id_from_url};

use scraper::{ElementRef, Html};
use serde_json::Value;

use crate::types::ProfileFields;

/// The part of a page one extraction pass looks at.
pub(crate) struct Scope<'a> {
    pub(crate) root: ElementRef<'a>,
    pub(crate) text: String,
    pub(crate) embedded: &'a [Value],
    /// Restricts embedded records to this `legacyId`.
    pub(crate) profile_id: Option<&'a str>,
}

/// Run the three strategies over `scope` and merge their output.
pub(crate) fn extract_fields(scope: &Scope<'_>) -> ProfileFields {
    let strategies = [
        ("embedded", embedded::extract(scope.embedded, scope.profile_id)),
        ("dom", dom::extract(scope.root)),
        ("text", text::extract(&scope.text)),
    ];

    let mut fields = ProfileFields::default();
    for (strategy, found) in strategies {
        let found = found.sanitized();
        if found != ProfileFields::default() {
            tracing::trace!(strategy, ?found, "extraction strategy produced fields");
        }
        fields.fill_missing(found);
    }
    fields
}

/// Extract the instructor shown on a single profile page.
///
/// Embedded records are first matched on the profile id from `page_url`;
/// if none matches, the first rating-shaped record is used.
#[must_use]
pub fn extract_profile(html: &str, page_url: &str) -> ProfileFields {
    let document = Html::parse_document(html);
    let payloads = embedded::find_payloads(html);
    let profile_id = profile_id_from_url(page_url);

    let root = document.root_element();
    let text = dom::visible_text(root);

    let mut fields = extract_fields(&Scope {
        root,
        text,
        embedded: &payloads,
        profile_id: profile_id.as_deref(),
    });

    if profile_id.is_some() {
        fields.fill_missing(embedded::extract(&payloads, None).sanitized());
    }

    fields
}
