//! Strategy 3: regex fallback over the visible text of a page or block.

use std::sync::LazyLock;

use regex::Regex;

use crate::numbers::first_count;
use crate::types::ProfileFields;

static TAKE_AGAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-?\d{1,3}(?:\.\d+)?)\s*%\s*would\s+take\s+again")
        .expect("valid take-again regex")
});

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*)\s+ratings?\b").expect("valid count regex"));

static DEPARTMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bin\s+the\s+([A-Za-z][A-Za-z&,.' -]{0,80}?)\s+department\b")
        .expect("valid department regex")
});

static QUALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d(?:\.\d)?)\s*(?:/\s*5\b|out\s+of\s+5\b)").expect("valid quality regex")
});

static DIFFICULTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d(?:\.\d)?)\s*level\s+of\s+difficulty").expect("valid difficulty regex")
});

/// Pull whatever the fixed phrasings reveal from collapsed page text.
pub(crate) fn extract(text: &str) -> ProfileFields {
    ProfileFields {
        department: capture(&DEPARTMENT_RE, text).map(|d| d.trim().to_string()),
        quality_score: capture(&QUALITY_RE, text).and_then(|v| v.parse().ok()),
        difficulty_score: capture(&DIFFICULTY_RE, text).and_then(|v| v.parse().ok()),
        would_take_again_pct: capture(&TAKE_AGAIN_RE, text).and_then(|v| v.parse().ok()),
        rating_count: capture(&COUNT_RE, text).and_then(first_count),
        ..ProfileFields::default()
    }
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}
