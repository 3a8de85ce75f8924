//! Strategy 1: embedded JSON payloads (relay store, Next.js data, JSON-LD).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::numbers::{json_f64, json_u32};
use crate::types::ProfileFields;

/// Deepest nesting level the payload walk descends to.
const MAX_DEPTH: usize = 64;

const QUALITY_KEYS: &[&str] = &["avgRating", "overallRating", "avgQuality"];
const DIFFICULTY_KEYS: &[&str] = &["avgDifficulty", "difficulty"];
const TAKE_AGAIN_KEYS: &[&str] = &["wouldTakeAgainPercent", "wouldTakeAgainPct"];
const COUNT_KEYS: &[&str] = &["numRatings", "ratingCount", "ratingsCount"];

static RELAY_STORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.__RELAY_STORE__\s*=\s*").expect("valid relay store regex")
});

static NEXT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+id\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)
        .expect("valid next data regex")
});

static JSONLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid json-ld regex")
});

/// Parse every embedded JSON payload on the page, relay store first.
/// Payloads that fail to parse are skipped.
pub(crate) fn find_payloads(html: &str) -> Vec<Value> {
    let mut payloads = Vec::new();

    for m in RELAY_STORE_RE.find_iter(html) {
        if let Some(object) = extract_balanced_object(&html[m.end()..]) {
            if let Ok(value) = serde_json::from_str::<Value>(object) {
                payloads.push(value);
            }
        }
    }

    for re in [&*NEXT_DATA_RE, &*JSONLD_RE] {
        for cap in re.captures_iter(html) {
            let Some(body) = cap.get(1) else { continue };
            if let Ok(value) = serde_json::from_str::<Value>(body.as_str().trim()) {
                payloads.push(value);
            }
        }
    }

    payloads
}

/// Return the shortest prefix of `s` that is a complete `{...}` object,
/// honoring string literals and escapes.
fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fields from the first rating-shaped object across `payloads`.
///
/// With `profile_id` set only objects whose `legacyId` equals it count.
pub(crate) fn extract(payloads: &[Value], profile_id: Option<&str>) -> ProfileFields {
    payloads
        .iter()
        .find_map(|root| first_rating_object(root, profile_id).map(|obj| fields_from(obj, root)))
        .unwrap_or_default()
}

fn first_rating_object<'a>(
    root: &'a Value,
    profile_id: Option<&str>,
) -> Option<&'a Map<String, Value>> {
    // Children are pushed in reverse so they pop in document order.
    let mut stack: Vec<(&Value, usize)> = vec![(root, 0)];

    while let Some((value, depth)) = stack.pop() {
        let descend = depth < MAX_DEPTH;
        match value {
            Value::Object(map) => {
                if is_rating_shaped(map) && matches_profile(map, profile_id) {
                    return Some(map);
                }
                if descend {
                    stack.extend(map.values().rev().map(|child| (child, depth + 1)));
                }
            }
            Value::Array(items) if descend => {
                stack.extend(items.iter().rev().map(|child| (child, depth + 1)));
            }
            _ => {}
        }
    }

    None
}

fn is_rating_shaped(map: &Map<String, Value>) -> bool {
    [QUALITY_KEYS, DIFFICULTY_KEYS, TAKE_AGAIN_KEYS, COUNT_KEYS]
        .iter()
        .flat_map(|keys| keys.iter())
        .any(|key| map.get(*key).is_some_and(|v| !v.is_null()))
}

fn matches_profile(map: &Map<String, Value>, profile_id: Option<&str>) -> bool {
    let Some(expected) = profile_id else {
        return true;
    };
    match map.get("legacyId") {
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::String(s)) => s == expected,
        _ => false,
    }
}

fn first_of<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !v.is_null())
}

fn fields_from(map: &Map<String, Value>, root: &Value) -> ProfileFields {
    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    let name = match (text("firstName"), text("lastName")) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => text("name"),
    };

    ProfileFields {
        name,
        institution: map.get("school").and_then(|school| school_name(school, root)),
        department: text("department"),
        quality_score: first_of(map, QUALITY_KEYS).and_then(json_f64),
        difficulty_score: first_of(map, DIFFICULTY_KEYS).and_then(json_f64),
        would_take_again_pct: first_of(map, TAKE_AGAIN_KEYS).and_then(json_f64),
        rating_count: first_of(map, COUNT_KEYS).and_then(json_u32),
    }
}

/// Resolve `school` to a name, following a relay `__ref` pointer against the
/// payload root when needed.
fn school_name(school: &Value, root: &Value) -> Option<String> {
    match school {
        Value::String(name) => Some(name.clone()),
        Value::Object(map) => {
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                return Some(name.to_string());
            }
            let target = map.get("__ref").and_then(Value::as_str)?;
            root.get(target)?
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_relay_store_and_resolves_school_ref() {
        let html = r#"<script>
            window.__RELAY_STORE__ = {"VGVhY2hlci0x":{"__typename":"Teacher","legacyId":101,
              "firstName":"Jane","lastName":"Doe","department":"Computer Science",
              "school":{"__ref":"U2Nob29sLTE0MjI="},"avgRating":4.5,"avgDifficulty":2.9,
              "wouldTakeAgainPercent":88.2,"numRatings":41},
              "U2Nob29sLTE0MjI=":{"__typename":"School","name":"Concordia University"}};
            window.process = {};
        </script>"#;

        let payloads = find_payloads(html);
        assert_eq!(payloads.len(), 1);

        let fields = extract(&payloads, None);
        assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.institution.as_deref(), Some("Concordia University"));
        assert_eq!(fields.department.as_deref(), Some("Computer Science"));
        assert_eq!(fields.quality_score, Some(4.5));
        assert_eq!(fields.difficulty_score, Some(2.9));
        assert_eq!(fields.would_take_again_pct, Some(88.2));
        assert_eq!(fields.rating_count, Some(41));
    }

    #[test]
    fn profile_id_selects_matching_record() {
        let payload = json!({
            "a": {"legacyId": 1, "name": "Other Prof", "avgRating": 1.0},
            "b": {"legacyId": "2", "name": "Target Prof", "avgRating": "4.1", "ratingCount": 9}
        });

        let fields = extract(std::slice::from_ref(&payload), Some("2"));
        assert_eq!(fields.name.as_deref(), Some("Target Prof"));
        assert_eq!(fields.quality_score, Some(4.1));
        assert_eq!(fields.rating_count, Some(9));

        assert_eq!(extract(&[payload], Some("3")), ProfileFields::default());
    }

    #[test]
    fn aliases_and_nested_payloads() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">
            {"props":{"pageProps":{"teacher":{"name":"Sam Lee","overallRating":3.7,
            "difficulty":3.0,"wouldTakeAgainPct":-1,"ratingsCount":"12"}}}}
        </script>"#;

        let fields = extract(&find_payloads(html), None);
        assert_eq!(fields.name.as_deref(), Some("Sam Lee"));
        assert_eq!(fields.quality_score, Some(3.7));
        assert_eq!(fields.difficulty_score, Some(3.0));
        assert_eq!(fields.would_take_again_pct, Some(-1.0));
        assert_eq!(fields.rating_count, Some(12));
    }

    #[test]
    fn first_record_in_page_order_wins() {
        let payload: Value = serde_json::from_str(
            r#"{"zeta":{"name":"First In Doc","avgRating":4.5},
                "alpha":{"name":"Second In Doc","avgRating":2.0}}"#,
        )
        .unwrap();

        let fields = extract(&[payload], None);
        assert_eq!(fields.name.as_deref(), Some("First In Doc"));
        assert_eq!(fields.quality_score, Some(4.5));
    }

    #[test]
    fn walk_is_depth_first() {
        let payload: Value = serde_json::from_str(
            r#"{"a":{"x":{"name":"Deep First","avgRating":3.0}},
                "b":{"name":"Shallow Later","avgRating":5.0}}"#,
        )
        .unwrap();

        let fields = extract(&[payload], None);
        assert_eq!(fields.name.as_deref(), Some("Deep First"));
    }

    #[test]
    fn walk_stops_at_depth_cap() {
        let mut nested = json!({"avgRating": 4.0});
        for _ in 0..(MAX_DEPTH + 5) {
            nested = json!({ "next": nested });
        }
        assert_eq!(extract(&[nested], None), ProfileFields::default());
    }

    #[test]
    fn malformed_payloads_are_skipped() {
        let html = r#"<script type="application/ld+json">{not json</script>
            <script>window.__RELAY_STORE__ = {"unterminated": </script>"#;
        assert!(find_payloads(html).is_empty());
    }
}
