//! Search-expression building and course-code matching.

use crate::topic::topic_keywords;
use crate::types::Topic;

/// Spelling variants of a course identifier, in a fixed order:
/// exact, whitespace-removed, hyphenated, lowercase, lowercase-compacted.
///
/// Only whitespace is normalized; exact duplicates are emitted once.
#[must_use]
pub fn course_variants(course_id: &str) -> Vec<String> {
    let exact = collapse_whitespace(course_id);
    let compact = exact.replace(' ', "");
    let hyphenated = exact.replace(' ', "-");
    let lower = exact.to_lowercase();
    let lower_compact = compact.to_lowercase();

    let mut variants = vec![exact, compact, hyphenated, lower, lower_compact];

    let mut seen = std::collections::HashSet::new();
    variants.retain(|v| !v.is_empty() && seen.insert(v.clone()));
    variants
}

/// Build the provider search expression for a course and optional topic.
///
/// `("COMP 232" OR COMP232 OR ...) AND (hard OR difficult OR ...)`; without a
/// topic only the course clause is emitted.
#[must_use]
pub fn synthesize(course_id: &str, topic: Option<Topic>) -> String {
    let course_clause = course_variants(course_id)
        .iter()
        .map(|v| quote_term(v))
        .collect::<Vec<_>>()
        .join(" OR ");

    let keyword_clause = topic
        .map(|t| topic_keywords(t).join(" OR "))
        .unwrap_or_default();

    if keyword_clause.is_empty() {
        format!("({course_clause})")
    } else {
        format!("({course_clause}) AND ({keyword_clause})")
    }
}

/// Lowercase needles used by the hard title filter: spaced and compacted,
/// with hyphens read as spaces.
#[must_use]
pub fn title_match_variants(course_id: &str) -> Vec<String> {
    let spaced = collapse_whitespace(&course_id.replace('-', " ")).to_lowercase();
    let compact = spaced.replace(' ', "");
    let mut variants = vec![spaced, compact];
    variants.retain(|v| !v.is_empty());
    variants.dedup();
    variants
}

/// Whether a post title mentions the course at all.
#[must_use]
pub fn title_mentions_course(title: &str, needles: &[String]) -> bool {
    let normalized = title.to_lowercase().replace('-', " ");
    needles.iter().any(|needle| normalized.contains(needle.as_str()))
}

fn quote_term(term: &str) -> String {
    if term.contains(char::is_whitespace) {
        format!("\"{term}\"")
    } else {
        term.to_string()
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_cover_all_five_spellings() {
        assert_eq!(
            course_variants("COMP 232"),
            vec!["COMP 232", "COMP232", "COMP-232", "comp 232", "comp232"]
        );
    }

    #[test]
    fn variants_collapse_runs_of_whitespace() {
        assert_eq!(course_variants("  COMP   232 ")[0], "COMP 232");
    }

    #[test]
    fn lowercase_input_does_not_repeat_variants() {
        assert_eq!(
            course_variants("comp 232"),
            vec!["comp 232", "comp232", "comp-232"]
        );
    }

    #[test]
    fn expression_contains_every_variant_as_a_disjunct() {
        let expr = synthesize("COMP 232", None);
        assert_eq!(
            expr,
            "(\"COMP 232\" OR COMP232 OR COMP-232 OR \"comp 232\" OR comp232)"
        );
    }

    #[test]
    fn expression_adds_topic_clause() {
        let expr = synthesize("COMP 232", Some(Topic::Exam));
        assert!(expr.ends_with("AND (exam OR final OR midterm OR quiz OR test OR grading)"));
        assert!(expr.contains("COMP-232"));
    }

    #[test]
    fn title_filter_reads_hyphens_as_spaces() {
        let needles = title_match_variants("COMP 232");
        assert!(title_mentions_course("Thoughts on COMP-232?", &needles));
        assert!(title_mentions_course("comp232 midterm", &needles));
        assert!(title_mentions_course("Taking Comp 232 next fall", &needles));
        assert!(!title_mentions_course("COMP 233 is great", &needles));
    }
}
