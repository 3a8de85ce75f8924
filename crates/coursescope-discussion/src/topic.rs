//! Topic classification for free-text course questions.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Topic;

static INSTRUCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:profs?|professors?|teachers?|instructors?|lecturers?|taught|teaches|take\s+(?:it\s+)?with|section\s+with)\b",
    )
    .expect("valid instructor regex")
});

static EXAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:exams?|finals?|midterms?|quiz(?:zes)?|tests?)\b")
        .expect("valid exam regex")
});

static TIPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:tips?|advice|advise|suggestions?|resources?|labs?|study(?:ing)?|how\s+to\s+(?:pass|prepare|succeed|do\s+well))\b",
    )
    .expect("valid tips regex")
});

/// Infer the topic of a question.
///
/// Patterns are tried in a fixed order (instructor, exam, tips) and the first
/// match wins; anything else is a difficulty question.
#[must_use]
pub fn classify(question: &str) -> Topic {
    if INSTRUCTOR_RE.is_match(question) {
        Topic::Instructor
    } else if EXAM_RE.is_match(question) {
        Topic::Exam
    } else if TIPS_RE.is_match(question) {
        Topic::Tips
    } else {
        Topic::Difficulty
    }
}

/// Provider keywords for a topic, used in the search expression.
#[must_use]
pub fn topic_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Difficulty => &[
            "hard",
            "difficult",
            "easy",
            "workload",
            "fail",
            "curve",
            "average",
            "challenging",
        ],
        Topic::Instructor => &[
            "prof",
            "professor",
            "teacher",
            "instructor",
            "lecturer",
            "section",
            "ratemyprof",
        ],
        Topic::Exam => &["exam", "final", "midterm", "quiz", "test", "grading"],
        Topic::Tips => &["tips", "advice", "study", "resources", "prepare", "notes"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructor_question() {
        assert_eq!(classify("who's the best prof"), Topic::Instructor);
        assert_eq!(classify("Should I take it with Smith?"), Topic::Instructor);
    }

    #[test]
    fn exam_question() {
        assert_eq!(classify("final exam format"), Topic::Exam);
        assert_eq!(classify("Are the midterms open book?"), Topic::Exam);
    }

    #[test]
    fn tips_question() {
        assert_eq!(classify("any tips for labs"), Topic::Tips);
        assert_eq!(classify("how to prepare for this class"), Topic::Tips);
    }

    #[test]
    fn falls_back_to_difficulty() {
        assert_eq!(classify("is it hard"), Topic::Difficulty);
        assert_eq!(classify(""), Topic::Difficulty);
    }

    #[test]
    fn instructor_wins_over_exam_when_both_match() {
        assert_eq!(
            classify("which prof has the easiest final"),
            Topic::Instructor
        );
    }

    #[test]
    fn exam_wins_over_tips_when_both_match() {
        assert_eq!(classify("tips for the midterm"), Topic::Exam);
    }

    #[test]
    fn word_boundaries_prevent_partial_matches() {
        // "contest" contains "test", "profile" contains "prof".
        assert_eq!(classify("contest profile"), Topic::Difficulty);
    }

    #[test]
    fn every_topic_has_keywords() {
        for topic in [
            Topic::Difficulty,
            Topic::Instructor,
            Topic::Exam,
            Topic::Tips,
        ] {
            assert!(!topic_keywords(topic).is_empty(), "{topic} has no keywords");
        }
    }
}
