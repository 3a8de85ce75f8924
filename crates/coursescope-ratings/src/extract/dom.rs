//! Strategy 2: rating widgets located by class-name patterns and labels.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::numbers::{first_count, first_percent, first_rating};
use crate::types::ProfileFields;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static QUALITY_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="RatingValue__Numerator"], [class*="CardNumRating__CardNumRatingNumber"]"#)
});

static COUNT_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="RatingValue__NumRatings"], [class*="CardNumRating__CardNumRatingCount"]"#)
});

static NAME_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="NameTitle__Name"], [class*="CardName__StyledCardName"]"#)
});

static DEPARTMENT_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        r#"[class*="TeacherDepartment__StyledDepartmentLink"], [class*="CardSchool__Department"]"#,
    )
});

static SCHOOL_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="CardSchool__School"], [class*="NameTitle__Title"] a[href*="/school"]"#)
});

/// Containers that hold one labelled figure, e.g. `88%` + `Would take again`.
static FEEDBACK_SEL: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="FeedbackItem__StyledFeedbackItem"], [class*="CardFeedback__CardFeedbackItem"]"#)
});

const DIFFICULTY_LABEL: &str = "level of difficulty";
const TAKE_AGAIN_LABEL: &str = "would take again";

/// Read rating widgets under `root`.
pub(crate) fn extract(root: ElementRef<'_>) -> ProfileFields {
    let mut fields = ProfileFields {
        name: first_text(root, &NAME_SEL),
        institution: first_text(root, &SCHOOL_SEL),
        department: first_text(root, &DEPARTMENT_SEL).map(|d| strip_department_suffix(&d)),
        quality_score: root
            .select(&QUALITY_SEL)
            .find_map(|el| first_rating(&element_text(el))),
        rating_count: root
            .select(&COUNT_SEL)
            .find_map(|el| first_count(&element_text(el))),
        ..ProfileFields::default()
    };

    for item in root.select(&FEEDBACK_SEL) {
        let text = element_text(item);
        let lower = text.to_lowercase();
        if fields.difficulty_score.is_none() && lower.contains(DIFFICULTY_LABEL) {
            fields.difficulty_score = first_rating(&text);
        } else if fields.would_take_again_pct.is_none() && lower.contains(TAKE_AGAIN_LABEL) {
            fields.would_take_again_pct = first_percent(&text);
        }
    }

    fields
}

/// Whitespace-collapsed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`element_text`] but skipping `script`, `style` and `noscript`
/// contents.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| matches!(el.value().name(), "script" | "style" | "noscript"));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

fn first_text(root: ElementRef<'_>, sel: &Selector) -> Option<String> {
    root.select(sel)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn strip_department_suffix(text: &str) -> String {
    const SUFFIX: &str = " department";
    let trimmed = text.trim();
    let cut = trimmed.len().saturating_sub(SUFFIX.len());
    match trimmed.get(cut..) {
        Some(tail) if cut > 0 && tail.eq_ignore_ascii_case(SUFFIX) => {
            trimmed[..cut].trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}
