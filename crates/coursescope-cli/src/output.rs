//! Plain-text rendering for CLI output.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use coursescope_discussion::{relative_age, ScoredPost};
use coursescope_ratings::{ProfileCandidate, ProfileResult};

/// Format an optional metric, returning `"n/a"` when `None`.
fn fmt_metric(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}{suffix}"))
}

pub(crate) fn render_posts(posts: &[ScoredPost]) -> String {
    render_posts_at(posts, Utc::now())
}

fn render_posts_at(posts: &[ScoredPost], now: DateTime<Utc>) -> String {
    if posts.is_empty() {
        return "No matching posts found.\n".to_string();
    }

    let mut out = String::new();
    for (i, scored) in posts.iter().enumerate() {
        let post = &scored.post;
        let _ = writeln!(
            out,
            "{:>2}. [r/{}] {} ({} pts, {} comments, {})",
            i + 1,
            post.forum_name,
            post.title,
            post.score,
            post.comment_count,
            relative_age(post.created_at_utc, now),
        );
        let _ = writeln!(out, "    {}", post.url);
    }
    out
}

fn render_candidate(out: &mut String, candidate: &ProfileCandidate) {
    let _ = writeln!(out, "{}", candidate.name);
    let _ = writeln!(
        out,
        "  {} / {}",
        candidate.institution.as_deref().unwrap_or("unknown institution"),
        candidate.department.as_deref().unwrap_or("unknown department"),
    );
    let _ = writeln!(
        out,
        "  quality {}  difficulty {}  would take again {}  ratings {}",
        fmt_metric(candidate.quality_score, "/5"),
        fmt_metric(candidate.difficulty_score, "/5"),
        fmt_metric(candidate.would_take_again_pct, "%"),
        candidate
            .rating_count
            .map_or_else(|| "n/a".to_string(), |c| c.to_string()),
    );
    let _ = writeln!(out, "  {}", candidate.profile_url);
}

pub(crate) fn render_profile(result: &ProfileResult) -> String {
    let Some(top) = &result.top_candidate else {
        return if result.include_all_institutions {
            "No matching profiles found.\n".to_string()
        } else {
            format!(
                "No matching profiles found at {}.\n",
                result.institution_name
            )
        };
    };

    let mut out = String::new();
    render_candidate(&mut out, top);
    if !result.other_candidates.is_empty() {
        let _ = writeln!(out, "\nOther matches ({}):", result.other_candidates.len());
        for candidate in &result.other_candidates {
            render_candidate(&mut out, candidate);
        }
    }
    out
}
