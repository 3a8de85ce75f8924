//! Candidate filtering and ordering for a queried instructor name.

use crate::types::{ProfileCandidate, ProfileResult};

const EXACT_NAME_POINTS: u32 = 3;
const PREFIX_NAME_POINTS: u32 = 2;
const CONTAINS_NAME_POINTS: u32 = 1;
const MAX_SAMPLE_POINTS: u32 = 2;
const RATINGS_PER_SAMPLE_POINT: u32 = 10;
const HAS_RATINGS_POINTS: u32 = 1;

/// Pick the best candidate for `queried_name`.
///
/// Unless `include_all` is set, candidates from other institutions are
/// dropped; when that leaves nothing the unfiltered list is used instead.
#[must_use]
pub fn disambiguate(
    candidates: Vec<ProfileCandidate>,
    queried_name: &str,
    include_all: bool,
    institution_name: &str,
) -> ProfileResult {
    let pool = if include_all {
        candidates
    } else {
        let (local, other): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| institution_matches(c.institution.as_deref(), institution_name));
        if local.is_empty() {
            if !other.is_empty() {
                tracing::debug!(
                    institution = institution_name,
                    count = other.len(),
                    "no candidates at institution; using unfiltered set"
                );
            }
            other
        } else {
            local
        }
    };

    let mut ranked = pool;
    ranked.sort_by_key(|c| std::cmp::Reverse(candidate_score(c, queried_name)));

    let match_count = ranked.len();
    let mut ranked = ranked.into_iter();
    let top_candidate = ranked.next();

    ProfileResult {
        match_count,
        top_candidate,
        other_candidates: ranked.collect(),
        institution_name: institution_name.to_string(),
        include_all_institutions: include_all,
    }
}

/// Case-insensitive substring match in either direction.
#[must_use]
pub fn institution_matches(candidate: Option<&str>, target: &str) -> bool {
    let Some(candidate) = candidate.map(|c| c.trim().to_lowercase()) else {
        return false;
    };
    let target = target.trim().to_lowercase();
    if candidate.is_empty() || target.is_empty() {
        return false;
    }
    candidate.contains(&target) || target.contains(&candidate)
}

/// Name and sample-size score; higher is better.
#[must_use]
pub fn candidate_score(candidate: &ProfileCandidate, queried_name: &str) -> u32 {
    name_points(&candidate.name, queried_name) + sample_points(candidate.rating_count)
}

fn name_points(candidate_name: &str, queried_name: &str) -> u32 {
    let name = candidate_name.trim().to_lowercase();
    let query = queried_name.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    let mut points = 0;
    if name == query {
        points += EXACT_NAME_POINTS;
    }
    if name.starts_with(&query) {
        points += PREFIX_NAME_POINTS;
    }
    if name.contains(&query) {
        points += CONTAINS_NAME_POINTS;
    }
    points
}

fn sample_points(rating_count: Option<u32>) -> u32 {
    let count = rating_count.unwrap_or(0);
    let mut points = (count / RATINGS_PER_SAMPLE_POINT).min(MAX_SAMPLE_POINTS);
    if count > 0 {
        points += HAS_RATINGS_POINTS;
    }
    points
}
