use serde::{Deserialize, Serialize};

/// Partial profile data produced by one extraction strategy.
///
/// Every field is optional; strategies are composed with
/// [`ProfileFields::fill_missing`] so the first strategy to produce a value
/// wins it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub quality_score: Option<f64>,
    pub difficulty_score: Option<f64>,
    pub would_take_again_pct: Option<f64>,
    pub rating_count: Option<u32>,
}

impl ProfileFields {
    /// Copy over every field of `other` that is still empty here.
    pub fn fill_missing(&mut self, other: ProfileFields) {
        fill(&mut self.name, other.name);
        fill(&mut self.institution, other.institution);
        fill(&mut self.department, other.department);
        fill(&mut self.quality_score, other.quality_score);
        fill(&mut self.difficulty_score, other.difficulty_score);
        fill(&mut self.would_take_again_pct, other.would_take_again_pct);
        fill(&mut self.rating_count, other.rating_count);
    }

    /// Drop values that cannot be real readings: blank strings, negative
    /// would-take-again percentages (the site's "no data" marker) and scores
    /// outside their scale.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for text in [&mut self.name, &mut self.institution, &mut self.department] {
            if let Some(value) = text.take() {
                let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
                if !collapsed.is_empty() {
                    *text = Some(collapsed);
                }
            }
        }
        self.quality_score = self.quality_score.filter(|v| (0.0..=5.0).contains(v));
        self.difficulty_score = self.difficulty_score.filter(|v| (0.0..=5.0).contains(v));
        self.would_take_again_pct = self
            .would_take_again_pct
            .filter(|v| (0.0..=100.0).contains(v));
        self
    }

    /// Whether any rating metric is still unknown.
    #[must_use]
    pub fn missing_metrics(&self) -> bool {
        self.quality_score.is_none()
            || self.difficulty_score.is_none()
            || self.would_take_again_pct.is_none()
            || self.rating_count.is_none()
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// One instructor profile as seen on a ratings page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCandidate {
    pub name: String,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub quality_score: Option<f64>,
    pub difficulty_score: Option<f64>,
    pub would_take_again_pct: Option<f64>,
    pub rating_count: Option<u32>,
    pub profile_url: String,
    #[serde(skip_serializing)]
    pub raw_block_text: String,
}

impl ProfileCandidate {
    /// Build a candidate from extracted fields; `fallback_name` is used when
    /// no strategy produced a name.
    #[must_use]
    pub fn from_fields(
        fields: ProfileFields,
        fallback_name: &str,
        profile_url: String,
        raw_block_text: String,
    ) -> Self {
        Self {
            name: fields
                .name
                .unwrap_or_else(|| fallback_name.trim().to_string()),
            institution: fields.institution,
            department: fields.department,
            quality_score: fields.quality_score,
            difficulty_score: fields.difficulty_score,
            would_take_again_pct: fields.would_take_again_pct,
            rating_count: fields.rating_count,
            profile_url,
            raw_block_text,
        }
    }

    /// Current values as a field set.
    #[must_use]
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            name: Some(self.name.clone()).filter(|n| !n.is_empty()),
            institution: self.institution.clone(),
            department: self.department.clone(),
            quality_score: self.quality_score,
            difficulty_score: self.difficulty_score,
            would_take_again_pct: self.would_take_again_pct,
            rating_count: self.rating_count,
        }
    }

    /// Fill fields that are still unknown. Known values are never replaced.
    pub fn merge_missing(&mut self, extra: ProfileFields) {
        let mut fields = self.fields();
        fields.fill_missing(extra);
        if self.name.is_empty() {
            if let Some(name) = fields.name {
                self.name = name;
            }
        }
        self.institution = fields.institution;
        self.department = fields.department;
        self.quality_score = fields.quality_score;
        self.difficulty_score = fields.difficulty_score;
        self.would_take_again_pct = fields.would_take_again_pct;
        self.rating_count = fields.rating_count;
    }
}

/// Outcome of a profile lookup. `top_candidate` is `None` exactly when
/// `match_count` is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResult {
    pub match_count: usize,
    pub top_candidate: Option<ProfileCandidate>,
    pub other_candidates: Vec<ProfileCandidate>,
    pub institution_name: String,
    pub include_all_institutions: bool,
}

impl ProfileResult {
    #[must_use]
    pub fn empty(institution_name: &str, include_all_institutions: bool) -> Self {
        Self {
            match_count: 0,
            top_candidate: None,
            other_candidates: Vec::new(),
            institution_name: institution_name.to_string(),
            include_all_institutions,
        }
    }
}

/// Consumer-facing profile lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    pub name: String,
    #[serde(default)]
    pub include_all_institutions: bool,
}
