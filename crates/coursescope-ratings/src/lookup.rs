//! Cached instructor profile lookup against the ratings site.

use std::sync::Arc;
use std::time::Duration;

use coursescope_core::{with_deadline, AppConfig};
use futures::future::join_all;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::cache::{cache_key, ProfileCache, TtlCache};
use crate::disambiguate::disambiguate;
use crate::error::RatingsError;
use crate::extract::{extract_candidates, extract_profile};
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::types::{ProfileCandidate, ProfileFields, ProfileQuery, ProfileResult};

/// Where and how long to look for profiles.
#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub base_url: String,
    pub school_id: String,
    pub institution_name: String,
    pub page_timeout: Duration,
    pub overall_timeout: Duration,
    /// Top candidates whose profile pages are fetched to fill missing fields.
    pub enrich_limit: usize,
}

impl LookupSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.ratings_base_url.clone(),
            school_id: config.ratings_school_id.clone(),
            institution_name: config.institution_name.clone(),
            page_timeout: config.page_timeout(),
            overall_timeout: config.profile_timeout(),
            enrich_limit: config.profile_enrich_limit,
        }
    }
}

enum Outcome {
    /// The search page was read; safe to cache, even with zero matches.
    Complete(ProfileResult),
    /// The search page could not be fetched.
    SearchUnavailable(ProfileResult),
}

/// Profile lookups with a read-through cache in front.
pub struct ProfileLookup {
    fetcher: Arc<dyn PageFetcher>,
    cache: Arc<dyn ProfileCache>,
    settings: LookupSettings,
}

impl ProfileLookup {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        cache: Arc<dyn ProfileCache>,
        settings: LookupSettings,
    ) -> Self {
        Self {
            fetcher,
            cache,
            settings,
        }
    }

    /// HTTP-backed lookup with a TTL cache, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingsError::Http`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, RatingsError> {
        Ok(Self::new(
            Arc::new(HttpPageFetcher::new(&config.user_agent)?),
            Arc::new(TtlCache::new(config.cache_ttl())),
            LookupSettings::from_app_config(config),
        ))
    }

    #[must_use]
    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    /// Search-results URL for `name`, scoped to the configured school unless
    /// `include_all` is set.
    #[must_use]
    pub fn search_url(&self, name: &str, include_all: bool) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        let q = utf8_percent_encode(name.trim(), NON_ALPHANUMERIC);
        if include_all {
            format!("{base}/search/professors?q={q}")
        } else {
            format!("{base}/search/professors/{}?q={q}", self.settings.school_id)
        }
    }

    /// Look up an instructor by name.
    ///
    /// A search page that cannot be fetched yields a zero-match result which
    /// is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`RatingsError::InvalidInput`] for a blank name and
    /// [`RatingsError::Timeout`] if the lookup exceeds its overall deadline.
    pub async fn lookup(&self, query: &ProfileQuery) -> Result<ProfileResult, RatingsError> {
        let name = query.name.trim();
        if name.is_empty() {
            return Err(RatingsError::InvalidInput("name is required".to_string()));
        }
        let include_all = query.include_all_institutions;

        let key = cache_key(name, include_all);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "profile cache hit");
            return Ok(hit);
        }

        let outcome = with_deadline(
            "profile_lookup",
            self.settings.overall_timeout,
            self.compute(name, include_all),
        )
        .await?;

        match outcome {
            Outcome::Complete(result) => {
                tracing::debug!(
                    key = %key,
                    count = result.match_count,
                    "caching profile lookup"
                );
                self.cache.set(key, result.clone());
                Ok(result)
            }
            Outcome::SearchUnavailable(result) => Ok(result),
        }
    }

    async fn compute(&self, name: &str, include_all: bool) -> Outcome {
        let institution = self.settings.institution_name.as_str();
        let url = self.search_url(name, include_all);

        let Some(html) = self.fetch_page(&url).await else {
            return Outcome::SearchUnavailable(ProfileResult::empty(institution, include_all));
        };

        let candidates = extract_candidates(&html, &url);
        let preliminary = disambiguate(candidates, name, include_all, institution);

        let mut ordered: Vec<ProfileCandidate> = preliminary
            .top_candidate
            .into_iter()
            .chain(preliminary.other_candidates)
            .collect();
        let enrich_count = self.settings.enrich_limit.min(ordered.len());
        self.enrich(&mut ordered[..enrich_count]).await;

        Outcome::Complete(disambiguate(ordered, name, include_all, institution))
    }

    /// Fetch profile pages concurrently and fill fields the search page left
    /// empty.
    async fn enrich(&self, candidates: &mut [ProfileCandidate]) {
        let pages = candidates.iter().map(|candidate| {
            let url = candidate.profile_url.clone();
            let needed = candidate.fields().missing_metrics()
                || candidate.institution.is_none()
                || candidate.department.is_none();
            async move {
                if !needed {
                    return None;
                }
                let html = self.fetch_page(&url).await?;
                Some(extract_profile(&html, &url))
            }
        });

        let found: Vec<Option<ProfileFields>> = join_all(pages).await;
        for (candidate, fields) in candidates.iter_mut().zip(found) {
            if let Some(fields) = fields {
                candidate.merge_missing(fields);
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Option<String> {
        let timeout = self.settings.page_timeout;
        let outcome =
            with_deadline(format!("page:{url}"), timeout, self.fetcher.fetch(url, timeout)).await;
        match outcome {
            Ok(Ok(html)) => Some(html),
            Ok(Err(e)) => {
                tracing::warn!(url, error = %e, "ratings page fetch failed");
                None
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "ratings page fetch timed out");
                None
            }
        }
    }
}
