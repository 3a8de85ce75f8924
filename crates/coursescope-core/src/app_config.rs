use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    /// Subreddits searched for course discussions.
    pub forums: Vec<String>,
    /// Institution used to scope professor lookups.
    pub institution_name: String,
    pub ratings_base_url: String,
    pub ratings_school_id: String,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_base_url: Option<String>,
    pub forum_timeout_ms: u64,
    pub discussion_timeout_ms: u64,
    pub page_timeout_ms: u64,
    pub profile_timeout_ms: u64,
    /// How many top candidates get their profile page fetched for missing metrics.
    pub profile_enrich_limit: usize,
    pub cache_ttl_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn forum_timeout(&self) -> Duration {
        Duration::from_millis(self.forum_timeout_ms)
    }

    #[must_use]
    pub fn discussion_timeout(&self) -> Duration {
        Duration::from_millis(self.discussion_timeout_ms)
    }

    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    #[must_use]
    pub fn profile_timeout(&self) -> Duration {
        Duration::from_millis(self.profile_timeout_ms)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Reddit OAuth credentials, present only when both halves are configured.
    #[must_use]
    pub fn reddit_credentials(&self) -> Option<(&str, &str)> {
        match (&self.reddit_client_id, &self.reddit_client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("forums", &self.forums)
            .field("institution_name", &self.institution_name)
            .field("ratings_base_url", &self.ratings_base_url)
            .field("ratings_school_id", &self.ratings_school_id)
            .field("reddit_client_id", &self.reddit_client_id)
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("reddit_base_url", &self.reddit_base_url)
            .field("forum_timeout_ms", &self.forum_timeout_ms)
            .field("discussion_timeout_ms", &self.discussion_timeout_ms)
            .field("page_timeout_ms", &self.page_timeout_ms)
            .field("profile_timeout_ms", &self.profile_timeout_ms)
            .field("profile_enrich_limit", &self.profile_enrich_limit)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}
