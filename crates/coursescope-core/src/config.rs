use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("COURSESCOPE_ENV", "development"))?;

    let bind_addr = or_default("COURSESCOPE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "COURSESCOPE_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("COURSESCOPE_LOG_LEVEL", "info");
    let user_agent = or_default("COURSESCOPE_USER_AGENT", "coursescope/0.1 (course-intel)");

    let forums = parse_forums(&or_default("COURSESCOPE_FORUMS", "Concordia"))?;
    let institution_name = or_default("COURSESCOPE_INSTITUTION", "Concordia University");
    let ratings_base_url = or_default(
        "COURSESCOPE_RATINGS_BASE_URL",
        "https://www.ratemyprofessors.com",
    )
    .trim_end_matches('/')
    .to_string();
    let ratings_school_id = or_default("COURSESCOPE_RATINGS_SCHOOL_ID", "1422");

    let reddit_client_id = optional("REDDIT_CLIENT_ID");
    let reddit_client_secret = optional("REDDIT_CLIENT_SECRET");
    let reddit_base_url = optional("REDDIT_BASE_URL");

    if reddit_client_id.is_some() != reddit_client_secret.is_some() {
        let var = if reddit_client_id.is_some() {
            "REDDIT_CLIENT_SECRET"
        } else {
            "REDDIT_CLIENT_ID"
        };
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET must be set together".to_string(),
        });
    }

    let forum_timeout_ms = parse_u64("COURSESCOPE_FORUM_TIMEOUT_MS", "4000")?;
    let discussion_timeout_ms = parse_u64("COURSESCOPE_DISCUSSION_TIMEOUT_MS", "6000")?;
    let page_timeout_ms = parse_u64("COURSESCOPE_PAGE_TIMEOUT_MS", "5000")?;
    let profile_timeout_ms = parse_u64("COURSESCOPE_PROFILE_TIMEOUT_MS", "12000")?;
    let profile_enrich_limit = parse_usize("COURSESCOPE_PROFILE_ENRICH_LIMIT", "3")?;
    let cache_ttl_secs = parse_u64("COURSESCOPE_CACHE_TTL_SECS", "86400")?;

    if forum_timeout_ms > discussion_timeout_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "COURSESCOPE_FORUM_TIMEOUT_MS".to_string(),
            reason: format!(
                "per-forum timeout ({forum_timeout_ms}ms) exceeds discussion timeout ({discussion_timeout_ms}ms)"
            ),
        });
    }

    if page_timeout_ms > profile_timeout_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "COURSESCOPE_PAGE_TIMEOUT_MS".to_string(),
            reason: format!(
                "per-page timeout ({page_timeout_ms}ms) exceeds profile lookup timeout ({profile_timeout_ms}ms)"
            ),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        user_agent,
        forums,
        institution_name,
        ratings_base_url,
        ratings_school_id,
        reddit_client_id,
        reddit_client_secret,
        reddit_base_url,
        forum_timeout_ms,
        discussion_timeout_ms,
        page_timeout_ms,
        profile_timeout_ms,
        profile_enrich_limit,
        cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Returns an error for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COURSESCOPE_ENV".to_string(),
            reason: format!(
                "unrecognized environment '{other}'; expected development, test, or production"
            ),
        }),
    }
}

/// Split a comma-separated forum list, dropping blanks and a leading `r/`.
fn parse_forums(raw: &str) -> Result<Vec<String>, ConfigError> {
    let forums: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .map(|f| f.strip_prefix("r/").unwrap_or(f))
        .filter(|f| !f.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if forums.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "COURSESCOPE_FORUMS".to_string(),
            reason: "at least one forum is required".to_string(),
        });
    }
    Ok(forums)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
