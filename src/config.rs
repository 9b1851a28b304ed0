//! Tracker credentials from the environment and per-run options.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding the `owner/repo` slug.
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

/// Optional environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Problems with the tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
    /// `GITHUB_REPOSITORY` is not of the form `owner/repo`.
    #[error("Invalid GITHUB_REPOSITORY format: {0:?} (expected owner/repo)")]
    InvalidRepository(String),
}

/// Where and as whom to talk to the tracker.
#[derive(Clone)]
pub struct TrackerConfig {
    /// Bearer token.
    pub token: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// API base URL without a trailing slash.
    pub api_url: String,
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl TrackerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or repository is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or repository is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or(ConfigError::MissingEnv(key))
        };
        let token = read(TOKEN_ENV)?;
        let slug = read(REPOSITORY_ENV)?;
        let (owner, repo) = match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                (owner.to_string(), repo.to_string())
            }
            _ => return Err(ConfigError::InvalidRepository(slug)),
        };
        let api_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            token,
            owner,
            repo,
            api_url,
        })
    }

    /// A configuration for `owner/repo` with no credentials, for offline use.
    #[must_use]
    pub fn for_repository(owner: &str, repo: &str) -> Self {
        Self {
            token: String::new(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// The `owner/repo` slug.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// The identifying client header sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!("{} refactoring-scanner", self.slug())
    }
}

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Wait between records, and the base of the retry backoff.
    pub delay: Duration,
    /// Maximum attempts per API call, including the first.
    pub max_attempts: u32,
    /// Wait after a record fails on a persistent rate limit.
    pub rate_limit_cooldown: Duration,
    /// Search only; report what would be created or commented on.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            max_attempts: 3,
            rate_limit_cooldown: Duration::from_secs(30),
            dry_run: false,
        }
    }
}
