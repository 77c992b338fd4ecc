use std::time::Duration;
use url::Url;
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const BASE_URL_ENV: &str = "NEWSDESK_API_BASE";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const NEWS_PATH: &str = "/api/news";
pub const BRIEFS_PATH: &str = "/api/briefs";
pub const HEALTH_PATH: &str = "/api/health";

/// Where the backend lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Config("API base URL is empty".to_string()));
        }
        let parsed = Url::parse(trimmed)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "Unsupported scheme '{}' in {}",
                parsed.scheme(),
                trimmed
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(Error::InvalidUrl(format!(
                "API base URL must not carry a query or fragment: {}",
                trimmed
            )));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Explicit override first, then `NEWSDESK_API_BASE`, then the local default.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        let from_env = std::env::var(BASE_URL_ENV).ok();
        Self::resolve_with(explicit, from_env.as_deref())
    }

    pub fn resolve_with(explicit: Option<&str>, from_env: Option<&str>) -> Result<Self> {
        let base = explicit
            .filter(|s| !s.trim().is_empty())
            .or(from_env.filter(|s| !s.trim().is_empty()))
            .unwrap_or(DEFAULT_BASE_URL);
        tracing::debug!("Resolved API base URL: {}", base);
        Self::new(base)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `path` to the base URL, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
