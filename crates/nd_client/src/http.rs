use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;
use nd_core::config::{BRIEFS_PATH, HEALTH_PATH, NEWS_PATH};
use nd_core::{ApiConfig, BriefsResult, Error, FeedResult, FilterState, HealthResult, NewsApi, Result};

/// Builds the news endpoint URL. All three filter keys are always present.
pub fn feed_url(config: &ApiConfig, filter: &FilterState) -> Result<Url> {
    let mut url = config.endpoint(NEWS_PATH)?;
    url.query_pairs_mut().extend_pairs(filter.query_pairs());
    Ok(url)
}

pub struct HttpNewsApi {
    client: Arc<Client>,
    config: ApiConfig,
}

impl HttpNewsApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::Decode(format!("{} from {}", e, url)))
    }
}

impl fmt::Debug for HttpNewsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpNewsApi")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.config.base_url())
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn news(&self, filter: &FilterState) -> Result<FeedResult> {
        let url = feed_url(&self.config, filter)?;
        self.get_json(url).await
    }

    async fn briefs(&self) -> Result<BriefsResult> {
        let url = self.config.endpoint(BRIEFS_PATH)?;
        self.get_json(url).await
    }

    async fn health(&self) -> Result<HealthResult> {
        let url = self.config.endpoint(HEALTH_PATH)?;
        self.get_json(url).await
    }
}
