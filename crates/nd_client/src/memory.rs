use std::sync::Arc;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use nd_core::{BriefsResult, FeedResult, FilterState, HealthResult, NewsApi, NewsItem, Result};

pub const DEFAULT_PAGE_SIZE: usize = 50;

pub struct MemoryStore {
    items: Vec<NewsItem>,
    briefs: BriefsResult,
    health: HealthResult,
    page_size: usize,
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            briefs: BriefsResult::default(),
            health: HealthResult {
                ok: true,
                services: vec!["memory".to_string()],
                timestamp: None,
            },
            page_size,
        }
    }

    /// Applies the server-side filter contract: a blank field matches
    /// everything, `q` searches title and summary, region and topic must
    /// match exactly (ignoring case).
    fn matches(item: &NewsItem, filter: &FilterState) -> bool {
        let query = filter.query.trim().to_lowercase();
        if !query.is_empty() {
            let hit = [&item.title, &item.summary]
                .iter()
                .filter_map(|field| field.as_deref())
                .any(|text| text.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        field_matches(item.region.as_deref(), &filter.region)
            && field_matches(item.topic.as_deref(), &filter.topic)
    }

    pub fn search(&self, filter: &FilterState) -> FeedResult {
        let matched: Vec<&NewsItem> = self.items.iter()
            .filter(|item| Self::matches(item, filter))
            .collect();
        FeedResult {
            count: matched.len() as u64,
            items: matched.into_iter().take(self.page_size).cloned().collect(),
        }
    }
}

fn field_matches(value: Option<&str>, wanted: &str) -> bool {
    let wanted = wanted.trim();
    wanted.is_empty() || value.map_or(false, |v| v.to_lowercase() == wanted.to_lowercase())
}

/// In-process backend answering the same contract as the HTTP API.
#[derive(Clone)]
pub struct MemoryNewsApi {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryNewsApi {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(page_size))),
        }
    }

    pub async fn push_item(&self, item: NewsItem) {
        self.store.write().await.items.push(item);
    }

    pub async fn set_briefs(&self, briefs: BriefsResult) {
        self.store.write().await.briefs = briefs;
    }

    pub async fn set_health(&self, health: HealthResult) {
        self.store.write().await.health = health;
    }

    /// A small fixed dataset for offline runs.
    pub async fn sample() -> Self {
        let api = Self::new();
        let items = [
            ("ECB holds rates", "The central bank kept its deposit rate unchanged for a third meeting.", Some("https://news.example/ecb"), "Reuters", "EU", "economy"),
            ("Heatwave grips the south", "Temperatures passed 40C across several regions on Tuesday.", Some("https://news.example/heat"), "AP", "EU", "climate"),
            ("Chip exports tighten", "New licensing rules affect advanced lithography equipment.", None, "Bloomberg", "APAC", "tech"),
            ("Senate passes budget", "The vote clears the way for a summer recess without a shutdown.", Some("https://news.example/budget"), "AP", "US", "politics"),
        ];
        for (title, summary, url, source, region, topic) in items {
            api.push_item(NewsItem {
                title: Some(title.to_string()),
                summary: Some(summary.to_string()),
                url: url.map(str::to_string),
                source: Some(source.to_string()),
                region: Some(region.to_string()),
                topic: Some(topic.to_string()),
                published_at: Some("2024-06-04T08:30:00Z".to_string()),
            })
            .await;
        }
        api.set_briefs(BriefsResult(json!({
            "EU": ["ECB holds rates", "Heatwave grips the south"],
            "US": ["Senate passes budget"]
        })))
        .await;
        api.set_health(HealthResult {
            ok: true,
            services: vec!["news".to_string(), "briefs".to_string()],
            timestamp: Some("2024-06-04T09:00:00Z".to_string()),
        })
        .await;
        api
    }
}

impl Default for MemoryNewsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsApi for MemoryNewsApi {
    fn name(&self) -> &str {
        "memory"
    }

    async fn news(&self, filter: &FilterState) -> Result<FeedResult> {
        let store = self.store.read().await;
        Ok(store.search(filter))
    }

    async fn briefs(&self) -> Result<BriefsResult> {
        let store = self.store.read().await;
        Ok(store.briefs.clone())
    }

    async fn health(&self) -> Result<HealthResult> {
        let store = self.store.read().await;
        Ok(store.health.clone())
    }
}
