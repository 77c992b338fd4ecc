use async_trait::async_trait;
use crate::types::{BriefsResult, FeedResult, FilterState, HealthResult};
use crate::Result;

/// The three read-only endpoints a news aggregation backend exposes.
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Short backend name used in log lines
    fn name(&self) -> &str;

    /// `GET /api/news` with every filter field sent, empty or not
    async fn news(&self, filter: &FilterState) -> Result<FeedResult>;

    /// `GET /api/briefs`
    async fn briefs(&self) -> Result<BriefsResult>;

    /// `GET /api/health`
    async fn health(&self) -> Result<HealthResult>;
}
