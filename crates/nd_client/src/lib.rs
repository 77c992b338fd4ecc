use std::sync::Arc;
use nd_core::{ApiConfig, Error, NewsApi, Result};

pub mod http;
pub mod memory;

pub use http::{feed_url, HttpNewsApi};
pub use memory::MemoryNewsApi;

/// Creates a backend by name: `http` talks to the configured server,
/// `memory` serves the built-in sample dataset.
pub async fn create_api(kind: &str, config: ApiConfig) -> Result<Arc<dyn NewsApi>> {
    match kind {
        "http" => {
            tracing::info!("🌐 Using HTTP backend at {}", config.base_url());
            Ok(Arc::new(HttpNewsApi::new(config)?))
        }
        "memory" => {
            tracing::info!("🧠 Using in-memory sample backend");
            Ok(Arc::new(MemoryNewsApi::sample().await))
        }
        other => Err(Error::Config(format!(
            "Unknown backend: {} (available: http, memory)",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{create_api, HttpNewsApi, MemoryNewsApi};
    pub use nd_core::{ApiConfig, Error, NewsApi, Result};
}
