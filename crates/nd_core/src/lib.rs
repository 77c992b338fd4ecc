pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use api::NewsApi;
pub use config::ApiConfig;
pub use error::{Error, ErrorKind};
pub use types::{BriefsResult, FeedResult, FilterState, HealthResult, NewsItem, Tab};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{ApiConfig, Error, NewsApi, Result};
    pub use crate::types::*;
}
