use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads any JSON value as a flag: `null`, `false`, `0` and `""` are false,
/// everything else is true.
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsItem {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub region: Option<String>,
    pub topic: Option<String>,
    pub published_at: Option<String>,
}

/// One page of the feed. `count` is the server-reported total and is not
/// required to match `items.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedResult {
    pub count: u64,
    pub items: Vec<NewsItem>,
}

/// Briefs payload, kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BriefsResult(pub Value);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthResult {
    #[serde(default, deserialize_with = "truthy")]
    pub ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub region: String,
    pub topic: String,
}

impl FilterState {
    pub fn new(query: impl Into<String>, region: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            region: region.into(),
            topic: topic.into(),
        }
    }

    /// Query parameters in wire order. Empty values are kept.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("q", self.query.as_str()),
            ("region", self.region.as_str()),
            ("topic", self.topic.as_str()),
        ]
    }

    pub fn is_blank(&self) -> bool {
        self.query.is_empty() && self.region.is_empty() && self.topic.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Feed,
    Briefs,
    Health,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Feed, Tab::Briefs, Tab::Health];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Feed => "feed",
            Tab::Briefs => "briefs",
            Tab::Health => "health",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Feed => 0,
            Tab::Briefs => 1,
            Tab::Health => 2,
        }
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feed" => Ok(Tab::Feed),
            "briefs" => Ok(Tab::Briefs),
            "health" => Ok(Tab::Health),
            other => Err(format!("Unknown tab: {} (expected feed, briefs or health)", other)),
        }
    }
}
