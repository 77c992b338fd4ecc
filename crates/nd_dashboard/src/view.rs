//! Pure mapping from API payloads to what a panel shows.
//!
//! Nothing here knows about terminals or markup; renderers only lay out the
//! strings these functions produce.

use nd_core::{BriefsResult, Error, ErrorKind, FeedResult, HealthResult, NewsItem, Result};

pub const UNTITLED: &str = "Untitled";
pub const SUMMARY_LIMIT: usize = 240;
pub const META_DELIMITER: &str = " · ";
pub const INERT_HREF: &str = "#";
pub const NO_RESULTS: &str = "No results";
pub const HEALTHY: &str = "Healthy";
pub const DEGRADED: &str = "Degraded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    External(String),
    /// No target; activating the card does nothing.
    Inert,
}

impl Link {
    pub fn href(&self) -> &str {
        match self {
            Link::External(url) => url,
            Link::Inert => INERT_HREF,
        }
    }

    pub fn is_inert(&self) -> bool {
        matches!(self, Link::Inert)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub summary: String,
    pub meta: String,
    pub link: Link,
    pub published: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    pub count: u64,
    pub cards: Vec<CardView>,
}

impl FeedView {
    pub fn count_label(&self) -> String {
        format!("Results: {}", self.count)
    }

    /// Set when the response held no items, so the grid shows a message
    /// instead of staying blank.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.cards.is_empty().then_some(NO_RESULTS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefsView {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthView {
    pub status: String,
    pub services: String,
    pub timestamp: String,
}

impl HealthView {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }

    /// Label/value pairs in display order.
    pub fn cards(&self) -> [(&'static str, &str); 3] {
        [
            ("Status", self.status.as_str()),
            ("Services", self.services.as_str()),
            ("Timestamp", self.timestamp.as_str()),
        ]
    }
}

/// A failed load as shown inside its own panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for PanelError {
    fn from(e: &Error) -> Self {
        let kind = e.kind();
        let headline = match kind {
            ErrorKind::Network => "Could not reach the news service",
            ErrorKind::Decode => "The news service sent an unexpected response",
            ErrorKind::Other => "Request failed",
        };
        Self {
            kind,
            message: format!("{}: {}", headline, e),
        }
    }
}

/// Hard character cut; no ellipsis, no word boundary search.
pub fn truncate_summary(summary: &str) -> String {
    summary.chars().take(SUMMARY_LIMIT).collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn meta_line(item: &NewsItem) -> String {
    [&item.source, &item.region, &item.topic]
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(META_DELIMITER)
}

pub fn card_view(item: &NewsItem) -> CardView {
    CardView {
        title: present(&item.title).unwrap_or(UNTITLED).to_string(),
        summary: truncate_summary(item.summary.as_deref().unwrap_or_default()),
        meta: meta_line(item),
        link: present(&item.url)
            .map(|url| Link::External(url.to_string()))
            .unwrap_or(Link::Inert),
        published: present(&item.published_at).map(str::to_string),
    }
}

pub fn feed_view(feed: &FeedResult) -> FeedView {
    FeedView {
        count: feed.count,
        cards: feed.items.iter().map(card_view).collect(),
    }
}

pub fn briefs_view(briefs: &BriefsResult) -> Result<BriefsView> {
    Ok(BriefsView {
        text: serde_json::to_string_pretty(&briefs.0)?,
    })
}

pub fn health_view(health: &HealthResult) -> HealthView {
    HealthView {
        status: (if health.ok { HEALTHY } else { DEGRADED }).to_string(),
        services: health.services.join(", "),
        timestamp: health.timestamp.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: Option<&str>) -> NewsItem {
        NewsItem {
            title: title.map(str::to_string),
            summary: Some("Summary".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_preserves_length_and_order() {
        let feed = FeedResult {
            count: 99,
            items: (0..7).map(|i| item(Some(&format!("Story {}", i)))).collect(),
        };
        let view = feed_view(&feed);
        assert_eq!(view.cards.len(), 7);
        for (i, card) in view.cards.iter().enumerate() {
            assert_eq!(card.title, format!("Story {}", i));
        }
        assert_eq!(view.count_label(), "Results: 99");
        assert_eq!(view.empty_message(), None);
    }

    #[test]
    fn test_empty_feed_has_distinct_state() {
        let view = feed_view(&FeedResult { count: 0, items: vec![] });
        assert!(view.cards.is_empty());
        assert_eq!(view.empty_message(), Some(NO_RESULTS));
        assert_eq!(view.count_label(), "Results: 0");
    }

    #[test]
    fn test_summary_truncation_bounds() {
        for len in [0, 1, 239, 240, 241, 1000] {
            let summary = "x".repeat(len);
            let truncated = truncate_summary(&summary);
            assert_eq!(truncated.chars().count(), len.min(SUMMARY_LIMIT));
        }

        // Multi-byte characters count as one each.
        let summary = "é".repeat(300);
        let truncated = truncate_summary(&summary);
        assert_eq!(truncated.chars().count(), SUMMARY_LIMIT);

        // Cut lands mid-word.
        let summary = format!("{}abcdef", "a".repeat(238));
        assert!(truncate_summary(&summary).ends_with("aab"));
    }

    #[test]
    fn test_title_falls_back_to_untitled() {
        assert_eq!(card_view(&item(None)).title, UNTITLED);
        assert_eq!(card_view(&item(Some(""))).title, UNTITLED);
        assert_eq!(card_view(&item(Some("Real"))).title, "Real");

        let parsed: NewsItem = serde_json::from_value(json!({ "title": null })).unwrap();
        let card = card_view(&parsed);
        assert_eq!(card.title, UNTITLED);
        assert_eq!(card.summary, "");
    }

    #[test]
    fn test_missing_url_is_inert() {
        let card = card_view(&item(Some("No link")));
        assert_eq!(card.link, Link::Inert);
        assert!(card.link.is_inert());
        assert_eq!(card.link.href(), "#");

        let mut linked = item(Some("Linked"));
        linked.url = Some("https://news.example/a".to_string());
        assert_eq!(card_view(&linked).link.href(), "https://news.example/a");
    }

    #[test]
    fn test_meta_line_skips_absent_values() {
        let mut news = item(Some("t"));
        news.source = Some("A".to_string());
        news.topic = Some("B".to_string());
        assert_eq!(meta_line(&news), "A · B");

        news.region = Some(String::new());
        assert_eq!(meta_line(&news), "A · B");

        news.source = None;
        assert_eq!(meta_line(&news), "B");

        news.topic = None;
        assert_eq!(meta_line(&news), "");

        news.source = Some("A".to_string());
        news.region = Some("R".to_string());
        news.topic = Some("B".to_string());
        assert_eq!(meta_line(&news), "A · R · B");
    }

    #[test]
    fn test_degraded_health() {
        let view = health_view(&HealthResult {
            ok: false,
            services: vec![],
            timestamp: None,
        });
        assert_eq!(view.status, "Degraded");
        assert_eq!(view.services, "");
        assert_eq!(view.timestamp, "");
        assert!(!view.is_healthy());
    }

    #[test]
    fn test_healthy_cards() {
        let view = health_view(&HealthResult {
            ok: true,
            services: vec!["news".to_string(), "briefs".to_string()],
            timestamp: Some("2024-05-01T12:00:00Z".to_string()),
        });
        assert_eq!(
            view.cards(),
            [
                ("Status", "Healthy"),
                ("Services", "news, briefs"),
                ("Timestamp", "2024-05-01T12:00:00Z"),
            ]
        );
    }

    #[test]
    fn test_briefs_pretty_printed_verbatim() {
        let view = briefs_view(&BriefsResult(json!({ "eu": [1, 2] }))).unwrap();
        assert_eq!(view.text, "{\n  \"eu\": [\n    1,\n    2\n  ]\n}");

        let view = briefs_view(&BriefsResult(json!("plain"))).unwrap();
        assert_eq!(view.text, "\"plain\"");
    }

    #[test]
    fn test_panel_error_message() {
        let err = PanelError::from(&Error::Network("connection refused".to_string()));
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(
            err.message,
            "Could not reach the news service: Network error: connection refused"
        );
    }
}
