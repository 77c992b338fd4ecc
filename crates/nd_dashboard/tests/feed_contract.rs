use std::sync::{Arc, Mutex};
use std::time::Duration;
use anyhow::Result;
use async_trait::async_trait;
use nd_client::MemoryNewsApi;
use nd_core::{BriefsResult, Error, ErrorKind, FeedResult, FilterState, HealthResult, NewsApi, NewsItem, Tab};
use nd_dashboard::{FeedViewController, Link, PanelState};
use serde_json::json;
use tokio::sync::mpsc;

/// Records the filters it was asked for and answers with one item per call.
#[derive(Default)]
struct RecordingApi {
    seen: Mutex<Vec<FilterState>>,
}

#[async_trait]
impl NewsApi for RecordingApi {
    fn name(&self) -> &str {
        "recording"
    }

    async fn news(&self, filter: &FilterState) -> nd_core::Result<FeedResult> {
        self.seen.lock().unwrap().push(filter.clone());
        if filter.query == "slow" {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        Ok(FeedResult {
            count: 1,
            items: vec![NewsItem {
                title: Some(format!("answer to '{}'", filter.query)),
                ..Default::default()
            }],
        })
    }

    async fn briefs(&self) -> nd_core::Result<BriefsResult> {
        Err(Error::Network("connection reset".to_string()))
    }

    async fn health(&self) -> nd_core::Result<HealthResult> {
        Err(Error::Decode("expected a JSON object".to_string()))
    }
}

#[tokio::test]
async fn test_feed_through_memory_backend() -> Result<()> {
    let api = MemoryNewsApi::sample().await;
    let mut controller = FeedViewController::new();

    assert!(controller.load_feed(&api).await);
    let view = controller.feed().ready().expect("feed should be rendered");
    assert_eq!(view.count_label(), "Results: 4");
    assert_eq!(view.cards.len(), 4);
    assert_eq!(view.cards[0].title, "ECB holds rates");
    assert_eq!(view.cards[0].meta, "Reuters · EU · economy");
    assert_eq!(view.cards[2].link, Link::Inert);

    controller.filter_mut().region = "LATAM".to_string();
    assert!(controller.load_feed(&api).await);
    let view = controller.feed().ready().expect("feed should be rendered");
    assert_eq!(view.empty_message(), Some("No results"));
    Ok(())
}

#[tokio::test]
async fn test_all_panels_through_memory_backend() -> Result<()> {
    let api = MemoryNewsApi::sample().await;
    let mut controller = FeedViewController::new();

    controller.switch_tab(Tab::Briefs);
    assert!(controller.load_active(&api).await);
    let briefs = controller.briefs().ready().expect("briefs should be rendered");
    let parsed: serde_json::Value = serde_json::from_str(&briefs.text)?;
    assert_eq!(parsed["US"], json!(["Senate passes budget"]));

    controller.switch_tab(Tab::Health);
    assert!(controller.load_active(&api).await);
    let health = controller.health().ready().expect("health should be rendered");
    assert_eq!(health.status, "Healthy");
    assert_eq!(health.services, "news, briefs");
    assert_eq!(health.timestamp, "2024-06-04T09:00:00Z");
    Ok(())
}

#[tokio::test]
async fn test_blank_filters_are_sent() -> Result<()> {
    let api = RecordingApi::default();
    let mut controller = FeedViewController::new();
    controller.load_feed(&api).await;

    let seen = api.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], FilterState::default());
    assert_eq!(seen[0].query_pairs(), [("q", ""), ("region", ""), ("topic", "")]);
    Ok(())
}

#[tokio::test]
async fn test_failures_render_in_their_own_panel() -> Result<()> {
    let api = RecordingApi::default();
    let mut controller = FeedViewController::new();

    controller.load_feed(&api).await;
    controller.load_briefs(&api).await;
    controller.load_health(&api).await;

    assert_eq!(controller.briefs().error().map(|e| e.kind), Some(ErrorKind::Network));
    assert_eq!(controller.health().error().map(|e| e.kind), Some(ErrorKind::Decode));
    assert!(matches!(controller.feed(), PanelState::Ready(_)));
    Ok(())
}

#[tokio::test]
async fn test_overlapping_feed_loads_keep_the_latest() -> Result<()> {
    let api: Arc<dyn NewsApi> = Arc::new(RecordingApi::default());
    let mut controller = FeedViewController::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    controller.filter_mut().query = "slow".to_string();
    let first = controller.request(Tab::Feed);
    controller.filter_mut().query = "fast".to_string();
    let second = controller.request(Tab::Feed);

    for pending in [first, second] {
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let done = pending.run(api.as_ref()).await;
            let _ = tx.send(done);
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some(done) = rx.recv().await {
        applied.push(controller.complete(done));
    }

    // The fast answer lands first and wins; the slow one is stale on arrival.
    assert_eq!(applied, vec![true, false]);
    let view = controller.feed().ready().expect("feed should be rendered");
    assert_eq!(view.cards[0].title, "answer to 'fast'");
    Ok(())
}
