use std::fmt::Write;
use nd_dashboard::{BriefsView, FeedView, HealthView, PanelState};

fn placeholder<T>(state: &PanelState<T>) -> Option<String> {
    match state {
        PanelState::Idle => Some("Not loaded".to_string()),
        PanelState::Loading => Some("Loading…".to_string()),
        PanelState::Failed(e) => Some(format!("⚠️ {}", e.message)),
        PanelState::Ready(_) => None,
    }
}

pub fn render_feed(state: &PanelState<FeedView>) -> String {
    let view = match state {
        PanelState::Ready(view) => view,
        other => return placeholder(other).unwrap_or_default(),
    };

    let mut out = view.count_label();
    out.push('\n');
    if let Some(message) = view.empty_message() {
        let _ = write!(out, "\n{}\n", message);
        return out;
    }
    for card in &view.cards {
        let _ = write!(out, "\n{}\n", card.title);
        if !card.meta.is_empty() {
            let _ = writeln!(out, "  {}", card.meta);
        }
        if !card.summary.is_empty() {
            let _ = writeln!(out, "  {}", card.summary);
        }
        let _ = writeln!(out, "  link: {}", card.link.href());
    }
    out
}

pub fn render_briefs(state: &PanelState<BriefsView>) -> String {
    match state {
        PanelState::Ready(view) => format!("{}\n", view.text),
        other => placeholder(other).unwrap_or_default(),
    }
}

pub fn render_health(state: &PanelState<HealthView>) -> String {
    match state {
        PanelState::Ready(view) => view
            .cards()
            .iter()
            .map(|(label, value)| format!("{:<10} {}\n", format!("{}:", label), value))
            .collect(),
        other => placeholder(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::{Error, FeedResult, HealthResult, NewsItem};
    use nd_dashboard::view::{feed_view, health_view};
    use nd_dashboard::PanelError;

    #[test]
    fn test_render_feed_cards() {
        let feed = FeedResult {
            count: 12,
            items: vec![
                NewsItem {
                    title: Some("Linked".to_string()),
                    summary: Some("Body".to_string()),
                    url: Some("https://news.example/1".to_string()),
                    source: Some("AP".to_string()),
                    topic: Some("tech".to_string()),
                    ..Default::default()
                },
                NewsItem::default(),
            ],
        };
        let out = render_feed(&PanelState::Ready(feed_view(&feed)));
        assert_eq!(
            out,
            "Results: 12\n\nLinked\n  AP · tech\n  Body\n  link: https://news.example/1\n\nUntitled\n  link: #\n"
        );
    }

    #[test]
    fn test_render_empty_feed() {
        let out = render_feed(&PanelState::Ready(feed_view(&FeedResult::default())));
        assert_eq!(out, "Results: 0\n\nNo results\n");
    }

    #[test]
    fn test_render_failed_panel() {
        let err = PanelError::from(&Error::Network("refused".to_string()));
        let out = render_health(&PanelState::Failed(err));
        assert!(out.starts_with("⚠️ Could not reach the news service"));
        assert_eq!(render_briefs(&PanelState::Loading), "Loading…");
    }

    #[test]
    fn test_render_health() {
        let view = health_view(&HealthResult::default());
        let out = render_health(&PanelState::Ready(view));
        assert_eq!(out, "Status:    Degraded\nServices:  \nTimestamp: \n");
    }
}
