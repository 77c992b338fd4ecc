//! The feed view controller: one active tab, three panels, and a request
//! sequence per panel so that only the newest response is rendered.

use chrono::{DateTime, Utc};
use nd_core::{BriefsResult, FeedResult, FilterState, HealthResult, NewsApi, Result, Tab};
use crate::logging::Logger;
use crate::view::{self, BriefsView, FeedView, HealthView, PanelError};

/// Which regions are shown. Derived from the active tab only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub filter_bar: bool,
    pub results_count: bool,
    pub results_grid: bool,
    pub briefs_panel: bool,
    pub health_panel: bool,
}

impl Visibility {
    pub fn for_tab(tab: Tab) -> Self {
        let feed = tab == Tab::Feed;
        Self {
            filter_bar: feed,
            results_count: feed,
            results_grid: feed,
            briefs_panel: tab == Tab::Briefs,
            health_panel: tab == Tab::Health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(PanelError),
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PanelState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PanelError> {
        match self {
            PanelState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Identifies one issued request. Only the panel's latest ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub panel: Tab,
    pub seq: u64,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Feed(Result<FeedResult>),
    Briefs(Result<BriefsResult>),
    Health(Result<HealthResult>),
}

impl LoadOutcome {
    pub fn panel(&self) -> Tab {
        match self {
            LoadOutcome::Feed(_) => Tab::Feed,
            LoadOutcome::Briefs(_) => Tab::Briefs,
            LoadOutcome::Health(_) => Tab::Health,
        }
    }
}

/// A request that has been issued but not yet sent. Owns everything it
/// needs so it can run on another task.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    pub ticket: Ticket,
    pub filter: FilterState,
}

impl PendingLoad {
    pub async fn run(self, api: &dyn NewsApi) -> CompletedLoad {
        let outcome = match self.ticket.panel {
            Tab::Feed => LoadOutcome::Feed(api.news(&self.filter).await),
            Tab::Briefs => LoadOutcome::Briefs(api.briefs().await),
            Tab::Health => LoadOutcome::Health(api.health().await),
        };
        CompletedLoad {
            ticket: self.ticket,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct CompletedLoad {
    pub ticket: Ticket,
    pub outcome: LoadOutcome,
}

#[derive(Debug)]
struct Panel<T> {
    tab: Tab,
    latest: u64,
    state: PanelState<T>,
    updated_at: Option<DateTime<Utc>>,
    logger: Logger,
}

impl<T> Panel<T> {
    fn new(tab: Tab) -> Self {
        Self {
            tab,
            latest: 0,
            state: PanelState::Idle,
            updated_at: None,
            logger: Logger::new().with_prefix(format!("[{}]", tab)),
        }
    }

    fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.state = PanelState::Loading;
        self.logger.info(&format!("request #{} issued", self.latest));
        Ticket {
            panel: self.tab,
            seq: self.latest,
        }
    }

    fn apply(&mut self, ticket: Ticket, result: Result<T>) -> bool {
        if ticket.seq != self.latest {
            self.logger.debug(&format!(
                "discarding stale response #{} (latest is #{})",
                ticket.seq, self.latest
            ));
            return false;
        }
        match result {
            Ok(view) => {
                self.logger.info(&format!("request #{} rendered", ticket.seq));
                self.state = PanelState::Ready(view);
                self.updated_at = Some(Utc::now());
            }
            Err(e) => {
                self.logger.warn(&format!("request #{} failed: {}", ticket.seq, e));
                self.state = PanelState::Failed(PanelError::from(&e));
            }
        }
        true
    }
}

#[derive(Debug)]
pub struct FeedViewController {
    active: Tab,
    filter: FilterState,
    feed: Panel<FeedView>,
    briefs: Panel<BriefsView>,
    health: Panel<HealthView>,
}

impl FeedViewController {
    pub fn new() -> Self {
        Self {
            active: Tab::Feed,
            filter: FilterState::default(),
            feed: Panel::new(Tab::Feed),
            briefs: Panel::new(Tab::Briefs),
            health: Panel::new(Tab::Health),
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    /// Changes the visible panel. Never triggers a load.
    pub fn switch_tab(&mut self, tab: Tab) -> Visibility {
        self.active = tab;
        self.visibility()
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::for_tab(self.active)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn feed(&self) -> &PanelState<FeedView> {
        &self.feed.state
    }

    pub fn briefs(&self) -> &PanelState<BriefsView> {
        &self.briefs.state
    }

    pub fn health(&self) -> &PanelState<HealthView> {
        &self.health.state
    }

    /// When the panel last rendered a successful response.
    pub fn updated_at(&self, panel: Tab) -> Option<DateTime<Utc>> {
        match panel {
            Tab::Feed => self.feed.updated_at,
            Tab::Briefs => self.briefs.updated_at,
            Tab::Health => self.health.updated_at,
        }
    }

    /// Issues a new request for `panel`, superseding any in flight. The feed
    /// request captures the filter as it is now.
    pub fn request(&mut self, panel: Tab) -> PendingLoad {
        let ticket = match panel {
            Tab::Feed => self.feed.begin(),
            Tab::Briefs => self.briefs.begin(),
            Tab::Health => self.health.begin(),
        };
        PendingLoad {
            ticket,
            filter: self.filter.clone(),
        }
    }

    /// Renders a finished request into its panel. Returns false when the
    /// response was stale or did not belong to the ticket's panel.
    pub fn complete(&mut self, done: CompletedLoad) -> bool {
        let CompletedLoad { ticket, outcome } = done;
        if ticket.panel != outcome.panel() {
            tracing::warn!(
                "Outcome for {} delivered with a {} ticket, ignoring",
                outcome.panel(),
                ticket.panel
            );
            return false;
        }
        match outcome {
            LoadOutcome::Feed(result) => {
                self.feed.apply(ticket, result.map(|feed| view::feed_view(&feed)))
            }
            LoadOutcome::Briefs(result) => self
                .briefs
                .apply(ticket, result.and_then(|briefs| view::briefs_view(&briefs))),
            LoadOutcome::Health(result) => {
                self.health.apply(ticket, result.map(|health| view::health_view(&health)))
            }
        }
    }

    pub async fn load(&mut self, panel: Tab, api: &dyn NewsApi) -> bool {
        let pending = self.request(panel);
        let done = pending.run(api).await;
        self.complete(done)
    }

    pub async fn load_feed(&mut self, api: &dyn NewsApi) -> bool {
        self.load(Tab::Feed, api).await
    }

    pub async fn load_briefs(&mut self, api: &dyn NewsApi) -> bool {
        self.load(Tab::Briefs, api).await
    }

    pub async fn load_health(&mut self, api: &dyn NewsApi) -> bool {
        self.load(Tab::Health, api).await
    }

    pub async fn load_active(&mut self, api: &dyn NewsApi) -> bool {
        self.load(self.active, api).await
    }
}

impl Default for FeedViewController {
    fn default() -> Self {
        Self::new()
    }
}
