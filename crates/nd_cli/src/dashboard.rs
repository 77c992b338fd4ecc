use std::io;
use std::sync::Arc;
use std::time::Duration;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use nd_core::{NewsApi, Tab};
use nd_dashboard::{CompletedLoad, FeedView, FeedViewController, PanelState, Visibility};
use tokio::sync::mpsc;
use tracing::info;
use tui::backend::{Backend, CrosstermBackend};
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Query,
    Region,
    Topic,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Query => Field::Region,
            Field::Region => Field::Topic,
            Field::Topic => Field::Query,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Editing(Field),
}

struct App {
    controller: FeedViewController,
    api: Arc<dyn NewsApi>,
    tx: mpsc::UnboundedSender<CompletedLoad>,
    rx: mpsc::UnboundedReceiver<CompletedLoad>,
    mode: Mode,
    selected: usize,
    scroll: u16,
    notice: Option<String>,
    should_quit: bool,
}

/// Runs the interactive dashboard until the user quits.
pub async fn run(api: Arc<dyn NewsApi>, tab: Tab) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = App::new(api, tab).run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

impl App {
    fn new(api: Arc<dyn NewsApi>, tab: Tab) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut controller = FeedViewController::new();
        controller.switch_tab(tab);
        Self {
            controller,
            api,
            tx,
            rx,
            mode: Mode::Browse,
            selected: 0,
            scroll: 0,
            notice: None,
            should_quit: false,
        }
    }

    async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        info!("📺 Dashboard started on the {} tab", self.controller.active());
        self.issue(self.controller.active());

        while !self.should_quit {
            while let Ok(done) = self.rx.try_recv() {
                if self.controller.complete(done) {
                    self.clamp_selection();
                }
            }

            terminal.draw(|f| self.draw(f))?;

            let ready = tokio::task::block_in_place(|| event::poll(TICK))?;
            if ready {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        info!("👋 Dashboard closed");
        Ok(())
    }

    /// Sends the panel's request on a background task; the answer comes
    /// back through the channel and is applied on the next tick.
    fn issue(&mut self, panel: Tab) {
        let pending = self.controller.request(panel);
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let done = pending.run(api.as_ref()).await;
            let _ = tx.send(done);
        });
    }

    fn select_tab(&mut self, tab: Tab) {
        self.controller.switch_tab(tab);
        self.scroll = 0;
        self.notice = None;
        self.issue(tab);
    }

    fn feed_len(&self) -> usize {
        self.controller.feed().ready().map_or(0, |v| v.cards.len())
    }

    fn clamp_selection(&mut self) {
        let len = self.feed_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            Mode::Browse => self.handle_browse_key(key.code),
            Mode::Editing(field) => self.handle_edit_key(field, key.code),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') => self.select_tab(Tab::Feed),
            KeyCode::Char('2') => self.select_tab(Tab::Briefs),
            KeyCode::Char('3') => self.select_tab(Tab::Health),
            KeyCode::Tab | KeyCode::Right => self.select_tab(self.controller.active().next()),
            KeyCode::BackTab | KeyCode::Left => self.select_tab(self.controller.active().previous()),
            KeyCode::Char('r') => self.issue(self.controller.active()),
            KeyCode::Char('/') if self.controller.active() == Tab::Feed => {
                self.mode = Mode::Editing(Field::Query);
            }
            KeyCode::Down | KeyCode::Char('j') => match self.controller.active() {
                Tab::Feed => {
                    if self.selected + 1 < self.feed_len() {
                        self.selected += 1;
                    }
                }
                _ => self.scroll = self.scroll.saturating_add(1),
            },
            KeyCode::Up | KeyCode::Char('k') => match self.controller.active() {
                Tab::Feed => self.selected = self.selected.saturating_sub(1),
                _ => self.scroll = self.scroll.saturating_sub(1),
            },
            KeyCode::Enter if self.controller.active() == Tab::Feed => self.open_selected(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, field: Field, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Tab => self.mode = Mode::Editing(field.next()),
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                self.selected = 0;
                self.issue(Tab::Feed);
            }
            KeyCode::Backspace => {
                self.field_mut(field).pop();
            }
            KeyCode::Char(c) => self.field_mut(field).push(c),
            _ => {}
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        let filter = self.controller.filter_mut();
        match field {
            Field::Query => &mut filter.query,
            Field::Region => &mut filter.region,
            Field::Topic => &mut filter.topic,
        }
    }

    fn open_selected(&mut self) {
        let link = self
            .controller
            .feed()
            .ready()
            .and_then(|v| v.cards.get(self.selected))
            .map(|card| card.link.clone());
        self.notice = match link {
            Some(link) if !link.is_inert() => Some(format!("Open: {}", link.href())),
            Some(_) => Some("This story has no link".to_string()),
            None => None,
        };
    }

    fn draw<B: Backend>(&self, f: &mut Frame<B>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.size());

        let titles = ["Feed", "Briefs", "Health"].iter().map(|t| Spans::from(*t)).collect();
        let tabs = Tabs::new(titles)
            .select(self.controller.active().index())
            .block(Block::default().borders(Borders::ALL).title("newsdesk"))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        self.draw_body(f, chunks[1]);
        self.draw_status(f, chunks[2]);
    }

    fn draw_body<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let visibility = self.controller.visibility();
        let Visibility {
            filter_bar,
            results_count,
            results_grid,
            briefs_panel,
            health_panel,
        } = visibility;

        let mut constraints = Vec::new();
        if filter_bar {
            constraints.push(Constraint::Length(3));
        }
        if results_count {
            constraints.push(Constraint::Length(1));
        }
        if results_grid || briefs_panel || health_panel {
            constraints.push(Constraint::Min(0));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut slots = chunks.iter().copied();
        if filter_bar {
            if let Some(slot) = slots.next() {
                self.draw_filter_bar(f, slot);
            }
        }
        if results_count {
            if let Some(slot) = slots.next() {
                self.draw_count(f, slot);
            }
        }
        if let Some(slot) = slots.next() {
            if results_grid {
                self.draw_grid(f, slot);
            } else if briefs_panel {
                self.draw_briefs(f, slot);
            } else if health_panel {
                self.draw_health(f, slot);
            }
        }
    }

    fn draw_filter_bar<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);
        let filter = self.controller.filter();
        let fields = [
            (Field::Query, "Search", filter.query.as_str()),
            (Field::Region, "Region", filter.region.as_str()),
            (Field::Topic, "Topic", filter.topic.as_str()),
        ];
        for ((field, title, value), slot) in fields.into_iter().zip(chunks.iter()) {
            let editing = self.mode == Mode::Editing(field);
            let border = if editing {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let input = Paragraph::new(value)
                .block(Block::default().borders(Borders::ALL).title(title).border_style(border));
            f.render_widget(input, *slot);
            if editing {
                let x = slot.x + 1 + value.chars().count() as u16;
                f.set_cursor(x.min(slot.x + slot.width.saturating_sub(2)), slot.y + 1);
            }
        }
    }

    fn draw_count<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let text = match self.controller.feed() {
            PanelState::Ready(view) => view.count_label(),
            PanelState::Loading => "Loading…".to_string(),
            _ => String::new(),
        };
        f.render_widget(Paragraph::new(text), area);
    }

    fn draw_grid<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Stories");
        let view: &FeedView = match self.controller.feed() {
            PanelState::Ready(view) => view,
            other => {
                f.render_widget(placeholder(other).block(block), area);
                return;
            }
        };
        if let Some(message) = view.empty_message() {
            f.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let items: Vec<ListItem> = view
            .cards
            .iter()
            .map(|card| {
                let mut lines = vec![Spans::from(Span::styled(
                    card.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))];
                if !card.meta.is_empty() {
                    lines.push(Spans::from(Span::styled(
                        card.meta.clone(),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                if !card.summary.is_empty() {
                    lines.push(Spans::from(card.summary.clone()));
                }
                lines.push(Spans::from(""));
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Cyan))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_briefs<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Briefs");
        let widget = match self.controller.briefs() {
            PanelState::Ready(view) => Paragraph::new(view.text.as_str())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            other => placeholder(other),
        };
        f.render_widget(widget.block(block), area);
    }

    fn draw_health<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let view = match self.controller.health() {
            PanelState::Ready(view) => view,
            other => {
                let block = Block::default().borders(Borders::ALL).title("Health");
                f.render_widget(placeholder(other).block(block), area);
                return;
            }
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);
        let status_color = if view.is_healthy() { Color::Green } else { Color::Red };
        for (i, ((label, value), slot)) in view.cards().into_iter().zip(chunks.iter()).enumerate() {
            let style = if i == 0 {
                Style::default().fg(status_color).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let card = Paragraph::new(Span::styled(value.to_string(), style))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(label));
            f.render_widget(card, *slot);
        }
    }

    fn draw_status<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let help = match self.mode {
            Mode::Browse => "1-3/Tab switch · r reload · / filter · ↑↓ select · Enter link · q quit",
            Mode::Editing(_) => "typing filter · Tab next field · Enter search · Esc cancel",
        };
        let mut parts = vec![help.to_string()];
        if let Some(at) = self.controller.updated_at(self.controller.active()) {
            parts.push(format!("updated {}", at.with_timezone(&Local).format("%H:%M:%S")));
        }
        if let Some(notice) = &self.notice {
            parts.push(notice.clone());
        }
        let line = Paragraph::new(parts.join(" │ ")).style(Style::default().fg(Color::Gray));
        f.render_widget(line, area);
    }
}

fn placeholder<T>(state: &PanelState<T>) -> Paragraph<'static> {
    match state {
        PanelState::Idle => Paragraph::new("Press r to load"),
        PanelState::Loading => Paragraph::new("Loading…"),
        PanelState::Failed(e) => Paragraph::new(e.message.clone())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true }),
        PanelState::Ready(_) => Paragraph::new(""),
    }
}
