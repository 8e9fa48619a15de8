pub mod chart;
pub mod dashboard;
pub mod detail;
pub mod overview;

use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::event::AppEvent;
use crate::input::{parse_detail_command, parse_overview_command, UiCommand};
use crate::model::snapshot::Snapshot;
use crate::routes::Route;
use crate::window::DateRange;

use chart::{ChartComposition, ChartPalette, Overlays};
use dashboard::{KeybindBar, KeybindContext, Notice, StatusBar};
use detail::{DetailScreen, DetailView};
use overview::{grid_columns, OverviewCard, OverviewGrid};

/// Page-load state. The snapshot is either fully loaded or not at all.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Arc<Snapshot>),
    Failed(String),
}

pub struct AppState {
    pub load: LoadState,
    pub route: Route,
    pub source: String,
    pub cards: Vec<OverviewCard>,
    pub selected: usize,
    pub grid_columns: usize,
    pub range: DateRange,
    pub overlays: Overlays,
    pub palette: ChartPalette,
    pub history_scroll: usize,
    /// Chart of the current detail route, rebuilt on range/overlay changes.
    pub chart: Option<ChartComposition>,
}

impl AppState {
    pub fn new(source: &str, range: DateRange, overlays: Overlays, palette: ChartPalette) -> Self {
        Self {
            load: LoadState::Loading,
            route: Route::Overview,
            source: source.to_string(),
            cards: Vec::new(),
            selected: 0,
            grid_columns: 3,
            range,
            overlays,
            palette,
            history_scroll: 0,
            chart: None,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match &self.load {
            LoadState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    /// Adapt grid navigation to the terminal width.
    pub fn set_viewport(&mut self, width: u16) {
        self.grid_columns = grid_columns(width);
    }

    pub fn navigate(&mut self, route: Route) {
        if let Route::Detail(code) = &route {
            if let Some(i) = self.cards.iter().position(|c| &c.code == code) {
                self.selected = i;
            }
        }
        tracing::debug!(route = %route, "Navigate");
        self.route = route;
        self.history_scroll = 0;
        self.refresh_chart();
    }

    /// Open a deep link such as `/trader/stocks/7203.T`. Returns `false` and
    /// stays put when the path is not a known route.
    pub fn open_path(&mut self, path: &str, base_path: &str) -> bool {
        match Route::parse_with_base(path, base_path) {
            Some(route) => {
                self.navigate(route);
                true
            }
            None => false,
        }
    }

    /// Rows in the signal history of the current detail route.
    fn history_len(&self) -> usize {
        match (&self.route, self.snapshot()) {
            (Route::Detail(code), Some(snapshot)) => snapshot.signal_history(code).len(),
            _ => 0,
        }
    }

    pub fn refresh_chart(&mut self) {
        self.chart = match (&self.route, self.snapshot()) {
            (Route::Detail(code), Some(snapshot)) => snapshot
                .ticker(code)
                .map(|info| ChartComposition::compose(&info.data, self.range, self.overlays)),
            _ => None,
        };
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SnapshotLoaded(snapshot) => {
                self.cards = OverviewCard::from_snapshot(&snapshot);
                self.selected = self.selected.min(self.cards.len().saturating_sub(1));
                self.load = LoadState::Loaded(snapshot);
                self.refresh_chart();
            }
            AppEvent::SnapshotFailed(msg) => {
                self.load = LoadState::Failed(msg);
                self.chart = None;
            }
        }
    }

    pub fn command_for_key(&self, key_code: &KeyCode) -> Option<UiCommand> {
        match self.route {
            Route::Overview => parse_overview_command(key_code),
            Route::Detail(_) => parse_detail_command(key_code),
        }
    }

    /// Apply a command; returns `true` when the app should exit.
    pub fn handle(&mut self, cmd: UiCommand) -> bool {
        if cmd == UiCommand::Quit {
            return true;
        }
        if matches!(self.route, Route::Overview) {
            self.handle_overview(cmd);
        } else {
            self.handle_detail(cmd);
        }
        false
    }

    fn handle_overview(&mut self, cmd: UiCommand) {
        let count = self.cards.len();
        if count == 0 {
            return;
        }
        let cols = self.grid_columns.max(1);
        match cmd {
            UiCommand::Left => self.selected = self.selected.saturating_sub(1),
            UiCommand::Right => self.selected = (self.selected + 1).min(count - 1),
            UiCommand::Up => self.selected = self.selected.saturating_sub(cols),
            UiCommand::Down => {
                if self.selected + cols < count {
                    self.selected += cols;
                }
            }
            UiCommand::Open => {
                if let Some(card) = self.cards.get(self.selected) {
                    let route = Route::Detail(card.code.clone());
                    self.navigate(route);
                }
            }
            _ => {}
        }
    }

    fn handle_detail(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::Back => self.navigate(Route::Overview),
            UiCommand::Up => self.history_scroll = self.history_scroll.saturating_sub(1),
            UiCommand::Down => {
                let last = self.history_len().saturating_sub(1);
                self.history_scroll = (self.history_scroll + 1).min(last);
            }
            UiCommand::SetRange(range) => self.set_range(range),
            UiCommand::NextRange => self.set_range(self.range.next()),
            UiCommand::PrevRange => self.set_range(self.range.prev()),
            UiCommand::ToggleOverlay(indicator) => {
                self.overlays.toggle(indicator);
                self.refresh_chart();
            }
            _ => {}
        }
    }

    fn set_range(&mut self, range: DateRange) {
        if self.range != range {
            self.range = range;
            self.refresh_chart();
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(4),    // page
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    let snapshot = state.snapshot();
    frame.render_widget(
        StatusBar {
            source: &state.source,
            last_update: snapshot.map(|s| s.last_update.as_str()),
            ticker_count: snapshot.map_or(0, |s| s.tickers.len()),
            loading: state.is_loading(),
            failed: matches!(state.load, LoadState::Failed(_)),
        },
        outer[0],
    );

    match &state.load {
        LoadState::Loading => frame.render_widget(
            Notice {
                title: "Loading snapshot...",
                detail: None,
                hint: None,
                color: Color::Gray,
            },
            outer[1],
        ),
        LoadState::Failed(msg) => frame.render_widget(
            Notice {
                title: "Failed to load data.",
                detail: Some(msg.as_str()),
                hint: Some("[Q] quit"),
                color: Color::Red,
            },
            outer[1],
        ),
        LoadState::Loaded(snapshot) => match &state.route {
            Route::Overview => render_overview(frame, outer[1], state),
            Route::Detail(code) => render_detail(frame, outer[1], state, snapshot, code),
        },
    }

    let context = match state.route {
        Route::Overview => KeybindContext::Overview,
        Route::Detail(_) => KeybindContext::Detail,
    };
    frame.render_widget(KeybindBar { context }, outer[2]);
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Watchlist",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );
    frame.render_widget(OverviewGrid::new(&state.cards, state.selected), rows[1]);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState, snapshot: &Snapshot, code: &str) {
    let (view, composition) = match (DetailView::resolve(snapshot, code), state.chart.as_ref()) {
        (Ok(view), Some(composition)) => (view, composition),
        (Err(e), _) => {
            let detail = e.to_string();
            frame.render_widget(
                Notice {
                    title: &format!("Failed to load data ({code})"),
                    detail: Some(detail.as_str()),
                    hint: Some("[Esc] back to dashboard"),
                    color: Color::Red,
                },
                area,
            );
            return;
        }
        (Ok(_), None) => {
            frame.render_widget(
                Notice {
                    title: "Preparing chart...",
                    detail: None,
                    hint: None,
                    color: Color::Gray,
                },
                area,
            );
            return;
        }
    };
    frame.render_widget(
        DetailScreen {
            view: &view,
            composition,
            overlays: state.overlays,
            palette: state.palette,
            history_scroll: state.history_scroll,
        },
        area,
    );
}
