mod common;

use std::sync::Arc;

use ratatui::backend::TestBackend;
use ratatui::Terminal;

use trader_dashboard::event::AppEvent;
use trader_dashboard::routes::Route;
use trader_dashboard::ui::chart::{ChartPalette, Overlays};
use trader_dashboard::ui::{self, AppState};
use trader_dashboard::window::DateRange;

use common::{buffer_text, sample_snapshot};

fn state() -> AppState {
    AppState::new(
        "docs/history_data.json",
        DateRange::SixMonths,
        Overlays::default(),
        ChartPalette::default(),
    )
}

fn loaded_state() -> AppState {
    let mut state = state();
    state.apply(AppEvent::SnapshotLoaded(Arc::new(sample_snapshot())));
    state
}

fn draw(state: &mut AppState, width: u16, height: u16) -> String {
    state.set_viewport(width);
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, state)).unwrap();
    buffer_text(&terminal)
}

#[test]
/// Verifies the loading indicator is shown before the snapshot arrives.
fn loading_state_renders_indicator() {
    let text = draw(&mut state(), 120, 30);
    assert!(text.contains("Loading snapshot..."));
    assert!(text.contains("LOADING"));
}

#[test]
/// Verifies a failed load replaces the page with the error message.
fn failed_state_renders_error() {
    let mut state = state();
    state.apply(AppEvent::SnapshotFailed("HTTP 404".to_string()));
    let text = draw(&mut state, 120, 30);
    assert!(text.contains("Failed to load data."));
    assert!(text.contains("HTTP 404"));
    assert!(text.contains("FAILED"));
    assert!(!text.contains("Watchlist"));
}

#[test]
/// Verifies the overview lists every ticker and badges only those with a signal today.
fn overview_renders_cards() {
    let text = draw(&mut loaded_state(), 120, 40);
    assert!(text.contains("Watchlist"));
    assert!(text.contains("updated: 2024-03-08 18:05"));
    assert!(text.contains("tickers: 3"));
    for name in ["Toyota Motor", "Sony Group", "SoftBank Group"] {
        assert!(text.contains(name), "missing card {name}");
    }
    assert!(text.contains("▲ Buy"));
    assert!(text.contains("▽ Mild Sell"));
    assert!(text.contains("83.0%"));
    assert!(text.contains("22.0%"));
    assert!(text.contains("3,500"));
    assert_eq!(text.matches("Up prob").count(), 2);
}

#[test]
/// Verifies a snapshot without tickers renders an empty watchlist message.
fn overview_without_tickers() {
    let mut state = state();
    let snapshot = serde_json::from_str(r#"{"last_update":"2024-03-08","tickers":{}}"#).unwrap();
    state.apply(AppEvent::SnapshotLoaded(Arc::new(snapshot)));
    let text = draw(&mut state, 120, 30);
    assert!(text.contains("No tickers in snapshot."));
}

#[test]
/// Verifies the detail page shows header, chart panels, latest signal and history.
fn detail_renders_signal_and_history() {
    let mut state = loaded_state();
    state.navigate(Route::detail("7203.T"));
    let text = draw(&mut state, 160, 48);
    assert!(text.contains("Toyota Motor (7203.T)"));
    assert!(text.contains("Last update: 2024-03-08 18:05"));
    assert!(text.contains("Price"));
    assert!(text.contains("Volume"));
    assert!(text.contains("RSI (14)"));
    assert!(text.contains("Latest signal"));
    assert!(text.contains("Breakout above MA20"));
    assert!(text.contains("3,480"));
    assert!(text.contains("Signal history (2)"));
    assert!(text.contains("2024-03-06"));
    assert!(text.contains("Sell"));
    assert!(text.contains("[Esc]"));
}

#[test]
/// Verifies a ticker with no signal today shows the empty signal card.
fn detail_without_signal() {
    let mut state = loaded_state();
    state.navigate(Route::detail("9984.T"));
    let text = draw(&mut state, 160, 48);
    assert!(text.contains("SoftBank Group (9984.T)"));
    assert!(text.contains("No signal for today."));
    assert!(text.contains("Signal history (0)"));
    assert!(text.contains("No data"));
}

#[test]
/// Verifies an unknown ticker renders the error state with a way back.
fn detail_unknown_ticker_renders_error() {
    let mut state = loaded_state();
    state.navigate(Route::detail("0000.T"));
    assert!(state.chart.is_none());
    let text = draw(&mut state, 120, 30);
    assert!(text.contains("Failed to load data (0000.T)"));
    assert!(text.contains("[Esc] back to dashboard"));
}
