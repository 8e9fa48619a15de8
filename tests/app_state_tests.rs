mod common;

use std::sync::Arc;

use crossterm::event::KeyCode;

use trader_dashboard::event::AppEvent;
use trader_dashboard::input::UiCommand;
use trader_dashboard::routes::Route;
use trader_dashboard::ui::chart::{ChartPalette, Indicator, Overlays};
use trader_dashboard::ui::{AppState, LoadState};
use trader_dashboard::window::DateRange;

use common::sample_snapshot;

fn loaded_state() -> AppState {
    let mut state = AppState::new(
        "test",
        DateRange::SixMonths,
        Overlays::default(),
        ChartPalette::default(),
    );
    state.set_viewport(120);
    state.apply(AppEvent::SnapshotLoaded(Arc::new(sample_snapshot())));
    state
}

#[test]
/// Verifies grid navigation moves the selection and opens the chosen ticker.
fn overview_navigation_opens_detail() {
    let mut state = loaded_state();
    assert_eq!(state.cards.len(), 3);
    assert_eq!(state.grid_columns, 3);

    assert!(!state.handle(UiCommand::Right));
    assert_eq!(state.selected, 1);
    state.handle(UiCommand::Down);
    assert_eq!(state.selected, 1);
    state.handle(UiCommand::Right);
    state.handle(UiCommand::Right);
    assert_eq!(state.selected, 2);
    state.handle(UiCommand::Left);
    state.handle(UiCommand::Open);

    assert_eq!(state.route, Route::detail("6758.T"));
    let chart = state.chart.as_ref().expect("chart composed");
    assert_eq!(chart.len(), 1);
}

#[test]
/// Verifies going back returns to the overview and keeps the selection.
fn back_returns_to_overview() {
    let mut state = loaded_state();
    state.navigate(Route::detail("6758.T"));
    assert_eq!(state.selected, 1);
    state.handle(UiCommand::Back);
    assert_eq!(state.route, Route::Overview);
    assert!(state.chart.is_none());
    assert_eq!(state.selected, 1);
}

#[test]
/// Verifies range changes and overlay toggles rebuild the chart.
fn range_and_overlay_recompose_chart() {
    let mut state = loaded_state();
    state.navigate(Route::detail("7203.T"));
    assert_eq!(state.chart.as_ref().map(|c| c.range), Some(DateRange::SixMonths));

    state.handle(UiCommand::SetRange(DateRange::OneMonth));
    assert_eq!(state.range, DateRange::OneMonth);
    assert_eq!(state.chart.as_ref().map(|c| c.range), Some(DateRange::OneMonth));

    state.handle(UiCommand::NextRange);
    assert_eq!(state.chart.as_ref().map(|c| c.range), Some(DateRange::ThreeMonths));
    state.handle(UiCommand::PrevRange);
    state.handle(UiCommand::PrevRange);
    assert_eq!(state.range, DateRange::All);

    state.handle(UiCommand::ToggleOverlay(Indicator::Ma5));
    assert!(!state.overlays.ma_5);
    let labels: Vec<&str> = state
        .chart
        .as_ref()
        .map(|c| c.overlays.iter().map(|l| l.label).collect())
        .unwrap_or_default();
    assert_eq!(labels, vec!["MA20", "MA60"]);
}

#[test]
/// Verifies a detail route opened before the snapshot arrives is composed on load.
fn deep_link_before_load() {
    let mut state = AppState::new(
        "test",
        DateRange::ThreeMonths,
        Overlays::default(),
        ChartPalette::default(),
    );
    state.navigate(Route::detail("7203.T"));
    assert!(state.is_loading());
    assert!(state.chart.is_none());

    state.apply(AppEvent::SnapshotLoaded(Arc::new(sample_snapshot())));
    assert!(matches!(state.load, LoadState::Loaded(_)));
    assert_eq!(state.chart.as_ref().map(|c| c.len()), Some(3));
    assert_eq!(state.selected, 0);
}

#[test]
/// Verifies a failed load drops any composed chart.
fn failure_clears_chart() {
    let mut state = loaded_state();
    state.navigate(Route::detail("7203.T"));
    state.apply(AppEvent::SnapshotFailed("boom".to_string()));
    assert!(state.chart.is_none());
    assert!(state.snapshot().is_none());
}

#[test]
/// Verifies key mapping depends on the current route.
fn keys_map_per_route() {
    let mut state = loaded_state();
    assert_eq!(state.command_for_key(&KeyCode::Left), Some(UiCommand::Left));
    assert_eq!(state.command_for_key(&KeyCode::Char('a')), None);
    state.navigate(Route::detail("7203.T"));
    assert_eq!(state.command_for_key(&KeyCode::Left), Some(UiCommand::PrevRange));
    assert_eq!(
        state.command_for_key(&KeyCode::Char('a')),
        Some(UiCommand::ToggleOverlay(Indicator::Ma5))
    );
    assert!(state.handle(UiCommand::Quit));
}

#[test]
/// Verifies history scrolling stops at the last row and reverses immediately.
fn history_scroll_is_capped() {
    let mut state = loaded_state();
    state.navigate(Route::detail("7203.T"));
    state.handle(UiCommand::Up);
    assert_eq!(state.history_scroll, 0);
    for _ in 0..50 {
        state.handle(UiCommand::Down);
    }
    assert_eq!(state.history_scroll, 1);
    state.handle(UiCommand::Up);
    assert_eq!(state.history_scroll, 0);

    state.navigate(Route::detail("9984.T"));
    state.handle(UiCommand::Down);
    assert_eq!(state.history_scroll, 0);
}

#[test]
/// Verifies deep links resolve under the deployment prefix and bad paths are ignored.
fn open_path_deep_link() {
    let mut state = loaded_state();
    assert!(state.open_path("/trader/stocks/6758.T", "/trader"));
    assert_eq!(state.route, Route::detail("6758.T"));
    assert_eq!(state.selected, 1);
    assert!(state.chart.is_some());

    assert!(!state.open_path("/trader/settings", "/trader"));
    assert_eq!(state.route, Route::detail("6758.T"));
    assert!(state.open_path("/trader/", "/trader"));
    assert_eq!(state.route, Route::Overview);
}
