mod common;

use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::Terminal;

use trader_dashboard::model::bar::{Direction, TickerBar};
use trader_dashboard::ui::chart::{
    ChartComposition, ChartLayout, ChartPalette, Indicator, Overlays, StockChart,
};
use trader_dashboard::window::DateRange;

use common::{bar, series};

const NO_OVERLAYS: Overlays = Overlays {
    ma_5: false,
    ma_20: false,
    ma_60: false,
};

fn full_rsi(n: usize) -> Vec<TickerBar> {
    series(n)
        .into_iter()
        .enumerate()
        .map(|(i, b)| TickerBar {
            rsi: Some(20.0 + (i % 60) as f64),
            ..b
        })
        .collect()
}

fn column_has(
    terminal: &Terminal<TestBackend>,
    rect: Rect,
    col: u16,
    symbols: &[&str],
) -> bool {
    let buf = terminal.backend().buffer();
    (rect.y + 1..rect.y + rect.height.saturating_sub(1))
        .any(|y| symbols.contains(&buf[(col, y)].symbol()))
}

#[test]
/// Verifies candle direction follows close against open, ties rising.
fn composition_candle_directions() {
    let bars = vec![bar(0, 10.0, 12.0), bar(1, 12.0, 11.0), bar(2, 11.0, 11.0)];
    let comp = ChartComposition::compose(&bars, DateRange::All, Overlays::default());
    let dirs: Vec<Direction> = comp.candles.iter().map(|c| c.direction).collect();
    assert_eq!(dirs, vec![Direction::Up, Direction::Down, Direction::Up]);
    assert_eq!(comp.volume[1].direction, Direction::Down);
}

#[test]
/// Verifies a moving average with missing entries stays one connected line.
fn overlay_bridges_missing_values() {
    let mut bars = series(6);
    bars[0].ma_5 = None;
    bars[1].ma_5 = Some(10.0);
    bars[2].ma_5 = None;
    bars[3].ma_5 = None;
    bars[4].ma_5 = Some(16.0);
    bars[5].ma_5 = None;
    let overlays = Overlays {
        ma_5: true,
        ..NO_OVERLAYS
    };
    let comp = ChartComposition::compose(&bars, DateRange::All, overlays);
    assert_eq!(comp.overlays.len(), 1);
    let ma5 = &comp.overlays[0];
    assert_eq!(ma5.label, Indicator::Ma5.label());
    let mid = ma5.value_at(3).expect("interpolated value");
    assert!((mid - 14.0).abs() < 1e-9);
    assert_eq!(ma5.value_at(0), None);
    assert_eq!(ma5.value_at(5), None);
}

#[test]
/// Verifies only enabled moving averages are composed.
fn composition_respects_overlay_toggles() {
    let bars = series(30);
    let mut overlays = Overlays::default();
    overlays.toggle(Indicator::Ma20);
    let comp = ChartComposition::compose(&bars, DateRange::OneMonth, overlays);
    let labels: Vec<&str> = comp.overlays.iter().map(|l| l.label).collect();
    assert_eq!(labels, vec!["MA5", "MA60"]);
    assert_eq!(comp.len(), 22);
}

#[test]
/// Verifies price, volume and RSI panels share identical date axes.
fn panels_share_date_axis() {
    let layout = ChartLayout::new(Rect::new(3, 2, 117, 40));
    let [price, volume, rsi] = layout.axes(120);
    assert_eq!(price, volume);
    assert_eq!(volume, rsi);
    for i in [0, 59, 119] {
        assert_eq!(price.column_of(i), rsi.column_of(i));
    }
}

#[test]
/// Verifies each date is drawn in the same terminal column in all three panels.
fn rendered_panels_align_per_date() {
    let bars = full_rsi(40);
    let comp = ChartComposition::compose(&bars, DateRange::All, NO_OVERLAYS);
    let area = Rect::new(0, 0, 100, 32);
    let layout = ChartLayout::new(area);
    let [axis, _, _] = layout.axes(comp.len());

    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    terminal
        .draw(|frame| {
            frame.render_widget(StockChart::new(&comp).overlays(NO_OVERLAYS), area);
        })
        .unwrap();

    for index in 0..comp.len() {
        let col = axis.column_of(index).expect("every date has a column");
        assert!(
            column_has(&terminal, layout.price, col, &["█", "│"]),
            "price missing at {index}"
        );
        assert!(
            column_has(&terminal, layout.volume, col, &["█", "▁"]),
            "volume missing at {index}"
        );
        assert!(
            column_has(&terminal, layout.rsi, col, &["•"]),
            "rsi missing at {index}"
        );
    }
}

#[test]
/// Verifies candles use the configured up and down colours.
fn candles_use_palette() {
    let bars = vec![bar(0, 100.0, 110.0), bar(1, 110.0, 100.0)];
    let comp = ChartComposition::compose(&bars, DateRange::All, NO_OVERLAYS);
    let area = Rect::new(0, 0, 60, 30);
    let layout = ChartLayout::new(area);
    let [axis, _, _] = layout.axes(comp.len());
    let palette = ChartPalette {
        up: Color::Green,
        down: Color::Magenta,
    };

    let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
    terminal
        .draw(|frame| {
            frame.render_widget(
                StockChart::new(&comp).overlays(NO_OVERLAYS).palette(palette),
                area,
            );
        })
        .unwrap();

    let buf = terminal.backend().buffer();
    for (index, expected) in [(0, Color::Green), (1, Color::Magenta)] {
        let col = axis.column_of(index).unwrap();
        let found = (layout.price.y + 1..layout.price.y + layout.price.height - 1)
            .map(|y| &buf[(col, y)])
            .find(|cell| cell.symbol() == "█")
            .map(|cell| cell.fg);
        assert_eq!(found, Some(expected), "candle {index}");
    }
}

#[test]
/// Verifies an empty series renders the price placeholder instead of candles.
fn empty_series_shows_placeholder() {
    let comp = ChartComposition::compose(&[], DateRange::SixMonths, Overlays::default());
    assert!(comp.is_empty());
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(StockChart::new(&comp), frame.area()))
        .unwrap();
    let text = common::buffer_text(&terminal);
    assert!(text.contains("No data"));
    assert!(text.contains("RSI (14)"));
}
