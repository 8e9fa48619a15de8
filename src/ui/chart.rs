use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::classify::{format_price, format_volume};
use crate::model::bar::{short_date, Direction, TickerBar};
use crate::window::{ChartWindow, DateRange, PriceBounds};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_BOUNDS: PriceBounds = PriceBounds {
    min: 0.0,
    max: 100.0,
};

/// Width of the y-axis label column inside each panel.
const GUTTER: u16 = 9;
const VOLUME_HEIGHT: u16 = 6;
const RSI_HEIGHT: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Ma5,
    Ma20,
    Ma60,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Ma5, Indicator::Ma20, Indicator::Ma60];

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Ma5 => "MA5",
            Indicator::Ma20 => "MA20",
            Indicator::Ma60 => "MA60",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Indicator::Ma5 => Color::Yellow,
            Indicator::Ma20 => Color::LightBlue,
            Indicator::Ma60 => Color::LightGreen,
        }
    }

    pub fn value(self, bar: &TickerBar) -> Option<f64> {
        match self {
            Indicator::Ma5 => bar.ma_5,
            Indicator::Ma20 => bar.ma_20,
            Indicator::Ma60 => bar.ma_60,
        }
    }
}

/// Which moving-average overlays are drawn on the price panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlays {
    pub ma_5: bool,
    pub ma_20: bool,
    pub ma_60: bool,
}

impl Default for Overlays {
    fn default() -> Self {
        Self {
            ma_5: true,
            ma_20: true,
            ma_60: true,
        }
    }
}

impl Overlays {
    pub fn is_enabled(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::Ma5 => self.ma_5,
            Indicator::Ma20 => self.ma_20,
            Indicator::Ma60 => self.ma_60,
        }
    }

    pub fn toggle(&mut self, indicator: Indicator) {
        let flag = match indicator {
            Indicator::Ma5 => &mut self.ma_5,
            Indicator::Ma20 => &mut self.ma_20,
            Indicator::Ma60 => &mut self.ma_60,
        };
        *flag = !*flag;
    }

    pub fn enabled(&self) -> impl Iterator<Item = Indicator> {
        let this = *self;
        Indicator::ALL
            .into_iter()
            .filter(move |i| this.is_enabled(*i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub up: Color,
    pub down: Color,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            up: Color::Red,
            down: Color::Blue,
        }
    }
}

impl ChartPalette {
    pub fn color(&self, direction: Direction) -> Color {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub index: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub direction: Direction,
}

impl Candle {
    fn from_bar(index: usize, bar: &TickerBar) -> Self {
        Self {
            index,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            direction: bar.direction(),
        }
    }

    /// `(bottom, top)` of the body.
    pub fn body(&self) -> (f64, f64) {
        (self.open.min(self.close), self.open.max(self.close))
    }

    /// `(low, high)` of the wick.
    pub fn wick(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Merge consecutive candles into one (first open, last close).
    fn merge(candles: &[Candle]) -> Option<Candle> {
        let first = candles.first()?;
        let last = candles.last()?;
        let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        Some(Candle {
            index: last.index,
            open: first.open,
            high,
            low,
            close: last.close,
            direction: Direction::classify(first.open, last.close),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub index: usize,
    pub value: f64,
}

/// A line over the windowed dates. Only present values are stored; the line
/// is continuous between the first and last of them.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: &'static str,
    pub color: Color,
    pub points: Vec<LinePoint>,
}

impl LineSeries {
    pub fn from_values<I>(label: &'static str, color: Color, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let points = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, v)| {
                v.filter(|v| v.is_finite())
                    .map(|value| LinePoint { index, value })
            })
            .collect();
        Self {
            label,
            color,
            points,
        }
    }

    /// Value at `index`, linearly interpolated across missing dates.
    /// `None` before the first or after the last present value.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match self.points.binary_search_by_key(&index, |p| p.index) {
            Ok(i) => Some(self.points[i].value),
            Err(i) if i == 0 || i >= self.points.len() => None,
            Err(i) => {
                let (a, b) = (self.points[i - 1], self.points[i]);
                let t = (index - a.index) as f64 / (b.index - a.index) as f64;
                Some(a.value + (b.value - a.value) * t)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBar {
    pub index: usize,
    pub volume: f64,
    pub direction: Direction,
}

/// Everything the three panels draw, derived from one window of the series.
/// Cheap to rebuild whenever the range or an overlay toggle changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartComposition {
    pub range: DateRange,
    pub dates: Vec<String>,
    pub price: PriceBounds,
    pub volume_max: f64,
    pub candles: Vec<Candle>,
    pub overlays: Vec<LineSeries>,
    pub volume: Vec<VolumeBar>,
    pub rsi: LineSeries,
}

impl ChartComposition {
    pub fn compose(series: &[TickerBar], range: DateRange, overlays: Overlays) -> Self {
        let window = ChartWindow::new(series, range);
        let bars = window.bars;
        Self {
            range,
            dates: bars.iter().map(|b| b.date.clone()).collect(),
            price: window.price,
            volume_max: window.volume_max,
            candles: bars
                .iter()
                .enumerate()
                .map(|(i, b)| Candle::from_bar(i, b))
                .collect(),
            overlays: overlays
                .enabled()
                .map(|ind| {
                    LineSeries::from_values(ind.label(), ind.color(), bars.iter().map(|b| ind.value(b)))
                })
                .collect(),
            volume: bars
                .iter()
                .enumerate()
                .map(|(index, b)| VolumeBar {
                    index,
                    volume: b.volume,
                    direction: b.direction(),
                })
                .collect(),
            rsi: LineSeries::from_values(
                "RSI",
                Color::LightMagenta,
                bars.iter().map(|b| b.rsi.map(|v| v.clamp(0.0, 100.0))),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Maps bar indices onto terminal columns. When there are more bars than
/// columns, consecutive bars share a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAxis {
    len: usize,
    x: u16,
    width: u16,
}

impl DateAxis {
    pub fn new(len: usize, x: u16, width: u16) -> Self {
        Self { len, x, width }
    }

    pub fn slots(&self) -> usize {
        self.len.min(self.width as usize)
    }

    pub fn slot_of(&self, index: usize) -> Option<usize> {
        let slots = self.slots();
        if index >= self.len || slots == 0 {
            return None;
        }
        Some(index * slots / self.len)
    }

    pub fn slot_range(&self, slot: usize) -> Range<usize> {
        let slots = self.slots();
        if slots == 0 {
            return 0..0;
        }
        let ceil_div = |a: usize| (a + slots - 1) / slots;
        let start = ceil_div(slot * self.len).min(self.len);
        let end = ceil_div((slot + 1) * self.len).min(self.len);
        start..end
    }

    /// Centre column of `slot`.
    pub fn slot_column(&self, slot: usize) -> u16 {
        let slots = self.slots().max(1);
        let width = self.width as usize;
        let start = slot * width / slots;
        let end = ((slot + 1) * width / slots).max(start + 1);
        self.x + ((start + end - 1) / 2) as u16
    }

    pub fn column_of(&self, index: usize) -> Option<u16> {
        self.slot_of(index).map(|slot| self.slot_column(slot))
    }
}

fn value_row(plot: Rect, bounds: PriceBounds, value: f64) -> u16 {
    let norm = bounds.normalize(value).clamp(0.0, 1.0);
    let span = plot.height.saturating_sub(1) as f64;
    plot.y + ((1.0 - norm) * span).round() as u16
}

/// Plot columns shared by every panel of a chart drawn at `area`'s width.
fn plot_columns(area: Rect) -> (u16, u16) {
    (
        area.x + 1 + GUTTER,
        area.width.saturating_sub(2 + GUTTER),
    )
}

fn panel_plot(inner: Rect) -> Rect {
    Rect {
        x: inner.x + GUTTER,
        y: inner.y,
        width: inner.width.saturating_sub(GUTTER),
        height: inner.height,
    }
}

fn gutter_label(buf: &mut Buffer, inner: Rect, y: u16, label: &str) {
    if inner.width <= GUTTER || y >= inner.y + inner.height {
        return;
    }
    let text = format!("{:>width$}", label, width = (GUTTER - 1) as usize);
    buf.set_string(inner.x, y, text, Style::default().fg(Color::DarkGray));
}

fn draw_line(buf: &mut Buffer, plot: Rect, axis: DateAxis, bounds: PriceBounds, series: &LineSeries) {
    let style = Style::default().fg(series.color);
    let mut prev: Option<(u16, f64)> = None;
    for slot in 0..axis.slots() {
        let Some(value) = axis
            .slot_range(slot)
            .rev()
            .find_map(|i| series.value_at(i))
        else {
            continue;
        };
        let col = axis.slot_column(slot);
        if let Some((prev_col, prev_value)) = prev {
            let gap = col.saturating_sub(prev_col);
            for step in 1..gap {
                let t = step as f64 / gap as f64;
                let v = prev_value + (value - prev_value) * t;
                buf.set_string(prev_col + step, value_row(plot, bounds, v), "·", style);
            }
        }
        buf.set_string(col, value_row(plot, bounds, value), "•", style);
        prev = Some((col, value));
    }
}

fn panel_block(title: Line<'_>) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

pub struct PricePanel<'a> {
    composition: &'a ChartComposition,
    palette: ChartPalette,
}

impl<'a> PricePanel<'a> {
    pub fn new(composition: &'a ChartComposition, palette: ChartPalette) -> Self {
        Self {
            composition,
            palette,
        }
    }
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut legend = vec![
            Span::styled(" Price ", Style::default().fg(Color::White)),
            Span::styled("■", Style::default().fg(self.palette.up)),
            Span::styled(" up ", Style::default().fg(Color::DarkGray)),
            Span::styled("■", Style::default().fg(self.palette.down)),
            Span::styled(" down ", Style::default().fg(Color::DarkGray)),
        ];
        for line in &self.composition.overlays {
            legend.push(Span::styled(
                format!("─{} ", line.label),
                Style::default().fg(line.color),
            ));
        }
        let block = panel_block(Line::from(legend));
        let inner = block.inner(area);
        block.render(area, buf);

        let plot = panel_plot(inner);
        if plot.width == 0 || plot.height < 2 {
            return;
        }
        if self.composition.is_empty() {
            let msg = "No data";
            let x = plot.x + plot.width.saturating_sub(msg.len() as u16) / 2;
            buf.set_string(x, plot.y + plot.height / 2, msg, Style::default().fg(Color::DarkGray));
            return;
        }

        let bounds = self.composition.price;
        let axis = DateAxis::new(self.composition.len(), plot.x, plot.width);

        for slot in 0..axis.slots() {
            let range = axis.slot_range(slot);
            let Some(candle) = Candle::merge(&self.composition.candles[range]) else {
                continue;
            };
            let col = axis.slot_column(slot);
            let style = Style::default().fg(self.palette.color(candle.direction));
            let (low, high) = candle.wick();
            let (bottom, top) = candle.body();
            let (body_top, body_bottom) = (value_row(plot, bounds, top), value_row(plot, bounds, bottom));
            for row in value_row(plot, bounds, high)..=value_row(plot, bounds, low) {
                let symbol = if (body_top..=body_bottom).contains(&row) {
                    "█"
                } else {
                    "│"
                };
                buf.set_string(col, row, symbol, style);
            }
        }

        for line in &self.composition.overlays {
            draw_line(buf, plot, axis, bounds, line);
        }

        gutter_label(buf, inner, plot.y, &format_price(bounds.max));
        gutter_label(
            buf,
            inner,
            plot.y + plot.height / 2,
            &format_price((bounds.min + bounds.max) / 2.0),
        );
        gutter_label(buf, inner, plot.y + plot.height - 1, &format_price(bounds.min));
    }
}

pub struct VolumePanel<'a> {
    composition: &'a ChartComposition,
    palette: ChartPalette,
}

impl<'a> VolumePanel<'a> {
    pub fn new(composition: &'a ChartComposition, palette: ChartPalette) -> Self {
        Self {
            composition,
            palette,
        }
    }
}

impl Widget for VolumePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block(Line::from(" Volume "));
        let inner = block.inner(area);
        block.render(area, buf);

        let plot = panel_plot(inner);
        if plot.width == 0 || plot.height == 0 || self.composition.is_empty() {
            return;
        }
        let axis = DateAxis::new(self.composition.len(), plot.x, plot.width);
        let ceiling = self.composition.volume_max;
        for slot in 0..axis.slots() {
            let range = axis.slot_range(slot);
            let Some(candle) = Candle::merge(&self.composition.candles[range.clone()]) else {
                continue;
            };
            let volume = self.composition.volume[range]
                .iter()
                .map(|v| v.volume)
                .fold(0.0_f64, f64::max);
            let style = Style::default().fg(self.palette.color(candle.direction));
            let col = axis.slot_column(slot);
            let rows = ((volume / ceiling) * plot.height as f64).round() as u16;
            let rows = rows.min(plot.height);
            let bottom = plot.y + plot.height - 1;
            if rows == 0 && volume > 0.0 {
                buf.set_string(col, bottom, "▁", style);
            }
            for r in 0..rows {
                buf.set_string(col, bottom - r, "█", style);
            }
        }
        gutter_label(buf, inner, plot.y, &format_volume(ceiling));
    }
}

pub struct RsiPanel<'a> {
    composition: &'a ChartComposition,
}

impl<'a> RsiPanel<'a> {
    pub fn new(composition: &'a ChartComposition) -> Self {
        Self { composition }
    }
}

impl Widget for RsiPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel_block(Line::from(" RSI (14) "));
        let inner = block.inner(area);
        block.render(area, buf);

        let plot = panel_plot(inner);
        if plot.width == 0 || plot.height < 2 {
            return;
        }
        for (level, color) in [(RSI_OVERBOUGHT, Color::Red), (RSI_OVERSOLD, Color::Green)] {
            let row = value_row(plot, RSI_BOUNDS, level);
            for x in plot.x..plot.x + plot.width {
                buf.set_string(x, row, "┄", Style::default().fg(color));
            }
            gutter_label(buf, inner, row, &format!("{level:.0}"));
        }
        if self.composition.is_empty() {
            return;
        }
        let axis = DateAxis::new(self.composition.len(), plot.x, plot.width);
        draw_line(buf, plot, axis, RSI_BOUNDS, &self.composition.rsi);
    }
}

/// Date labels under the price panel: first, middle and last date.
struct DateRow<'a> {
    composition: &'a ChartComposition,
}

impl Widget for DateRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (x, width) = plot_columns(area);
        let n = self.composition.len();
        if n == 0 || width == 0 {
            return;
        }
        let axis = DateAxis::new(n, x, width);
        let style = Style::default().fg(Color::DarkGray);
        let right = x + width;
        let mut next_free = x;
        let picks = [0, n / 2, n - 1];
        for (k, &index) in picks.iter().enumerate() {
            if k > 0 && index == picks[k - 1] {
                continue;
            }
            let label = short_date(&self.composition.dates[index]);
            let len = label.chars().count() as u16;
            let Some(col) = axis.column_of(index) else {
                continue;
            };
            let anchor = if k == picks.len() - 1 {
                col.saturating_add(1).saturating_sub(len)
            } else {
                col.saturating_sub(len / 2)
            };
            let start = anchor.clamp(x, right.saturating_sub(len).max(x));
            if start < next_free || start + len > right {
                continue;
            }
            buf.set_string(start, area.y, &label, style);
            next_free = start + len + 1;
        }
    }
}

/// Rects of the stacked chart and the date axis every panel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub controls: Rect,
    pub price: Rect,
    pub dates: Rect,
    pub volume: Rect,
    pub rsi: Rect,
}

impl ChartLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(VOLUME_HEIGHT),
                Constraint::Length(RSI_HEIGHT),
            ])
            .split(area);
        Self {
            controls: rows[0],
            price: rows[1],
            dates: rows[2],
            volume: rows[3],
            rsi: rows[4],
        }
    }

    /// Date axis of each panel, in order price, volume, RSI.
    pub fn axes(&self, len: usize) -> [DateAxis; 3] {
        [self.price, self.volume, self.rsi].map(|r| {
            let (x, width) = plot_columns(r);
            DateAxis::new(len, x, width)
        })
    }
}

/// Price, volume and RSI panels stacked over one shared date axis, with the
/// range selector and overlay toggles above them.
pub struct StockChart<'a> {
    composition: &'a ChartComposition,
    overlays: Overlays,
    palette: ChartPalette,
}

impl<'a> StockChart<'a> {
    pub fn new(composition: &'a ChartComposition) -> Self {
        Self {
            composition,
            overlays: Overlays::default(),
            palette: ChartPalette::default(),
        }
    }

    pub fn overlays(mut self, overlays: Overlays) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    fn controls(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(" Range ", Style::default().fg(Color::DarkGray))];
        for range in DateRange::ALL {
            let style = if range == self.composition.range {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", range.label()), style));
        }
        spans.push(Span::styled("  Overlays ", Style::default().fg(Color::DarkGray)));
        for indicator in Indicator::ALL {
            let style = if self.overlays.is_enabled(indicator) {
                Style::default().fg(indicator.color()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", indicator.label()), style));
        }
        Line::from(spans)
    }
}

impl Widget for StockChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = ChartLayout::new(area);
        buf.set_line(layout.controls.x, layout.controls.y, &self.controls(), layout.controls.width);
        PricePanel::new(self.composition, self.palette).render(layout.price, buf);
        DateRow {
            composition: self.composition,
        }
        .render(layout.dates, buf);
        VolumePanel::new(self.composition, self.palette).render(layout.volume, buf);
        RsiPanel::new(self.composition).render(layout.rsi, buf);
    }
}
