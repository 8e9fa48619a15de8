use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::classify::{self, format_price, format_probability};
use crate::error::ViewError;
use crate::model::bar::TickerBar;
use crate::model::signal::Signal;
use crate::model::snapshot::{HistoryRow, Snapshot};

use super::chart::{ChartComposition, ChartPalette, Overlays, StockChart};

const SIDEBAR_WIDTH: u16 = 38;
const SIGNAL_CARD_HEIGHT: u16 = 14;

/// Everything the detail page shows for one ticker.
#[derive(Debug, Clone)]
pub struct DetailView<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub last_update: &'a str,
    pub series: &'a [TickerBar],
    pub latest_signal: Option<&'a Signal>,
    pub history: Vec<HistoryRow<'a>>,
}

impl<'a> DetailView<'a> {
    pub fn resolve(snapshot: &'a Snapshot, code: &'a str) -> Result<Self, ViewError> {
        let info = snapshot
            .ticker(code)
            .ok_or_else(|| ViewError::TickerNotFound(code.to_string()))?;
        Ok(Self {
            code,
            name: &info.name,
            last_update: &snapshot.last_update,
            series: &info.data,
            latest_signal: snapshot.latest_signal(code),
            history: snapshot.signal_history(code),
        })
    }
}

pub struct SignalCard<'a> {
    signal: Option<&'a Signal>,
}

impl<'a> SignalCard<'a> {
    pub fn new(signal: Option<&'a Signal>) -> Self {
        Self { signal }
    }
}

impl Widget for SignalCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(signal) = self.signal else {
            let block = Block::default()
                .title(" Latest signal ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            Paragraph::new(Line::from(Span::styled(
                "No signal for today.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block)
            .render(area, buf);
            return;
        };

        let dim = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let block = Block::default()
            .title(" Latest signal ")
            .borders(Borders::ALL)
            .border_style(classify::card_style(signal.action).style());

        let mut lines = vec![
            Line::from(vec![
                Span::styled(signal.name.clone(), value),
                Span::styled(format!("  {}", signal.ticker), dim),
            ]),
            Line::from(vec![
                Span::styled(
                    format!(
                        " {} {} ",
                        classify::glyph(signal.action),
                        classify::label(signal.action)
                    ),
                    classify::badge_style(signal.action).style(),
                ),
                Span::styled(format!("  {}", signal.date), dim),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Up prob  ", dim),
                Span::styled(format_probability(signal.prob_up), value),
            ]),
            Line::from(vec![
                Span::styled("Close    ", dim),
                Span::styled(format_price(signal.close), value),
            ]),
        ];
        if let Some(limit) = signal.limit_price {
            lines.push(Line::from(vec![
                Span::styled("Limit    ", dim),
                Span::styled(format_price(limit), Style::default().fg(Color::Gray)),
            ]));
        }
        if let Some(stop) = signal.stop_loss {
            lines.push(Line::from(vec![
                Span::styled("Stop     ", dim),
                Span::styled(format_price(stop), Style::default().fg(Color::Gray)),
            ]));
        }
        if !signal.reason.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("! {}", signal.reason),
                Style::default().fg(Color::Gray),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

pub struct HistoryPanel<'a> {
    rows: &'a [HistoryRow<'a>],
    scroll: usize,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(rows: &'a [HistoryRow<'a>], scroll: usize) -> Self {
        Self { rows, scroll }
    }
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Signal history ({}) ", self.rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = block.inner(area).height as usize;
        let max_start = self.rows.len().saturating_sub(inner_height);
        let start = self.scroll.min(max_start);

        let lines: Vec<Line> = self
            .rows
            .iter()
            .skip(start)
            .take(inner_height)
            .map(|row| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", row.date), Style::default().fg(Color::Gray)),
                    Span::styled(
                        classify::label(row.signal.action),
                        classify::text_style(row.signal.action).style(),
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Full detail page: header, chart on the left, signal sidebar on the right.
pub struct DetailScreen<'a> {
    pub view: &'a DetailView<'a>,
    pub composition: &'a ChartComposition,
    pub overlays: Overlays,
    pub palette: ChartPalette,
    pub history_scroll: usize,
}

impl Widget for DetailScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(10)])
            .split(area);

        let header = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ({})", self.view.name, self.view.code),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!(" Last update: {}", self.view.last_update),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        Paragraph::new(header).render(rows[0], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(SIDEBAR_WIDTH)])
            .split(rows[1]);

        StockChart::new(self.composition)
            .overlays(self.overlays)
            .palette(self.palette)
            .render(body[0], buf);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SIGNAL_CARD_HEIGHT), Constraint::Min(3)])
            .split(body[1]);
        SignalCard::new(self.view.latest_signal).render(sidebar[0], buf);
        HistoryPanel::new(&self.view.history, self.history_scroll).render(sidebar[1], buf);
    }
}
