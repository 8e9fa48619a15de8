use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::classify::{self, format_optional_price, format_probability, ProbabilityBand};
use crate::model::signal::Action;
use crate::model::snapshot::Snapshot;

pub const CARD_HEIGHT: u16 = 7;
const MIN_CARD_WIDTH: u16 = 36;
const MAX_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSignal {
    pub action: Action,
    pub prob_up: f64,
    pub band: ProbabilityBand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewCard {
    pub code: String,
    pub name: String,
    pub last_close: Option<f64>,
    pub signal: Option<CardSignal>,
}

impl OverviewCard {
    /// One card per ticker in snapshot order. A ticker without a signal on
    /// the latest day gets no badge.
    pub fn from_snapshot(snapshot: &Snapshot) -> Vec<OverviewCard> {
        snapshot
            .tickers
            .iter()
            .map(|(code, info)| OverviewCard {
                code: code.clone(),
                name: info.name.clone(),
                last_close: info.latest_bar().map(|b| b.close),
                signal: snapshot.latest_signal(code).map(|s| CardSignal {
                    action: s.action,
                    prob_up: s.prob_up,
                    band: classify::probability_style(s.prob_up),
                }),
            })
            .collect()
    }
}

/// Number of card columns that fit in `width`.
pub fn grid_columns(width: u16) -> usize {
    ((width / MIN_CARD_WIDTH) as usize).clamp(1, MAX_COLUMNS)
}

struct CardWidget<'a> {
    card: &'a OverviewCard,
    selected: bool,
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let card = self.card;
        let border = if self.selected {
            Style::default().fg(Color::LightBlue)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_style = if self.selected {
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        let block = Block::default()
            .title(Span::styled(format!(" {} ", card.name), title_style))
            .borders(Borders::ALL)
            .border_style(border);

        let mut header = vec![Span::styled(
            format!("{:<12}", card.code),
            Style::default().fg(Color::DarkGray),
        )];
        if let Some(signal) = card.signal {
            header.push(Span::styled(
                format!(
                    " {} {} ",
                    classify::glyph(signal.action),
                    classify::label(signal.action)
                ),
                classify::badge_style(signal.action).style(),
            ));
        }

        let mut labels = vec![Span::styled(
            format!("{:<16}", "Close"),
            Style::default().fg(Color::DarkGray),
        )];
        let mut values = vec![Span::styled(
            format!("{:<16}", format_optional_price(card.last_close)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if let Some(signal) = card.signal {
            labels.push(Span::styled("Up prob", Style::default().fg(Color::DarkGray)));
            values.push(Span::styled(
                format_probability(signal.prob_up),
                signal.band.style(),
            ));
        }

        let lines = vec![
            Line::from(header),
            Line::from(""),
            Line::from(labels),
            Line::from(values),
        ];
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Card grid of all watched tickers; scrolls to keep the selection visible.
pub struct OverviewGrid<'a> {
    cards: &'a [OverviewCard],
    selected: usize,
}

impl<'a> OverviewGrid<'a> {
    pub fn new(cards: &'a [OverviewCard], selected: usize) -> Self {
        Self { cards, selected }
    }
}

impl Widget for OverviewGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.cards.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No tickers in snapshot.",
                Style::default().fg(Color::DarkGray),
            )))
            .render(area, buf);
            return;
        }
        let columns = grid_columns(area.width);
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected / columns;
        let first_row = selected_row.saturating_sub(visible_rows - 1);
        let card_width = area.width / columns as u16;

        for (i, card) in self.cards.iter().enumerate() {
            let row = i / columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let col = (i % columns) as u16;
            let y = area.y + (row - first_row) as u16 * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(area.y + area.height - y);
            let rect = Rect {
                x: area.x + col * card_width,
                y,
                width: card_width,
                height,
            };
            CardWidget {
                card,
                selected: i == self.selected,
            }
            .render(rect, buf);
        }
    }
}
