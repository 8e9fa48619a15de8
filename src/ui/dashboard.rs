use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

pub struct StatusBar<'a> {
    pub source: &'a str,
    pub last_update: Option<&'a str>,
    pub ticker_count: usize,
    pub loading: bool,
    pub failed: bool,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let load_status = if self.failed {
            Span::styled("FAILED", Style::default().fg(Color::Red))
        } else if self.loading {
            Span::styled("LOADING", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("LOADED", Style::default().fg(Color::Green))
        };

        let line = Line::from(vec![
            Span::styled(
                " trader-dashboard ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            load_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("updated: {}", self.last_update.unwrap_or("---")),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("tickers: {}", self.ticker_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.source, Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeybindContext {
    Overview,
    Detail,
}

pub struct KeybindBar {
    pub context: KeybindContext,
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Yellow);
        let text = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled(" [Q]", key), Span::styled("uit  ", text)];
        match self.context {
            KeybindContext::Overview => {
                spans.extend([
                    Span::styled("[←↑↓→]", key),
                    Span::styled(" select  ", text),
                    Span::styled("[Enter]", key),
                    Span::styled(" open  ", text),
                ]);
            }
            KeybindContext::Detail => {
                spans.extend([
                    Span::styled("[Esc]", key),
                    Span::styled(" back  ", text),
                    Span::styled("[1-5/←→]", key),
                    Span::styled(" range  ", text),
                    Span::styled("[A/S/D]", key),
                    Span::styled(" MA5/20/60  ", text),
                    Span::styled("[↑↓]", key),
                    Span::styled(" history  ", text),
                ]);
            }
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// Centred full-screen message for the loading and error states.
pub struct Notice<'a> {
    pub title: &'a str,
    pub detail: Option<&'a str>,
    pub hint: Option<&'a str>,
    pub color: Color,
}

impl Widget for Notice<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(
            self.title,
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(detail) = self.detail {
            lines.push(Line::from(Span::styled(
                detail,
                Style::default().fg(Color::Gray),
            )));
        }
        if let Some(hint) = self.hint {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::LightBlue),
            )));
        }
        let height = lines.len() as u16;
        let top = area.y + area.height.saturating_sub(height) / 2;
        let rect = Rect {
            x: area.x,
            y: top,
            width: area.width,
            height: area.height.saturating_sub(top - area.y),
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rect, buf);
    }
}
