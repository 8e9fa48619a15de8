//! Display classification for signals: labels, style tokens and the
//! probability colour bands used by the overview cards.

use ratatui::style::{Color, Modifier, Style};

use crate::model::signal::Action;

const RED: Color = Color::Rgb(248, 113, 113);
const ORANGE: Color = Color::Rgb(251, 146, 60);
const SLATE: Color = Color::Rgb(148, 163, 184);
const CYAN: Color = Color::Rgb(34, 211, 238);
const GREEN: Color = Color::Rgb(74, 222, 128);

const RED_BG: Color = Color::Rgb(69, 10, 10);
const ORANGE_BG: Color = Color::Rgb(67, 20, 7);
const SLATE_BG: Color = Color::Rgb(51, 65, 85);
const CYAN_BG: Color = Color::Rgb(8, 51, 68);
const GREEN_BG: Color = Color::Rgb(5, 46, 22);

/// Named visual style. The name is stable and is what tests and exports see;
/// `style()` is what the terminal renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleToken {
    name: &'static str,
    fg: Color,
    bg: Option<Color>,
    bold: bool,
}

impl StyleToken {
    const fn new(name: &'static str, fg: Color, bg: Option<Color>, bold: bool) -> Self {
        Self { name, fg, bg, bold }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn style(&self) -> Style {
        let mut style = Style::default().fg(self.fg);
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }
}

pub fn label(action: Action) -> &'static str {
    match action {
        Action::Buy => "Buy",
        Action::MildBuy => "Mild Buy",
        Action::Hold => "Hold",
        Action::MildSell => "Mild Sell",
        Action::Sell => "Sell",
    }
}

/// Badge marker drawn in front of the label.
pub fn glyph(action: Action) -> &'static str {
    match action {
        Action::Buy => "▲",
        Action::MildBuy => "△",
        Action::Hold => "-",
        Action::MildSell => "▽",
        Action::Sell => "▼",
    }
}

pub fn badge_style(action: Action) -> StyleToken {
    match action {
        Action::Buy => StyleToken::new("badge-buy", RED, Some(RED_BG), true),
        Action::MildBuy => StyleToken::new("badge-mild-buy", ORANGE, Some(ORANGE_BG), true),
        Action::Hold => StyleToken::new("badge-hold", Color::Gray, Some(SLATE_BG), true),
        Action::MildSell => StyleToken::new("badge-mild-sell", CYAN, Some(CYAN_BG), true),
        Action::Sell => StyleToken::new("badge-sell", GREEN, Some(GREEN_BG), true),
    }
}

pub fn text_style(action: Action) -> StyleToken {
    match action {
        Action::Buy => StyleToken::new("text-buy", RED, None, true),
        Action::MildBuy => StyleToken::new("text-mild-buy", ORANGE, None, true),
        Action::Hold => StyleToken::new("text-hold", SLATE, None, true),
        Action::MildSell => StyleToken::new("text-mild-sell", CYAN, None, true),
        Action::Sell => StyleToken::new("text-sell", GREEN, None, true),
    }
}

/// Border colour of the signal card.
pub fn card_style(action: Action) -> StyleToken {
    match action {
        Action::Buy => StyleToken::new("card-buy", RED, None, false),
        Action::MildBuy => StyleToken::new("card-mild-buy", ORANGE, None, false),
        Action::Hold => StyleToken::new("card-hold", Color::DarkGray, None, false),
        Action::MildSell => StyleToken::new("card-mild-sell", CYAN, None, false),
        Action::Sell => StyleToken::new("card-sell", GREEN, None, false),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityBand {
    StrongUp,
    MildUp,
    Neutral,
    MildDown,
    StrongDown,
}

impl ProbabilityBand {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbabilityBand::StrongUp => "strong-up",
            ProbabilityBand::MildUp => "mild-up",
            ProbabilityBand::Neutral => "neutral",
            ProbabilityBand::MildDown => "mild-down",
            ProbabilityBand::StrongDown => "strong-down",
        }
    }

    pub fn style(self) -> Style {
        let fg = match self {
            ProbabilityBand::StrongUp => RED,
            ProbabilityBand::MildUp => ORANGE,
            ProbabilityBand::Neutral => Color::Gray,
            ProbabilityBand::MildDown => CYAN,
            ProbabilityBand::StrongDown => GREEN,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}

/// First match wins. The bands overlap, so the order of the checks matters.
pub fn probability_style(prob: f64) -> ProbabilityBand {
    if prob >= 0.80 {
        ProbabilityBand::StrongUp
    } else if prob >= 0.65 {
        ProbabilityBand::MildUp
    } else if prob <= 0.10 {
        ProbabilityBand::StrongDown
    } else if prob <= 0.25 {
        ProbabilityBand::MildDown
    } else {
        ProbabilityBand::Neutral
    }
}

pub fn format_probability(prob: f64) -> String {
    format!("{:.1}%", prob * 100.0)
}

/// Thousands-separated price with at most two decimals, trailing zeros dropped.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "---".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

pub fn format_optional_price(value: Option<f64>) -> String {
    value.map(format_price).unwrap_or_else(|| "---".to_string())
}

/// Compact volume axis label: `12M`, `340K`, `999`.
pub fn format_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.0}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}
