use serde::{Deserialize, Serialize};

/// Colour class of a daily bar. Ties (`close == open`) count as up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn classify(open: f64, close: f64) -> Self {
        if close >= open {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// One trading day of a ticker series, with the indicators the pipeline
/// precomputed. Indicators are `None` until enough history exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_1d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_60: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
}

impl TickerBar {
    pub fn direction(&self) -> Direction {
        Direction::classify(self.open, self.close)
    }
}

/// `MM/DD` axis label; the raw date string when it does not parse.
pub fn short_date(raw: &str) -> String {
    let day = raw.get(..10).unwrap_or(raw);
    match chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%d").to_string(),
        Err(_) => raw.to_string(),
    }
}
