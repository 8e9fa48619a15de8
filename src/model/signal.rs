use std::fmt;

use serde::{Deserialize, Serialize};

/// Five-level recommendation emitted by the prediction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    MildBuy,
    Hold,
    MildSell,
    Sell,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Buy,
        Action::MildBuy,
        Action::Hold,
        Action::MildSell,
        Action::Sell,
    ];

    /// Wire name, as it appears in the snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::MildBuy => "MILD_BUY",
            Action::Hold => "HOLD",
            Action::MildSell => "MILD_SELL",
            Action::Sell => "SELL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub ticker: String,
    pub name: String,
    pub date: String,
    pub close: f64,
    pub prob_up: f64,
    pub action: Action,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
}

/// All signals produced for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

impl HistoryEntry {
    pub fn signal_for(&self, ticker: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.ticker == ticker)
    }
}
