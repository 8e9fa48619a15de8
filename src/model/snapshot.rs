use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::bar::TickerBar;
use super::signal::{HistoryEntry, Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub name: String,
    #[serde(default)]
    pub data: Vec<TickerBar>,
}

impl TickerInfo {
    pub fn latest_bar(&self) -> Option<&TickerBar> {
        self.data.last()
    }
}

/// The whole `history_data.json` document. Tickers keep document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_update: String,
    #[serde(default)]
    pub tickers: IndexMap<String, TickerInfo>,
    /// Newest trading day first.
    #[serde(default)]
    pub signals_history: Vec<HistoryEntry>,
}

/// One row of a ticker's signal history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow<'a> {
    pub date: &'a str,
    pub signal: &'a Signal,
}

impl Snapshot {
    pub fn ticker(&self, code: &str) -> Option<&TickerInfo> {
        self.tickers.get(code)
    }

    pub fn ticker_codes(&self) -> impl Iterator<Item = &str> {
        self.tickers.keys().map(String::as_str)
    }

    pub fn latest_entry(&self) -> Option<&HistoryEntry> {
        self.signals_history.first()
    }

    /// Signal for `code` on the most recent day, if the pipeline emitted one.
    pub fn latest_signal(&self, code: &str) -> Option<&Signal> {
        self.latest_entry().and_then(|entry| entry.signal_for(code))
    }

    /// Newest-first history for `code`, skipping days without a signal.
    pub fn signal_history(&self, code: &str) -> Vec<HistoryRow<'_>> {
        self.signals_history
            .iter()
            .filter_map(|entry| {
                entry.signal_for(code).map(|signal| HistoryRow {
                    date: entry.date.as_str(),
                    signal,
                })
            })
            .collect()
    }
}
