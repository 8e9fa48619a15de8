#![allow(dead_code)]

use std::path::PathBuf;

use ratatui::backend::TestBackend;
use ratatui::Terminal;

use trader_dashboard::model::bar::TickerBar;
use trader_dashboard::model::snapshot::Snapshot;

pub fn bar(i: usize, open: f64, close: f64) -> TickerBar {
    TickerBar {
        date: format!("2024-{:02}-{:02}", 1 + (i / 28) % 12, 1 + i % 28),
        open,
        high: open.max(close) + 5.0,
        low: open.min(close) - 5.0,
        close,
        volume: 10_000.0 + (i % 7) as f64 * 1_000.0,
        return_1d: None,
        ma_5: if i >= 4 { Some(close - 1.0) } else { None },
        ma_20: if i >= 19 { Some(close - 2.0) } else { None },
        ma_60: None,
        rsi: if i >= 14 { Some(40.0 + (i % 30) as f64) } else { None },
        volatility: None,
    }
}

/// Alternating up/down bars drifting upwards.
pub fn series(n: usize) -> Vec<TickerBar> {
    (0..n)
        .map(|i| {
            let base = 3_000.0 + i as f64 * 2.0;
            if i % 2 == 0 {
                bar(i, base, base + 10.0)
            } else {
                bar(i, base + 10.0, base)
            }
        })
        .collect()
}

pub const SNAPSHOT_JSON: &str = r#"{
  "last_update": "2024-03-08 18:05",
  "tickers": {
    "7203.T": {"name": "Toyota Motor", "data": [
      {"date":"2024-03-06","open":3380,"high":3420,"low":3360,"close":3400,"volume":21000000,"ma_5":3350.5,"rsi":55.1},
      {"date":"2024-03-07","open":3400,"high":3450,"low":3380,"close":3440,"volume":18000000,"ma_5":3372.0,"rsi":58.4},
      {"date":"2024-03-08","open":3440,"high":3520,"low":3430,"close":3500,"volume":25000000,"ma_5":3401.2,"rsi":63.0}
    ]},
    "6758.T": {"name": "Sony Group", "data": [
      {"date":"2024-03-08","open":13000,"high":13100,"low":12800,"close":12900,"volume":4000000}
    ]},
    "9984.T": {"name": "SoftBank Group", "data": []}
  },
  "signals_history": [
    {"date": "2024-03-08", "signals": [
      {"ticker":"7203.T","name":"Toyota Motor","date":"2024-03-08","close":3500,
       "prob_up":0.83,"action":"BUY","reason":"Breakout above MA20","limit_price":3480,"stop_loss":3380},
      {"ticker":"6758.T","name":"Sony Group","date":"2024-03-08","close":12900,
       "prob_up":0.22,"action":"MILD_SELL","reason":""}
    ]},
    {"date": "2024-03-07", "signals": [
      {"ticker":"6758.T","name":"Sony Group","date":"2024-03-07","close":13000,
       "prob_up":0.5,"action":"HOLD","reason":""}
    ]},
    {"date": "2024-03-06", "signals": [
      {"ticker":"7203.T","name":"Toyota Motor","date":"2024-03-06","close":3400,
       "prob_up":0.12,"action":"SELL","reason":"Overbought"}
    ]}
  ]
}"#;

pub fn sample_snapshot() -> Snapshot {
    serde_json::from_str(SNAPSHOT_JSON).expect("fixture snapshot parses")
}

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("trader-dashboard-{}-{}", name, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
