use std::fmt;
use std::str::FromStr;

use crate::model::bar::TickerBar;

/// Range selector of the detail chart, counted in trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    All,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::OneMonth,
        DateRange::ThreeMonths,
        DateRange::SixMonths,
        DateRange::OneYear,
        DateRange::All,
    ];

    /// `None` means unbounded.
    pub fn trading_days(self) -> Option<usize> {
        match self {
            DateRange::OneMonth => Some(22),
            DateRange::ThreeMonths => Some(66),
            DateRange::SixMonths => Some(132),
            DateRange::OneYear => Some(250),
            DateRange::All => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            DateRange::OneMonth => "1m",
            DateRange::ThreeMonths => "3m",
            DateRange::SixMonths => "6m",
            DateRange::OneYear => "1y",
            DateRange::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::OneMonth => "1M",
            DateRange::ThreeMonths => "3M",
            DateRange::SixMonths => "6M",
            DateRange::OneYear => "1Y",
            DateRange::All => "All",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(DateRange::OneMonth),
            "3m" => Ok(DateRange::ThreeMonths),
            "6m" => Ok(DateRange::SixMonths),
            "1y" => Ok(DateRange::OneYear),
            "all" => Ok(DateRange::All),
            other => Err(format!(
                "unknown date range '{}': expected one of 1m/3m/6m/1y/all",
                other
            )),
        }
    }
}

/// Trailing slice of `series` covered by `range`. Borrowed, never copied.
pub fn window(series: &[TickerBar], range: DateRange) -> &[TickerBar] {
    match range.trading_days() {
        Some(days) if days < series.len() => &series[series.len() - days..],
        _ => series,
    }
}

/// Vertical domain of the price panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub const EMPTY: PriceBounds = PriceBounds { min: 0.0, max: 1.0 };

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` in the domain, 0.0 at `min` and 1.0 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= f64::EPSILON {
            0.5
        } else {
            (value - self.min) / span
        }
    }
}

/// Min/max over high, low and close, padded by 5% of the spread each side.
pub fn price_bounds(bars: &[TickerBar]) -> PriceBounds {
    if bars.is_empty() {
        return PriceBounds::EMPTY;
    }
    let (min, max) = bars
        .iter()
        .flat_map(|b| [b.high, b.low, b.close])
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return PriceBounds::EMPTY;
    }
    let margin = (max - min) * 0.05;
    PriceBounds {
        min: min - margin,
        max: max + margin,
    }
}

/// Axis ceiling of the volume panel: peak volume (at least 1) plus 10%.
pub fn volume_ceiling(bars: &[TickerBar]) -> f64 {
    let peak = bars
        .iter()
        .map(|b| b.volume)
        .filter(|v| v.is_finite())
        .fold(1.0_f64, f64::max);
    peak * 1.1
}

/// A windowed series with the axis domains derived from it.
#[derive(Debug, Clone, Copy)]
pub struct ChartWindow<'a> {
    pub range: DateRange,
    pub bars: &'a [TickerBar],
    pub price: PriceBounds,
    pub volume_max: f64,
}

impl<'a> ChartWindow<'a> {
    pub fn new(series: &'a [TickerBar], range: DateRange) -> Self {
        let bars = window(series, range);
        Self {
            range,
            bars,
            price: price_bounds(bars),
            volume_max: volume_ceiling(bars),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
