use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation for a fixed trading interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Closed above its open.
    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    /// Closed below its open.
    pub fn is_red(&self) -> bool {
        self.close < self.open
    }

    /// High-low range of the bar.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Absolute size of the candle body.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }
}

/// Sort bars chronologically and drop repeated timestamps, keeping the first occurrence.
pub fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    bars
}
