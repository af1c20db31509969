use serde::{Deserialize, Serialize};

/// Per-bar indicator series, index-aligned with the bar sequence they were computed from.
///
/// Every value at index `i` depends only on bars `0..=i`. Series that are not yet
/// defined at an index (RSI during its warm-up) hold `None` there.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub ema5: Vec<f64>,
    pub ema13: Vec<f64>,
    pub ema21: Vec<f64>,
    pub ema50: Vec<f64>,
    pub ema200: Vec<f64>,
    pub rsi14: Vec<Option<f64>>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_histogram: Vec<f64>,
}

impl IndicatorSet {
    /// Number of bars the set covers.
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// MACD main line minus signal line at `index`.
    pub fn macd_gap(&self, index: usize) -> Option<f64> {
        Some(self.macd.get(index)? - self.macd_signal.get(index)?)
    }

    /// Index of the most recent bar.
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }
}

/// Direction of a MACD line crossing its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    Bullish,
    Bearish,
}

/// Point-in-time pattern facts for the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFlags {
    pub bullish_engulfing: bool,
    pub bearish_engulfing: bool,
    pub crossover: Option<Crossover>,
    pub volume_surge: bool,
    /// Trailing volume average the surge was measured against.
    pub volume_avg: Option<f64>,
    /// Volume of the first bar in the window.
    pub early_volume: f64,
    pub high_early_volume: bool,
    pub momentum: bool,
}

/// The five binary sub-signals behind a confluence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfluenceSignals {
    pub macd_approaching: bool,
    pub rsi_ok: bool,
    pub volume_surge: bool,
    pub above_ema200: bool,
    pub bullish_engulfing: bool,
}

impl ConfluenceSignals {
    /// Count of true sub-signals.
    pub fn count(&self) -> u8 {
        [
            self.macd_approaching,
            self.rsi_ok,
            self.volume_surge,
            self.above_ema200,
            self.bullish_engulfing,
        ]
        .iter()
        .filter(|s| **s)
        .count() as u8
    }
}

/// Output of the confluence scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceScore {
    pub score: u8,
    pub signals: ConfluenceSignals,
    /// Signed distance from a MACD crossover in scoring units, clamped to [-10, 10].
    pub closeness_score: i32,
    /// MACD gap rounded to 3 decimals.
    pub actual_diff: f64,
    /// RSI at the latest bar.
    pub rsi: f64,
}

/// Confidence bucket derived from a confluence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Reject,
    Watchlist,
    Moderate,
    Strong,
}

impl Tier {
    /// Section label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "Strong (5/5)",
            Self::Moderate => "Moderate (4/5)",
            Self::Watchlist => "Watchlist (3/5)",
            Self::Reject => "Reject",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Strong => "🟢",
            Self::Moderate => "🟡",
            Self::Watchlist => "🟠",
            Self::Reject => "⚪",
        }
    }

    /// Suggested handling for records in this tier.
    pub fn action_phrase(&self) -> &'static str {
        match self {
            Self::Strong => "✅ High Confidence",
            Self::Moderate => "⚠️ Partial Watchlist",
            Self::Watchlist => "🔎 Observe Only",
            Self::Reject => "❌ Rejected",
        }
    }

    /// Whether records in this tier are persisted and reported.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Reject)
    }
}

/// How many of the short EMAs the latest close sits above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendStrength {
    /// Fraction of EMA5/13/21 below the close, rounded to 2 decimals.
    pub ratio: f64,
    pub is_strong: bool,
}

/// Shape of the latest candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleStrength {
    pub body_ratio: f64,
    pub close_position: f64,
    pub volume_ratio: f64,
}

/// Result of checking a held position for a shrinking MACD lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdWeakness {
    pub symbol: String,
    pub weakening: bool,
    /// Current MACD gap rounded to 3 decimals.
    pub gap: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_count() {
        let mut signals = ConfluenceSignals::default();
        assert_eq!(signals.count(), 0);
        signals.rsi_ok = true;
        signals.bullish_engulfing = true;
        assert_eq!(signals.count(), 2);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Strong > Tier::Moderate);
        assert!(Tier::Moderate > Tier::Watchlist);
        assert!(Tier::Watchlist > Tier::Reject);
    }

    #[test]
    fn test_tier_presentation() {
        assert_eq!(Tier::Strong.icon(), "🟢");
        assert_eq!(Tier::Moderate.icon(), "🟡");
        assert_eq!(Tier::Watchlist.icon(), "🟠");
        assert_eq!(Tier::Watchlist.label(), "Watchlist (3/5)");
        assert!(!Tier::Reject.is_reportable());
        assert!(Tier::Watchlist.is_reportable());
    }

    #[test]
    fn test_macd_gap() {
        let set = IndicatorSet {
            ema5: vec![1.0, 1.0],
            ema13: vec![1.0, 1.0],
            ema21: vec![1.0, 1.0],
            ema50: vec![1.0, 1.0],
            ema200: vec![1.0, 1.0],
            rsi14: vec![None, None],
            macd: vec![0.5, 0.25],
            macd_signal: vec![0.25, 0.5],
            macd_histogram: vec![0.25, -0.25],
        };
        assert_eq!(set.macd_gap(0), Some(0.25));
        assert_eq!(set.macd_gap(1), Some(-0.25));
        assert_eq!(set.macd_gap(2), None);
        assert_eq!(set.last_index(), Some(1));
    }
}
