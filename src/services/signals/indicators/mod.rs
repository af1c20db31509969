//! Technical indicator implementations.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod strength;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;
pub use strength::{candle_strength, trend_strength};

use crate::error::{AppError, Result};
use crate::types::{Bar, IndicatorSet};

/// Fewest bars any period-based indicator can be computed from.
pub const MIN_BARS: usize = 2;

/// Trait for causal single-series indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name.
    fn name(&self) -> String;

    /// Minimum number of inputs before the first defined output.
    fn min_periods(&self) -> usize;

    /// One output per input, `None` where the indicator is not yet defined.
    fn calculate(&self, values: &[f64]) -> Vec<Option<f64>>;
}

/// Compute the full indicator set for a chronologically ordered bar sequence.
pub fn compute(bars: &[Bar]) -> Result<IndicatorSet> {
    if bars.len() < MIN_BARS {
        return Err(AppError::insufficient(MIN_BARS, bars.len()));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let macd = Macd::default().calculate(&closes);

    Ok(IndicatorSet {
        ema5: Ema::new(5).series(&closes),
        ema13: Ema::new(13).series(&closes),
        ema21: Ema::new(21).series(&closes),
        ema50: Ema::new(50).series(&closes),
        ema200: Ema::new(200).series(&closes),
        rsi14: Rsi::default().calculate(&closes),
        macd: macd.main,
        macd_signal: macd.signal,
        macd_histogram: macd.histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| Bar {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 900, 0).unwrap(),
                open: *close,
                high: close + 1.0,
                low: close - 1.0,
                close: *close,
                volume: 10_000.0,
            })
            .collect()
    }

    #[test]
    fn test_compute_rejects_short_sequences() {
        for n in 0..MIN_BARS {
            let bars = create_bars(&vec![100.0; n]);
            assert!(matches!(
                compute(&bars),
                Err(AppError::InsufficientData { needed: 2, .. })
            ));
        }
    }

    #[test]
    fn test_compute_two_bars() {
        let set = compute(&create_bars(&[100.0, 101.0])).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rsi14, vec![None, None]);
    }

    #[test]
    fn test_compute_index_aligned() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let set = compute(&create_bars(&closes)).unwrap();
        assert_eq!(set.ema5.len(), 60);
        assert_eq!(set.ema200.len(), 60);
        assert_eq!(set.rsi14.len(), 60);
        assert_eq!(set.macd_signal.len(), 60);
        assert!(set.rsi14[14].is_some());
    }

    #[test]
    fn test_compute_prefix_independent_of_future_bars() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let full = compute(&create_bars(&closes)).unwrap();
        let prefix = compute(&create_bars(&closes[..50])).unwrap();
        assert_eq!(&full.ema21[..50], prefix.ema21.as_slice());
        assert_eq!(&full.rsi14[..50], prefix.rsi14.as_slice());
        assert_eq!(&full.macd_signal[..50], prefix.macd_signal.as_slice());
    }
}
