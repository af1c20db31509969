//! Point-in-time candlestick and crossover detection for the latest bar.

use super::indicators::{Sma, MIN_BARS};
use crate::config::SignalThresholds;
use crate::error::{AppError, Result};
use crate::types::{Bar, Crossover, IndicatorSet, PatternFlags};

const MOMENTUM_LOOKBACK: usize = 3;
const MOMENTUM_MIN_GREEN: usize = 2;

/// Detect all pattern flags for the latest bar.
pub fn detect(
    bars: &[Bar],
    indicators: &IndicatorSet,
    thresholds: &SignalThresholds,
) -> Result<PatternFlags> {
    if bars.len() < MIN_BARS {
        return Err(AppError::insufficient(MIN_BARS, bars.len()));
    }

    let prev = &bars[bars.len() - 2];
    let last = &bars[bars.len() - 1];

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let volume_avg = Sma::new(thresholds.surge_window).latest(&volumes);
    let volume_surge = volume_avg
        .map(|avg| last.volume >= thresholds.surge_multiplier * avg)
        .unwrap_or(false);

    let early_volume = bars[0].volume;

    Ok(PatternFlags {
        bullish_engulfing: is_bullish_engulfing(prev, last),
        bearish_engulfing: is_bearish_engulfing(prev, last),
        crossover: crossover(indicators),
        volume_surge,
        volume_avg,
        early_volume,
        high_early_volume: early_volume >= thresholds.early_volume_threshold,
        momentum: has_momentum(bars),
    })
}

/// Red candle followed by a green one whose body wraps it.
pub fn is_bullish_engulfing(prev: &Bar, last: &Bar) -> bool {
    prev.is_red() && last.is_green() && last.open < prev.close && last.close > prev.open
}

/// Green candle followed by a red one whose body wraps it.
pub fn is_bearish_engulfing(prev: &Bar, last: &Bar) -> bool {
    prev.is_green() && last.is_red() && last.open > prev.close && last.close < prev.open
}

/// Sign change of the MACD gap between the last two bars.
pub fn crossover(indicators: &IndicatorSet) -> Option<Crossover> {
    let last = indicators.last_index()?;
    let prev_gap = indicators.macd_gap(last.checked_sub(1)?)?;
    let gap = indicators.macd_gap(last)?;

    if prev_gap < 0.0 && gap > 0.0 {
        Some(Crossover::Bullish)
    } else if prev_gap > 0.0 && gap < 0.0 {
        Some(Crossover::Bearish)
    } else {
        None
    }
}

/// At least two of the last three candles closed green.
pub fn has_momentum(bars: &[Bar]) -> bool {
    if bars.len() < MOMENTUM_LOOKBACK {
        return false;
    }
    bars[bars.len() - MOMENTUM_LOOKBACK..]
        .iter()
        .filter(|b| b.is_green())
        .count()
        >= MOMENTUM_MIN_GREEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::compute;
    use chrono::{TimeZone, Utc};

    fn candle(i: usize, open: f64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 900, 0).unwrap(),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume,
        }
    }

    fn flat_set(gaps: &[f64]) -> IndicatorSet {
        let n = gaps.len();
        IndicatorSet {
            ema5: vec![0.0; n],
            ema13: vec![0.0; n],
            ema21: vec![0.0; n],
            ema50: vec![0.0; n],
            ema200: vec![0.0; n],
            rsi14: vec![None; n],
            macd: gaps.to_vec(),
            macd_signal: vec![0.0; n],
            macd_histogram: gaps.to_vec(),
        }
    }

    // ========================================================================
    // Engulfing
    // ========================================================================

    #[test]
    fn test_bullish_engulfing_detected() {
        let prev = candle(0, 10.0, 9.0, 1.0);
        let last = candle(1, 8.0, 11.0, 1.0);
        assert!(is_bullish_engulfing(&prev, &last));
        assert!(!is_bearish_engulfing(&prev, &last));
    }

    #[test]
    fn test_no_engulfing_without_color_change() {
        let prev = candle(0, 10.0, 11.0, 1.0);
        let last = candle(1, 9.0, 8.0, 1.0);
        assert!(!is_bullish_engulfing(&prev, &last));
    }

    #[test]
    fn test_bearish_engulfing_detected() {
        let prev = candle(0, 9.0, 10.0, 1.0);
        let last = candle(1, 11.0, 8.0, 1.0);
        assert!(is_bearish_engulfing(&prev, &last));
        assert!(!is_bullish_engulfing(&prev, &last));
    }

    #[test]
    fn test_partial_body_is_not_engulfing() {
        let prev = candle(0, 10.0, 9.0, 1.0);
        let last = candle(1, 9.5, 9.8, 1.0);
        assert!(!is_bullish_engulfing(&prev, &last));
    }

    // ========================================================================
    // Crossover
    // ========================================================================

    #[test]
    fn test_crossover_directions() {
        assert_eq!(crossover(&flat_set(&[-0.2, 0.1])), Some(Crossover::Bullish));
        assert_eq!(crossover(&flat_set(&[0.2, -0.1])), Some(Crossover::Bearish));
        assert_eq!(crossover(&flat_set(&[0.2, 0.1])), None);
        assert_eq!(crossover(&flat_set(&[-0.2, -0.1])), None);
    }

    #[test]
    fn test_touching_zero_is_not_a_crossover() {
        assert_eq!(crossover(&flat_set(&[-0.2, 0.0])), None);
        assert_eq!(crossover(&flat_set(&[0.0, 0.3])), None);
    }

    #[test]
    fn test_crossover_needs_two_points() {
        assert_eq!(crossover(&flat_set(&[0.5])), None);
    }

    // ========================================================================
    // Momentum and volume
    // ========================================================================

    #[test]
    fn test_momentum_two_of_three_green() {
        let bars = vec![
            candle(0, 10.0, 9.0, 1.0),
            candle(1, 9.0, 10.0, 1.0),
            candle(2, 10.0, 9.5, 1.0),
            candle(3, 9.5, 10.5, 1.0),
        ];
        assert!(has_momentum(&bars));
    }

    #[test]
    fn test_momentum_one_of_three_green() {
        let bars = vec![
            candle(0, 9.0, 10.0, 1.0),
            candle(1, 10.0, 9.0, 1.0),
            candle(2, 9.0, 8.0, 1.0),
        ];
        assert!(!has_momentum(&bars));
    }

    #[test]
    fn test_momentum_short_history_is_false() {
        let bars = vec![candle(0, 9.0, 10.0, 1.0), candle(1, 10.0, 11.0, 1.0)];
        assert!(!has_momentum(&bars));
    }

    fn volume_bars(base: f64, last: f64) -> Vec<Bar> {
        let mut bars: Vec<Bar> = (0..24).map(|i| candle(i, 10.0, 10.1, base)).collect();
        bars.push(candle(24, 10.1, 10.2, last));
        bars
    }

    #[test]
    fn test_volume_surge_window_includes_latest() {
        let thresholds = SignalThresholds::default();
        // avg = (19 * 100 + 250) / 20 = 107.5; 1.5x = 161.25
        let bars = volume_bars(100.0, 250.0);
        let set = compute(&bars).unwrap();
        let flags = detect(&bars, &set, &thresholds).unwrap();
        assert!(flags.volume_surge);
        assert_eq!(flags.volume_avg, Some(107.5));

        let bars = volume_bars(100.0, 150.0);
        let set = compute(&bars).unwrap();
        assert!(!detect(&bars, &set, &thresholds).unwrap().volume_surge);
    }

    #[test]
    fn test_volume_surge_needs_full_window() {
        let bars: Vec<Bar> = (0..10)
            .map(|i| candle(i, 10.0, 10.1, if i == 9 { 1e9 } else { 1.0 }))
            .collect();
        let set = compute(&bars).unwrap();
        let flags = detect(&bars, &set, &SignalThresholds::default()).unwrap();
        assert!(!flags.volume_surge);
        assert_eq!(flags.volume_avg, None);
    }

    #[test]
    fn test_early_volume_threshold() {
        let thresholds = SignalThresholds::default();
        let mut bars = volume_bars(100.0, 100.0);
        bars[0].volume = 900_000.0;
        let set = compute(&bars).unwrap();
        let flags = detect(&bars, &set, &thresholds).unwrap();
        assert_eq!(flags.early_volume, 900_000.0);
        assert!(flags.high_early_volume);

        bars[0].volume = 899_999.0;
        assert!(!detect(&bars, &set, &thresholds).unwrap().high_early_volume);
    }

    #[test]
    fn test_detect_requires_two_bars() {
        let bars = vec![candle(0, 10.0, 11.0, 1.0)];
        let set = flat_set(&[0.0]);
        assert!(matches!(
            detect(&bars, &set, &SignalThresholds::default()),
            Err(AppError::InsufficientData { needed: 2, available: 1, .. })
        ));
    }

    #[test]
    fn test_detect_with_two_bars_is_neutral_not_error() {
        let bars = vec![candle(0, 10.0, 9.0, 1.0), candle(1, 8.0, 11.0, 1.0)];
        let set = compute(&bars).unwrap();
        let flags = detect(&bars, &set, &SignalThresholds::default()).unwrap();
        assert!(flags.bullish_engulfing);
        assert!(!flags.momentum);
        assert!(!flags.volume_surge);
    }
}
