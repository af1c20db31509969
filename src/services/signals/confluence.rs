//! Confluence scoring: five independent binary sub-signals summed into a 0-5 score.

use super::indicators::{Indicator, Rsi};
use super::round_to;
use crate::config::SignalThresholds;
use crate::error::{AppError, Result};
use crate::types::{Bar, ConfluenceScore, ConfluenceSignals, IndicatorSet, PatternFlags};

/// Largest magnitude a closeness score can take.
pub const CLOSENESS_LIMIT: f64 = 10.0;

/// Signed number of scoring units between the MACD line and its signal line.
///
/// Clamped to [-10, 10] and truncated toward zero, so a gap of 0.1 with a unit
/// of 0.03 is 3, not 4.
pub fn closeness_score(gap: f64, unit: f64) -> i32 {
    (gap / unit).clamp(-CLOSENESS_LIMIT, CLOSENESS_LIMIT) as i32
}

/// Score the latest bar.
pub fn score(
    bars: &[Bar],
    indicators: &IndicatorSet,
    patterns: &PatternFlags,
    thresholds: &SignalThresholds,
) -> Result<ConfluenceScore> {
    let i = indicators
        .last_index()
        .ok_or_else(|| AppError::insufficient(1, 0))?;
    let last = bars.get(i).ok_or_else(|| AppError::insufficient(i + 1, bars.len()))?;

    let gap = indicators
        .macd_gap(i)
        .ok_or_else(|| AppError::insufficient(i + 1, indicators.len()))?;
    let rsi = indicators
        .rsi14
        .get(i)
        .copied()
        .flatten()
        .ok_or_else(|| AppError::insufficient(Rsi::default().min_periods(), bars.len()))?;
    let ema200 = indicators
        .ema200
        .get(i)
        .copied()
        .ok_or_else(|| AppError::insufficient(i + 1, indicators.ema200.len()))?;

    let signals = ConfluenceSignals {
        macd_approaching: gap < 0.0 && gap.abs() <= thresholds.macd_gap_window,
        rsi_ok: rsi > thresholds.rsi_floor,
        volume_surge: patterns.volume_surge,
        above_ema200: last.close > ema200,
        bullish_engulfing: patterns.bullish_engulfing,
    };

    Ok(ConfluenceScore {
        score: signals.count(),
        signals,
        closeness_score: closeness_score(gap, thresholds.closeness_unit),
        actual_diff: round_to(gap, 3),
        rsi,
    })
}
