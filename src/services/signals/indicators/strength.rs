//! Trend and candle strength diagnostics.

use super::Sma;
use crate::error::{AppError, Result};
use crate::services::signals::round_to;
use crate::types::{Bar, CandleStrength, IndicatorSet, TrendStrength};

const TREND_MIN_BARS: usize = 5;
const STRONG_TREND_RATIO: f64 = 0.66;
const VOLUME_RATIO_WINDOW: usize = 10;

/// Fraction of EMA5/13/21 the latest close sits above.
pub fn trend_strength(bars: &[Bar], indicators: &IndicatorSet) -> Result<TrendStrength> {
    if bars.len() < TREND_MIN_BARS {
        return Err(AppError::insufficient(TREND_MIN_BARS, bars.len()));
    }
    let i = bars.len() - 1;
    let close = bars[i].close;
    let emas = [
        indicators.ema5.get(i).copied(),
        indicators.ema13.get(i).copied(),
        indicators.ema21.get(i).copied(),
    ];
    let above = emas.iter().flatten().filter(|&&ema| close > ema).count();
    let ratio = round_to(above as f64 / emas.len() as f64, 2);

    Ok(TrendStrength {
        ratio,
        is_strong: ratio >= STRONG_TREND_RATIO,
    })
}

/// Body, close position and relative volume of the latest candle.
pub fn candle_strength(bars: &[Bar]) -> Result<CandleStrength> {
    let last = bars.last().ok_or_else(|| AppError::insufficient(1, 0))?;
    let range = last.range();

    let body_ratio = if range > 0.0 { last.body() / range } else { 0.0 };
    let close_position = if range > 0.0 {
        (last.high - last.close) / range
    } else {
        1.0
    };

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let volume_ratio = match Sma::new(VOLUME_RATIO_WINDOW).latest(&volumes) {
        Some(avg) if avg > 0.0 => last.volume / avg,
        _ => 1.0,
    };

    Ok(CandleStrength {
        body_ratio: round_to(body_ratio, 2),
        close_position: round_to(close_position, 2),
        volume_ratio: round_to(volume_ratio, 2),
    })
}
