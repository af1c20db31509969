//! Early MACD weakening checks for held positions.

use super::indicators::{self, MIN_BARS};
use super::round_to;
use crate::config::GuardConfig;
use crate::error::{AppError, Result};
use crate::types::{Bar, MacdWeakness};

/// Flag a position whose positive MACD lead is shrinking below the weakness gap.
pub fn check_weakness(symbol: &str, bars: &[Bar], config: &GuardConfig) -> Result<MacdWeakness> {
    if bars.len() < MIN_BARS {
        return Err(AppError::insufficient(MIN_BARS, bars.len()).for_symbol(symbol));
    }

    let set = indicators::compute(bars).map_err(|e| e.for_symbol(symbol))?;
    let last = bars.len() - 1;
    let (gap_now, gap_prev) = match (set.macd_gap(last), set.macd_gap(last - 1)) {
        (Some(now), Some(prev)) => (now, prev),
        _ => return Err(AppError::insufficient(MIN_BARS, set.len()).for_symbol(symbol)),
    };

    Ok(MacdWeakness {
        symbol: symbol.to_string(),
        weakening: gap_now > 0.0 && gap_now < gap_prev && gap_now < config.weakness_gap,
        gap: round_to(gap_now, 3),
    })
}
