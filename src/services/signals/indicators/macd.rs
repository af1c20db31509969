//! MACD (Moving Average Convergence Divergence) indicator.

use super::Ema;

/// MACD lines, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub main: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD indicator with the standard (12, 26, 9) parameters.
///
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: Ema::new(12),
            slow: Ema::new(26),
            signal: Ema::new(9),
        }
    }
}

impl Macd {
    pub fn calculate(&self, closes: &[f64]) -> MacdSeries {
        let fast = self.fast.series(closes);
        let slow = self.slow.series(closes);
        let main: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = self.signal.series(&main);
        let histogram = main.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdSeries {
            main,
            signal,
            histogram,
        }
    }
}
