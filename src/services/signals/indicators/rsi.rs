//! Relative Strength Index (RSI) indicator.

use super::Indicator;

/// RSI (Relative Strength Index) with Wilder smoothing.
///
/// The first average gain/loss is a plain mean of the first `period` changes;
/// later values are smoothed as `(prev * (period - 1) + current) / period`.
/// Values range from 0-100 and are undefined until `period` changes exist.
///
/// An `ewm(alpha = 1/period)` RMA seeded from the first change produces a
/// value from the second bar on and differs noticeably over the first few
/// dozen bars. Both converge once the seed has decayed.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // A flat window carries no momentum either way.
            if avg_gain == 0.0 {
                return 50.0;
            }
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    fn name(&self) -> String {
        format!("RSI ({})", self.period)
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() < self.min_periods() {
            return out;
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = values
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let period = self.period as f64;
        let mut avg_gain = gains[..self.period].iter().sum::<f64>() / period;
        let mut avg_loss = losses[..self.period].iter().sum::<f64>() / period;
        out[self.period] = Some(Self::value(avg_gain, avg_loss));

        // Change i sits between values i and i + 1.
        for i in self.period..gains.len() {
            avg_gain = (avg_gain * (period - 1.0) + gains[i]) / period;
            avg_loss = (avg_loss * (period - 1.0) + losses[i]) / period;
            out[i + 1] = Some(Self::value(avg_gain, avg_loss));
        }

        out
    }
}
