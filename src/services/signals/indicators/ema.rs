//! Exponential Moving Average (EMA) indicator.

use super::Indicator;

/// EMA (Exponential Moving Average).
///
/// Seeded with the first value and smoothed with `k = 2 / (period + 1)`, so
/// it is defined at every index. Each output depends only on the inputs up to
/// and including its own index.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Smoothing factor.
    pub fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// Full EMA series, one value per input.
    pub fn series(&self, values: &[f64]) -> Vec<f64> {
        let k = self.multiplier();
        let mut out = Vec::with_capacity(values.len());
        let mut prev = match values.first() {
            Some(first) => *first,
            None => return out,
        };
        out.push(prev);
        for value in &values[1..] {
            prev = (value - prev) * k + prev;
            out.push(prev);
        }
        out
    }
}

impl Indicator for Ema {
    fn name(&self) -> String {
        format!("EMA ({})", self.period)
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        self.series(values).into_iter().map(Some).collect()
    }
}
