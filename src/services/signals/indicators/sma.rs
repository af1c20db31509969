//! Simple Moving Average (SMA) indicator.

use super::Indicator;

/// SMA over a trailing window that ends at (and includes) each index.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Average of the last `period` values, if there are that many.
    pub fn latest(&self, values: &[f64]) -> Option<f64> {
        if self.period == 0 || values.len() < self.period {
            return None;
        }
        let window = &values[values.len() - self.period..];
        Some(window.iter().sum::<f64>() / self.period as f64)
    }
}

impl Indicator for Sma {
    fn name(&self) -> String {
        format!("SMA ({})", self.period)
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| self.latest(&values[..=i]))
            .collect()
    }
}
