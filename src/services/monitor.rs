//! Held-position monitoring: warn when a position's MACD lead starts to fade.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::report::format_guard_alert;
use crate::config::{GuardConfig, ScanConfig};
use crate::error::{AppError, Result};
use crate::services::signals::check_weakness;
use crate::sources::{BarProvider, Notifier};
use crate::types::MacdWeakness;

/// Counts from one guard pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardOutcome {
    pub checked: usize,
    pub weakening: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: usize,
}

pub struct PositionGuard {
    provider: Arc<dyn BarProvider>,
    interval: String,
    min_bars: usize,
    delay: Duration,
    config: GuardConfig,
}

impl PositionGuard {
    pub fn new(provider: Arc<dyn BarProvider>, scan: &ScanConfig, config: GuardConfig) -> Self {
        Self {
            provider,
            interval: scan.interval.clone(),
            min_bars: scan.min_bars,
            delay: scan.request_delay(),
            config,
        }
    }

    pub async fn check(&self, symbol: &str) -> Result<MacdWeakness> {
        let bars = self
            .provider
            .fetch_bars(symbol, &self.interval, self.config.lookback_days)
            .await?;
        if bars.len() < self.min_bars {
            return Err(AppError::insufficient(self.min_bars, bars.len()).for_symbol(symbol));
        }
        check_weakness(symbol, &bars, &self.config)
    }

    /// Check every position and alert on the weakening ones.
    pub async fn run(&self, symbols: &[String], notifier: &dyn Notifier) -> GuardOutcome {
        let mut outcome = GuardOutcome::default();

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let weakness = match self.check(symbol).await {
                Ok(w) => w,
                Err(e) => {
                    warn!("Skipped position {}: {}", symbol, e);
                    outcome.skipped.push(symbol.clone());
                    continue;
                }
            };
            outcome.checked += 1;

            if !weakness.weakening {
                continue;
            }
            info!(symbol = %weakness.symbol, gap = weakness.gap, "MACD weakening");
            outcome.weakening.push(symbol.clone());

            if let Err(e) = notifier.send(&format_guard_alert(&weakness)).await {
                outcome.failed += 1;
                error!("Failed to send guard alert for {}: {}", symbol, e);
            }
        }

        info!(
            "Guard complete: {} checked, {} weakening, {} skipped",
            outcome.checked,
            outcome.weakening.len(),
            outcome.skipped.len()
        );
        outcome
    }
}
