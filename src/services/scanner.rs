//! Batch scanning: fetch, score and grade a list of symbols one at a time.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ScanConfig, SignalThresholds};
use crate::error::{AppError, Result};
use crate::services::signals::{self, indicators};
use crate::sources::BarProvider;
use crate::types::{Evaluation, ScanReport};

/// Sequential scanner over a bar provider.
pub struct Scanner {
    provider: Arc<dyn BarProvider>,
    config: ScanConfig,
    thresholds: SignalThresholds,
}

impl Scanner {
    pub fn new(provider: Arc<dyn BarProvider>, config: ScanConfig, thresholds: SignalThresholds) -> Self {
        Self {
            provider,
            config,
            thresholds,
        }
    }

    /// Fetch and score a single symbol.
    pub async fn scan_symbol(&self, symbol: &str) -> Result<Evaluation> {
        let bars = self
            .provider
            .fetch_bars(symbol, &self.config.interval, self.config.lookback_days)
            .await?;

        if bars.len() < self.config.min_bars {
            return Err(AppError::insufficient(self.config.min_bars, bars.len()).for_symbol(symbol));
        }

        let evaluation = signals::evaluate(symbol, &bars, &self.thresholds)?;

        if let (Ok(trend), Ok(candle)) = (
            indicators::trend_strength(&bars, &evaluation.indicators),
            indicators::candle_strength(&bars),
        ) {
            debug!(
                symbol,
                trend_ratio = trend.ratio,
                strong_trend = trend.is_strong,
                body_ratio = candle.body_ratio,
                close_position = candle.close_position,
                volume_ratio = candle.volume_ratio,
                "Strength diagnostics"
            );
        }

        Ok(evaluation)
    }

    /// Scan one batch, in order, pausing between provider calls.
    pub async fn run_batch(&self, symbols: &[String]) -> ScanReport {
        let mut report = ScanReport::new();
        let delay = self.config.request_delay();

        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            debug!("Scanning {} ({}/{})", symbol, i + 1, symbols.len());
            report.scanned += 1;

            match self.scan_symbol(symbol).await {
                Ok(evaluation) if evaluation.tier.is_reportable() => {
                    report.push(evaluation.tier, evaluation.record)
                }
                Ok(evaluation) => {
                    debug!("Rejected {} (confluence {})", symbol, evaluation.record.confluence)
                }
                Err(e) => {
                    warn!("Skipped {}: {}", symbol, e);
                    report.skip(symbol, e.to_string());
                }
            }
        }

        report
    }

    /// Scan every symbol in batches of `batch_size`.
    pub async fn run(&self, symbols: &[String]) -> ScanReport {
        let mut report = ScanReport::new();
        let batch_size = self.config.batch_size.max(1);
        let total_batches = symbols.len().div_ceil(batch_size);
        info!(run_id = %report.run_id, "Scanning {} symbols in {} batches", symbols.len(), total_batches);

        for (b, batch) in symbols.chunks(batch_size).enumerate() {
            info!("Processing batch {}/{} ({} stocks)", b + 1, total_batches, batch.len());
            if b > 0 && !self.config.request_delay().is_zero() {
                tokio::time::sleep(self.config.request_delay()).await;
            }
            report.merge(self.run_batch(batch).await);
        }

        info!(
            run_id = %report.run_id,
            strong = report.strong.len(),
            moderate = report.moderate.len(),
            watchlist = report.watchlist.len(),
            skipped = report.skipped.len(),
            elapsed_ms = (Utc::now() - report.started_at).num_milliseconds(),
            "Scan complete"
        );
        report
    }
}
