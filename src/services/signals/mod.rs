//! Signal evaluation and grading engine.
//!
//! Turns a bar sequence into indicators, pattern flags, a confluence score
//! and a tier, and later explains enriched records with commentary.

pub mod commentary;
pub mod confluence;
pub mod guard;
pub mod indicators;
pub mod patterns;
pub mod tier;

pub use commentary::{annotate, generate};
pub use guard::check_weakness;
pub use tier::classify;

use tracing::debug;

use crate::config::SignalThresholds;
use crate::error::Result;
use crate::types::{Bar, DecisionRecord, Evaluation};

/// Round half to even at the given number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Score one symbol's bars and build its decision record.
pub fn evaluate(symbol: &str, bars: &[Bar], thresholds: &SignalThresholds) -> Result<Evaluation> {
    let run = || -> Result<Evaluation> {
        let set = indicators::compute(bars)?;
        let patterns = patterns::detect(bars, &set, thresholds)?;
        let score = confluence::score(bars, &set, &patterns, thresholds)?;
        let tier = classify(score.score);

        // Guarded by compute() above.
        let last = &bars[bars.len() - 1];

        let record = DecisionRecord {
            symbol: symbol.to_string(),
            confluence: score.score,
            closeness_score: score.closeness_score,
            actual_diff: score.actual_diff,
            rsi: round_to(score.rsi, 1),
            volume: last.volume as u64,
            volume_avg: patterns.volume_avg.map(|v| v as u64),
            volume_surge: patterns.volume_surge,
            engulfing: patterns.bullish_engulfing,
            above_ema200: score.signals.above_ema200,
            early_volume: patterns.early_volume as u64,
            high_early_volume: patterns.high_early_volume,
            momentum: patterns.momentum,
        };

        debug!(
            symbol,
            confluence = record.confluence,
            closeness = record.closeness_score,
            diff = record.actual_diff,
            rsi = record.rsi,
            ?tier,
            "Scored symbol"
        );

        Ok(Evaluation {
            record,
            indicators: set,
            patterns,
            signals: score.signals,
            tier,
        })
    };

    run().map_err(|e| e.for_symbol(symbol))
}
