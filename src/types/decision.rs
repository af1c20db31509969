use serde::{Deserialize, Deserializer, Serialize};

use super::{ConfluenceSignals, IndicatorSet, PatternFlags, Tier};

/// Flat per-symbol scoring result, one row of the candidates table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub symbol: String,
    pub confluence: u8,
    pub closeness_score: i32,
    #[serde(deserialize_with = "de_gap")]
    pub actual_diff: f64,
    pub rsi: f64,
    pub volume: u64,
    pub volume_avg: Option<u64>,
    #[serde(deserialize_with = "de_flag")]
    pub volume_surge: bool,
    #[serde(deserialize_with = "de_flag")]
    pub engulfing: bool,
    #[serde(deserialize_with = "de_flag")]
    pub above_ema200: bool,
    pub early_volume: u64,
    #[serde(deserialize_with = "de_flag")]
    pub high_early_volume: bool,
    #[serde(deserialize_with = "de_flag")]
    pub momentum: bool,
}

impl DecisionRecord {
    /// Column order of the candidates table.
    pub const HEADERS: [&'static str; 13] = [
        "symbol",
        "confluence",
        "closeness_score",
        "actual_diff",
        "rsi",
        "volume",
        "volume_avg",
        "volume_surge",
        "engulfing",
        "above_ema200",
        "early_volume",
        "high_early_volume",
        "momentum",
    ];

    /// Render the record as table cells in [`Self::HEADERS`] order.
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.confluence.to_string(),
            self.closeness_score.to_string(),
            format_float(self.actual_diff),
            format_float(self.rsi),
            self.volume.to_string(),
            self.volume_avg.map(|v| v.to_string()).unwrap_or_default(),
            format_flag(self.volume_surge),
            format_flag(self.engulfing),
            format_flag(self.above_ema200),
            self.early_volume.to_string(),
            format_flag(self.high_early_volume),
            format_flag(self.momentum),
        ]
    }
}

/// Everything the engine derived for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub record: DecisionRecord,
    pub indicators: IndicatorSet,
    pub patterns: PatternFlags,
    pub signals: ConfluenceSignals,
    pub tier: Tier,
}

/// Write a boolean the way the candidates table expects it.
pub fn format_flag(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// Shortest round-trip rendering, keeping a `.0` on whole numbers.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Parse `True`/`False` in any case, plus `1`/`0`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" | "" => Some(false),
        _ => None,
    }
}

fn de_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid boolean: {raw}")))
}

/// A blank or unreadable MACD gap reads as NaN so the row survives without it.
fn de_gap<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(f64::NAN))
}
