use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DecisionRecord, Tier};

/// A symbol that could not be scored, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// One row of the sent-alerts log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLogEntry {
    pub timestamp: String,
    pub symbol: String,
    pub alert: String,
}

impl AlertLogEntry {
    /// Stamp an alert with the current local time.
    pub fn now(symbol: &str, alert: &str) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            symbol: symbol.to_string(),
            alert: alert.to_string(),
        }
    }
}

/// Outcome of one batch scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub scanned: usize,
    pub strong: Vec<DecisionRecord>,
    pub moderate: Vec<DecisionRecord>,
    pub watchlist: Vec<DecisionRecord>,
    pub skipped: Vec<SkippedSymbol>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            scanned: 0,
            strong: Vec::new(),
            moderate: Vec::new(),
            watchlist: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// File a scored record under its tier. Rejected records are dropped.
    pub fn push(&mut self, tier: Tier, record: DecisionRecord) {
        match tier {
            Tier::Strong => self.strong.push(record),
            Tier::Moderate => self.moderate.push(record),
            Tier::Watchlist => self.watchlist.push(record),
            Tier::Reject => {}
        }
    }

    pub fn skip(&mut self, symbol: &str, reason: impl Into<String>) {
        self.skipped.push(SkippedSymbol {
            symbol: symbol.to_string(),
            reason: reason.into(),
        });
    }

    /// Fold another batch's results into this one, preserving order.
    pub fn merge(&mut self, other: ScanReport) {
        self.scanned += other.scanned;
        self.strong.extend(other.strong);
        self.moderate.extend(other.moderate);
        self.watchlist.extend(other.watchlist);
        self.skipped.extend(other.skipped);
    }

    /// Reportable tiers with their records, strongest first.
    pub fn tiers(&self) -> [(Tier, &[DecisionRecord]); 3] {
        [
            (Tier::Strong, self.strong.as_slice()),
            (Tier::Moderate, self.moderate.as_slice()),
            (Tier::Watchlist, self.watchlist.as_slice()),
        ]
    }

    /// All candidates, strong then moderate then watchlist.
    pub fn candidates(&self) -> Vec<&DecisionRecord> {
        self.strong
            .iter()
            .chain(self.moderate.iter())
            .chain(self.watchlist.iter())
            .collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.strong.len() + self.moderate.len() + self.watchlist.len()
    }

    pub fn has_candidates(&self) -> bool {
        self.candidate_count() > 0
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, confluence: u8) -> DecisionRecord {
        DecisionRecord {
            symbol: symbol.to_string(),
            confluence,
            closeness_score: 0,
            actual_diff: 0.0,
            rsi: 50.0,
            volume: 0,
            volume_avg: None,
            volume_surge: false,
            engulfing: false,
            above_ema200: false,
            early_volume: 0,
            high_early_volume: false,
            momentum: false,
        }
    }

    #[test]
    fn test_push_files_by_tier() {
        let mut report = ScanReport::new();
        report.push(Tier::Watchlist, record("A", 3));
        report.push(Tier::Strong, record("B", 5));
        report.push(Tier::Reject, record("C", 1));
        report.push(Tier::Moderate, record("D", 4));

        assert_eq!(report.candidate_count(), 3);
        let order: Vec<&str> = report.candidates().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "A"]);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = ScanReport::new();
        first.scanned = 2;
        first.push(Tier::Strong, record("A", 5));
        first.skip("X", "no data");

        let mut second = ScanReport::new();
        second.scanned = 3;
        second.push(Tier::Strong, record("B", 5));
        second.skip("Y", "no data");

        first.merge(second);
        assert_eq!(first.scanned, 5);
        assert_eq!(first.strong[1].symbol, "B");
        assert_eq!(first.skipped.len(), 2);
        assert_eq!(first.skipped[1].symbol, "Y");
    }

    #[test]
    fn test_empty_report() {
        let report = ScanReport::default();
        assert!(!report.has_candidates());
        assert!(report.tiers().iter().all(|(_, r)| r.is_empty()));
    }
}
