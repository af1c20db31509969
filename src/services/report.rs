//! Message formatting and the publish/report steps that deliver them.

use tracing::{error, info, warn};

use super::store;
use crate::config::{SignalThresholds, StoragePaths};
use crate::error::Result;
use crate::services::signals::commentary;
use crate::sources::Notifier;
use crate::types::{format_float, AlertLogEntry, DecisionRecord, EnrichedRecord, MacdWeakness, ScanReport};

/// Sent when a scan finds nothing worth reporting.
pub const NO_SETUPS_MESSAGE: &str = "😐 No bullish setups found from Top Losers.";

const SUMMARY_HEADER: &str = "📈 <b>Bullish Candidates (Graded by Confluence)</b>";

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Free-form remarks for a candidate.
pub fn remarks(record: &DecisionRecord) -> Vec<&'static str> {
    let mut remarks = Vec::new();
    if record.high_early_volume {
        remarks.push("High volume from open (9L+ at 9:15 AM)");
    }
    if record.momentum {
        remarks.push("Sustained buying momentum");
    }
    if record.confluence >= 4 && record.volume_surge {
        remarks.push("MACD gap closing with strong volume");
    }
    remarks
}

/// Tier-grouped summary of a scan.
pub fn format_summary(report: &ScanReport) -> String {
    let mut msg = format!("{}\n", SUMMARY_HEADER);

    for (tier, records) in report.tiers() {
        if records.is_empty() {
            continue;
        }
        msg.push_str(&format!("\n{} <b>{}</b>\n", tier.icon(), tier.label()));
        for record in records {
            msg.push_str(&format!(
                "\n<b>{}</b>\n• MACD Closeness: {} 🔄 (actual diff: {})\n• RSI: {}\n• Action: {}\n",
                escape_html(&record.symbol),
                record.closeness_score,
                format_float(record.actual_diff),
                format_float(record.rsi),
                tier.action_phrase(),
            ));
            let lines = remarks(record);
            if !lines.is_empty() {
                msg.push('\n');
                msg.push_str(
                    &lines
                        .iter()
                        .map(|line| format!("• {}", line))
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }
            msg.push('\n');
        }
    }

    msg
}

/// Per-stock alert for an annotated record. `None` until commentary exists.
pub fn format_alert(record: &EnrichedRecord) -> Option<String> {
    let commentary = record.commentary.as_ref()?;
    Some(format!(
        "<b>📈 Stock Alert: {}</b>\n\n{}\n\n📝 Action: <b>{}</b>",
        escape_html(record.symbol()),
        commentary.render_notes(),
        commentary.action
    ))
}

/// Exit warning for a held position.
pub fn format_guard_alert(weakness: &MacdWeakness) -> String {
    format!(
        "⚠️ <b>MACD Weakening Alert</b>\nSymbol: <b>{}</b>\nGap: {} (shrinking)\n🔍 MACD bullish trend weakening. Monitor position closely.",
        escape_html(&weakness.symbol),
        format_float(weakness.gap)
    )
}

/// Deliver the scan summary and persist its candidates and skip list.
pub async fn publish_scan(report: &ScanReport, storage: &StoragePaths, notifier: &dyn Notifier) -> Result<()> {
    if report.has_candidates() {
        if let Err(e) = notifier.send(&format_summary(report)).await {
            error!("Failed to send scan summary: {}", e);
        }
        store::write_candidates(&storage.candidates(), &report.candidates())?;
    } else {
        info!("No bullish setups found");
        if let Err(e) = notifier.send(NO_SETUPS_MESSAGE).await {
            error!("Failed to send empty scan notice: {}", e);
        }
    }

    if !report.skipped.is_empty() {
        store::write_skipped(&storage.skipped(), &report.skipped)?;
        warn!("Skipped {} symbols", report.skipped.len());
    }

    Ok(())
}

/// Counts from one report run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    pub records: usize,
    pub actionable: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Annotate enriched records, write the final table and alert on actionable ones.
pub async fn run_report(
    storage: &StoragePaths,
    thresholds: &SignalThresholds,
    notifier: &dyn Notifier,
) -> Result<ReportOutcome> {
    let records: Vec<EnrichedRecord> = store::read_enriched(&storage.enriched())?
        .into_iter()
        .map(|r| commentary::annotate(r, thresholds))
        .collect();

    store::write_enriched(&storage.final_report(), &records, true)?;
    info!("Final file saved with comments");

    let mut outcome = ReportOutcome {
        records: records.len(),
        ..Default::default()
    };

    for record in &records {
        let actionable = record
            .commentary
            .as_ref()
            .map(|c| c.action.is_actionable())
            .unwrap_or(false);
        if !actionable {
            continue;
        }
        outcome.actionable += 1;

        let Some(alert) = format_alert(record) else {
            continue;
        };
        match notifier.send(&alert).await {
            Ok(()) => {
                outcome.sent += 1;
                let entry = AlertLogEntry::now(record.symbol(), &alert);
                if let Err(e) = store::append_alert(&storage.alerts_log(), &entry) {
                    error!("Failed to log alert for {}: {}", record.symbol(), e);
                }
            }
            Err(e) => {
                outcome.failed += 1;
                error!("Failed to send alert for {}: {}", record.symbol(), e);
            }
        }
    }

    info!(
        "Report complete: {} records, {} actionable, {} alerts sent",
        outcome.records, outcome.actionable, outcome.sent
    );
    Ok(outcome)
}
