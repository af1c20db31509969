//! Human-readable explanation and final action for an enriched record.
//!
//! Rules run in a fixed order and fold over the current action. A rule may
//! replace the action with a downgrade but no rule ever restores
//! [`Action::ConsiderForEntry`].

use crate::config::SignalThresholds;
use crate::types::{Action, Commentary, CommentaryNote, EnrichedRecord};

/// Closeness band treated as "crossing now".
const CROSSING_BAND: (i32, i32) = (-1, 2);
/// Below this closeness the crossover is still too far away.
const TOO_EARLY_BELOW: i32 = -2;
/// Above this closeness the crossover has already played out.
const TOO_LATE_ABOVE: i32 = 3;

/// What a single rule contributes.
#[derive(Debug, Default)]
struct RuleOutcome {
    note: Option<CommentaryNote>,
    downgrade: Option<Action>,
}

impl RuleOutcome {
    fn note(note: CommentaryNote) -> Self {
        Self {
            note: Some(note),
            downgrade: None,
        }
    }

    fn downgrade(note: CommentaryNote, action: Action) -> Self {
        Self {
            note: Some(note),
            downgrade: Some(action),
        }
    }
}

type Rule = fn(&EnrichedRecord, &SignalThresholds, Action) -> RuleOutcome;

const RULES: [Rule; 4] = [volume_rule, trend_rule, macd_rule, roe_rule];

/// Run every rule in order and collect notes and the final action.
pub fn generate(record: &EnrichedRecord, thresholds: &SignalThresholds) -> Commentary {
    RULES
        .iter()
        .fold(Commentary::default(), |mut commentary, rule| {
            let outcome = rule(record, thresholds, commentary.action);
            commentary.notes.extend(outcome.note);
            if let Some(action) = outcome.downgrade {
                commentary.action = action;
            }
            commentary
        })
}

/// Attach generated commentary to the record.
pub fn annotate(mut record: EnrichedRecord, thresholds: &SignalThresholds) -> EnrichedRecord {
    record.commentary = Some(generate(&record, thresholds));
    record
}

fn volume_rule(record: &EnrichedRecord, _: &SignalThresholds, _: Action) -> RuleOutcome {
    if record.record.volume_surge {
        RuleOutcome::note(CommentaryNote::positive("Volume is increasing"))
    } else {
        RuleOutcome::downgrade(
            CommentaryNote::negative("No volume surge"),
            Action::WeakVolume,
        )
    }
}

fn trend_rule(record: &EnrichedRecord, _: &SignalThresholds, _: Action) -> RuleOutcome {
    if record.record.above_ema200 {
        RuleOutcome::note(CommentaryNote::positive("Price is above 200 EMA"))
    } else {
        RuleOutcome::downgrade(
            CommentaryNote::negative("Price is below 200 EMA"),
            Action::TrendNotConfirmed,
        )
    }
}

fn macd_rule(record: &EnrichedRecord, thresholds: &SignalThresholds, _: Action) -> RuleOutcome {
    let gap = record.record.actual_diff;
    let closeness = record.record.closeness_score;

    if !gap.is_finite() {
        return RuleOutcome::note(CommentaryNote::negative("MACD data missing"));
    }

    if gap.abs() <= thresholds.macd_gap_window
        && (CROSSING_BAND.0..=CROSSING_BAND.1).contains(&closeness)
    {
        RuleOutcome::note(CommentaryNote::positive("MACD crossover happening"))
    } else if closeness < TOO_EARLY_BELOW || gap < -thresholds.macd_gap_window {
        RuleOutcome::downgrade(
            CommentaryNote::negative("Too early – MACD not ready"),
            Action::NotReady,
        )
    } else if closeness > TOO_LATE_ABOVE {
        RuleOutcome::downgrade(
            CommentaryNote::negative("MACD already happened ❌ Late signal"),
            Action::Outdated,
        )
    } else {
        RuleOutcome::default()
    }
}

fn roe_rule(record: &EnrichedRecord, thresholds: &SignalThresholds, current: Action) -> RuleOutcome {
    let roe = match record.fundamentals.roe() {
        Ok(roe) => roe,
        Err(_) => return RuleOutcome::note(CommentaryNote::negative("ROE not available")),
    };

    if roe < thresholds.roe_floor {
        let note = CommentaryNote::negative(format!(
            "ROE below {} (low profitability)",
            thresholds.roe_floor
        ));
        if current.is_actionable() {
            RuleOutcome::downgrade(note, Action::WeakFundamentals)
        } else {
            RuleOutcome::note(note)
        }
    } else {
        RuleOutcome::note(CommentaryNote::positive("ROE is strong"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecisionRecord, Fundamentals};

    fn ideal_record() -> EnrichedRecord {
        let record = DecisionRecord {
            symbol: "HDFCBANK".to_string(),
            confluence: 5,
            closeness_score: 1,
            actual_diff: 0.04,
            rsi: 56.2,
            volume: 2_000_000,
            volume_avg: Some(900_000),
            volume_surge: true,
            engulfing: true,
            above_ema200: true,
            early_volume: 1_200_000,
            high_early_volume: true,
            momentum: true,
        };
        let fundamentals = Fundamentals {
            roe: Some("18.2".to_string()),
            ..Default::default()
        };
        EnrichedRecord::new(record, fundamentals)
    }

    fn run(record: &EnrichedRecord) -> Commentary {
        generate(record, &SignalThresholds::default())
    }

    fn texts(commentary: &Commentary) -> Vec<&str> {
        commentary.notes.iter().map(|n| n.text.as_str()).collect()
    }

    // ========================================================================
    // Default and single rules
    // ========================================================================

    #[test]
    fn test_ideal_record_is_actionable() {
        let commentary = run(&ideal_record());
        assert_eq!(commentary.action, Action::ConsiderForEntry);
        assert_eq!(
            texts(&commentary),
            vec![
                "Volume is increasing",
                "Price is above 200 EMA",
                "MACD crossover happening",
                "ROE is strong",
            ]
        );
        assert!(commentary.notes.iter().all(|n| n.positive));
    }

    #[test]
    fn test_weak_volume_blocks_entry() {
        let mut record = ideal_record();
        record.record.volume_surge = false;
        let commentary = run(&record);
        assert_eq!(commentary.action, Action::WeakVolume);
        assert_eq!(commentary.action.label(), "Watchlist Only – Weak volume");
        assert!(!commentary.action.is_actionable());
    }

    #[test]
    fn test_trend_overrides_volume() {
        let mut record = ideal_record();
        record.record.volume_surge = false;
        record.record.above_ema200 = false;
        assert_eq!(run(&record).action, Action::TrendNotConfirmed);
    }

    // ========================================================================
    // MACD readiness
    // ========================================================================

    #[test]
    fn test_macd_too_early_by_closeness() {
        let mut record = ideal_record();
        record.record.closeness_score = -3;
        record.record.actual_diff = -0.09;
        let commentary = run(&record);
        assert_eq!(commentary.action, Action::NotReady);
        assert!(texts(&commentary).contains(&"Too early – MACD not ready"));
    }

    #[test]
    fn test_macd_too_early_by_gap() {
        let mut record = ideal_record();
        record.record.closeness_score = -10;
        record.record.actual_diff = -0.45;
        assert_eq!(run(&record).action, Action::NotReady);
    }

    #[test]
    fn test_macd_outdated() {
        let mut record = ideal_record();
        record.record.closeness_score = 5;
        record.record.actual_diff = 0.16;
        let commentary = run(&record);
        assert_eq!(commentary.action, Action::Outdated);
        assert_eq!(
            commentary.notes[2].render(),
            "🔻 MACD already happened ❌ Late signal ❌"
        );
    }

    #[test]
    fn test_macd_gap_zone_without_note() {
        // Closeness 3 is neither crossing, early nor late.
        let mut record = ideal_record();
        record.record.closeness_score = 3;
        record.record.actual_diff = 0.1;
        let commentary = run(&record);
        assert_eq!(commentary.action, Action::ConsiderForEntry);
        assert_eq!(commentary.notes.len(), 3);
    }

    #[test]
    fn test_macd_missing_gap() {
        let mut record = ideal_record();
        record.record.actual_diff = f64::NAN;
        let commentary = run(&record);
        assert!(texts(&commentary).contains(&"MACD data missing"));
        assert_eq!(commentary.action, Action::ConsiderForEntry);
    }

    #[test]
    fn test_macd_overrides_trend() {
        let mut record = ideal_record();
        record.record.above_ema200 = false;
        record.record.closeness_score = 6;
        record.record.actual_diff = 0.2;
        assert_eq!(run(&record).action, Action::Outdated);
    }

    // ========================================================================
    // ROE gate
    // ========================================================================

    #[test]
    fn test_low_roe_downgrades_clean_record() {
        let mut record = ideal_record();
        record.fundamentals.roe = Some("9.5".to_string());
        let commentary = run(&record);
        assert_eq!(commentary.action, Action::WeakFundamentals);
        assert_eq!(
            commentary.notes.last().unwrap().text,
            "ROE below 13 (low profitability)"
        );
    }

    #[test]
    fn test_low_roe_keeps_earlier_downgrade() {
        let mut record = ideal_record();
        record.record.volume_surge = false;
        record.fundamentals.roe = Some("9.5".to_string());
        assert_eq!(run(&record).action, Action::WeakVolume);
    }

    #[test]
    fn test_missing_roe_noted_without_downgrade() {
        let mut record = ideal_record();
        record.fundamentals.roe = None;
        let commentary = run(&record);
        assert_eq!(commentary.action, Action::ConsiderForEntry);
        assert_eq!(commentary.notes.last().unwrap().text, "ROE not available");
        assert!(!commentary.notes.last().unwrap().positive);
    }

    #[test]
    fn test_roe_at_floor_is_strong() {
        let mut record = ideal_record();
        record.fundamentals.roe = Some("13".to_string());
        assert_eq!(run(&record).action, Action::ConsiderForEntry);
    }

    #[test]
    fn test_annotate_sets_commentary() {
        let annotated = annotate(ideal_record(), &SignalThresholds::default());
        let commentary = annotated.commentary.unwrap();
        assert_eq!(commentary.action, Action::ConsiderForEntry);
    }
}
