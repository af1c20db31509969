use serde::{Deserialize, Serialize};

use super::{Commentary, DecisionRecord};
use crate::error::{AppError, Result};

/// Raw fundamental metrics for a symbol, as scraped.
///
/// Values are kept as cleaned strings; parsing happens where a metric is used
/// so that an absent value is never mistaken for zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(rename = "ROE")]
    pub roe: Option<String>,
    #[serde(rename = "P/E")]
    pub pe: Option<String>,
    #[serde(rename = "D/E")]
    pub de: Option<String>,
    #[serde(rename = "Promoter Holding")]
    pub promoter_holding: Option<String>,
    #[serde(rename = "Valuation")]
    pub valuation: Option<String>,
    #[serde(rename = "Growth")]
    pub growth: Option<String>,
    #[serde(rename = "Red Flags")]
    pub red_flags: Option<String>,
}

impl Fundamentals {
    pub const HEADERS: [&'static str; 7] = [
        "ROE",
        "P/E",
        "D/E",
        "Promoter Holding",
        "Valuation",
        "Growth",
        "Red Flags",
    ];

    pub fn fields(&self) -> Vec<String> {
        [
            &self.roe,
            &self.pe,
            &self.de,
            &self.promoter_holding,
            &self.valuation,
            &self.growth,
            &self.red_flags,
        ]
        .iter()
        .map(|v| v.as_deref().unwrap_or_default().to_string())
        .collect()
    }

    /// Return on equity as a number.
    pub fn roe(&self) -> Result<f64> {
        parse_metric("ROE", self.roe.as_deref())
    }

    /// True when no metric was found at all.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }
}

/// Strip percent signs, thousands separators and surrounding whitespace.
pub fn clean_metric(raw: &str) -> String {
    raw.replace(['%', ','], "").trim().to_string()
}

fn parse_metric(name: &str, raw: Option<&str>) -> Result<f64> {
    let missing = || AppError::MissingMetric(name.to_string());
    let value: f64 = clean_metric(raw.ok_or_else(missing)?)
        .parse()
        .map_err(|_| missing())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(missing())
    }
}

/// A decision record after fundamentals have been merged in, and optionally commentary.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: DecisionRecord,
    pub fundamentals: Fundamentals,
    pub commentary: Option<Commentary>,
}

impl EnrichedRecord {
    pub fn new(record: DecisionRecord, fundamentals: Fundamentals) -> Self {
        Self {
            record,
            fundamentals,
            commentary: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.record.symbol
    }

    /// Header row of the enriched table, optionally with the commentary columns.
    pub fn headers(with_commentary: bool) -> Vec<&'static str> {
        let mut headers: Vec<&'static str> = DecisionRecord::HEADERS.to_vec();
        headers.extend(Fundamentals::HEADERS);
        if with_commentary {
            headers.extend(["comments", "action"]);
        }
        headers
    }

    pub fn fields(&self, with_commentary: bool) -> Vec<String> {
        let mut fields = self.record.fields();
        fields.extend(self.fundamentals.fields());
        if with_commentary {
            match &self.commentary {
                Some(commentary) => {
                    fields.push(commentary.render_notes());
                    fields.push(commentary.action.label().to_string());
                }
                None => fields.extend([String::new(), String::new()]),
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_metric() {
        assert_eq!(clean_metric(" 18.5 %"), "18.5");
        assert_eq!(clean_metric("1,234.50"), "1234.50");
        assert_eq!(clean_metric("Undervalued"), "Undervalued");
    }

    #[test]
    fn test_roe_parses_cleaned_value() {
        let f = Fundamentals {
            roe: Some("21.4%".to_string()),
            ..Default::default()
        };
        assert_eq!(f.roe().unwrap(), 21.4);
    }

    #[test]
    fn test_missing_roe_is_missing_metric() {
        let f = Fundamentals::default();
        assert!(matches!(f.roe(), Err(AppError::MissingMetric(name)) if name == "ROE"));
    }

    #[test]
    fn test_unparsable_roe_is_missing_metric() {
        let f = Fundamentals {
            roe: Some("N/A".to_string()),
            ..Default::default()
        };
        assert!(f.roe().is_err());

        let f = Fundamentals {
            roe: Some("nan".to_string()),
            ..Default::default()
        };
        assert!(f.roe().is_err());
    }

    #[test]
    fn test_fields_blank_for_missing_metrics() {
        let f = Fundamentals {
            roe: Some("14.2".to_string()),
            red_flags: Some("2".to_string()),
            ..Default::default()
        };
        assert_eq!(f.fields(), vec!["14.2", "", "", "", "", "", "2"]);
        assert!(Fundamentals::default().fields().iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_is_empty() {
        assert!(Fundamentals::default().is_empty());
        let f = Fundamentals {
            pe: Some("12".to_string()),
            ..Default::default()
        };
        assert!(!f.is_empty());
    }

    #[test]
    fn test_enriched_headers() {
        let headers = EnrichedRecord::headers(true);
        assert_eq!(headers.len(), 13 + 7 + 2);
        assert_eq!(headers[13], "ROE");
        assert_eq!(headers[19], "Red Flags");
        assert_eq!(headers[21], "action");
        assert_eq!(EnrichedRecord::headers(false).len(), 20);
    }
}
