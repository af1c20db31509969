//! Screener.in company page scraper for fundamental metrics.
//!
//! The company page lays metrics out as a label `<span>` followed by a value
//! `<span>`. We locate the first simple span whose text contains the label
//! and read the text of the span that follows it.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use super::FundamentalsProvider;
use crate::config::EnrichmentConfig;
use crate::error::Result;
use crate::types::{clean_metric, Fundamentals};

const LABEL_ROE: &str = "ROE";
const LABEL_PE: &str = "P/E";
const LABEL_DE: &str = "Debt to equity";
const LABEL_PROMOTER: &str = "Promoter holding";
const LABEL_VALUATION: &str = "Valuation";
const LABEL_GROWTH: &str = "Growth";
const LABEL_RED_FLAGS: &str = "Red Flags";

/// A `<span>` element's text content.
#[derive(Debug)]
struct Span {
    text: String,
    /// No child elements.
    simple: bool,
}

fn is_span_open(lower: &str, at: usize) -> bool {
    lower[at..].starts_with("<span")
        && matches!(
            lower.as_bytes().get(at + 5),
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
        )
}

fn next_span_open(lower: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(offset) = lower[pos..].find("<span") {
        let at = pos + offset;
        if is_span_open(lower, at) {
            return Some(at);
        }
        pos = at + 5;
    }
    None
}

/// Index of the `</span` closing the span whose content starts at `from`.
fn matching_close(lower: &str, from: usize) -> Option<usize> {
    let mut depth = 1;
    let mut pos = from;
    loop {
        let close = pos + lower[pos..].find("</span")?;
        match next_span_open(lower, pos) {
            Some(open) if open < close => {
                depth += 1;
                pos = open + 5;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(close);
                }
                pos = close + 6;
            }
        }
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    decode_entities(&out)
}

/// All spans in document order.
fn parse_spans(html: &str) -> Vec<Span> {
    // ASCII lowercasing keeps byte offsets identical.
    let lower = html.to_ascii_lowercase();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(start) = next_span_open(&lower, pos) {
        let content_start = match lower[start..].find('>') {
            Some(offset) => start + offset + 1,
            None => break,
        };
        let content_end = matching_close(&lower, content_start).unwrap_or(html.len());
        let inner = &html[content_start..content_end];
        spans.push(Span {
            text: strip_tags(inner),
            simple: !inner.contains('<'),
        });
        pos = content_start;
    }

    spans
}

/// Text of the span after the first span labelled `label`, cleaned.
fn find_metric(spans: &[Span], label: &str) -> Option<String> {
    let label = label.to_lowercase();
    let index = spans
        .iter()
        .position(|s| s.simple && s.text.to_lowercase().contains(&label))?;
    let value = clean_metric(&spans.get(index + 1)?.text);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Extract every known metric from a company page.
pub fn parse_fundamentals(html: &str) -> Fundamentals {
    let spans = parse_spans(html);
    Fundamentals {
        roe: find_metric(&spans, LABEL_ROE),
        pe: find_metric(&spans, LABEL_PE),
        de: find_metric(&spans, LABEL_DE),
        promoter_holding: find_metric(&spans, LABEL_PROMOTER),
        valuation: find_metric(&spans, LABEL_VALUATION),
        growth: find_metric(&spans, LABEL_GROWTH),
        red_flags: find_metric(&spans, LABEL_RED_FLAGS),
    }
}

/// Screener.in scraping client.
pub struct ScreenerClient {
    client: Client,
    base_url: String,
}

impl ScreenerClient {
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn company_url(&self, symbol: &str) -> String {
        format!("{}/{}/", self.base_url, symbol.trim())
    }
}

#[async_trait]
impl FundamentalsProvider for ScreenerClient {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Option<Fundamentals>> {
        let url = self.company_url(symbol);
        debug!("Fetching fundamentals: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fundamentals request for {} failed: {}", symbol, e);
                return Ok(None);
            }
        };

        if response.status() != StatusCode::OK {
            debug!("No fundamentals page for {} ({})", symbol, response.status());
            return Ok(None);
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read fundamentals page for {}: {}", symbol, e);
                return Ok(None);
            }
        };

        Ok(Some(parse_fundamentals(&html)))
    }
}
