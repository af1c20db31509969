//! Yahoo Finance API client for intraday and daily bars.
//!
//! Uses the unofficial chart API. Exchange suffixes (".NS" for NSE) are
//! appended to plain symbols.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::BarProvider;
use crate::error::{AppError, Result};
use crate::types::{normalize_bars, Bar};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Build the Yahoo ticker for an exchange symbol.
///
/// Symbols that already carry a suffix are left alone.
fn yahoo_symbol(symbol: &str, suffix: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if symbol.contains('.') || suffix.is_empty() {
        symbol
    } else {
        format!("{}{}", symbol, suffix)
    }
}

/// Escape the characters exchange tickers use that are not path-safe.
fn encode_path_segment(segment: &str) -> String {
    segment.replace('&', "%26").replace(' ', "%20")
}

/// Turn a chart response into clean bars.
fn parse_chart(data: YahooChartResponse) -> Result<Vec<Bar>> {
    if let Some(error) = data.chart.error {
        return Err(AppError::Provider(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = match data.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(Vec::new()),
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let value = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // Skip invalid data points
        let close = match value(&closes, i) {
            Some(close) if close > 0.0 => close,
            _ => continue,
        };
        let timestamp = match Utc.timestamp_opt(ts, 0).single() {
            Some(t) => t,
            None => continue,
        };

        bars.push(Bar {
            timestamp,
            open: value(&opens, i).unwrap_or(close),
            high: value(&highs, i).unwrap_or(close),
            low: value(&lows, i).unwrap_or(close),
            close,
            volume: value(&volumes, i).unwrap_or(0.0),
        });
    }

    Ok(normalize_bars(bars))
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    symbol_suffix: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client appending `symbol_suffix` to plain symbols.
    pub fn new(symbol_suffix: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            symbol_suffix: symbol_suffix.into(),
        })
    }
}

#[async_trait]
impl BarProvider for YahooFinanceClient {
    async fn fetch_bars(&self, symbol: &str, interval: &str, lookback_days: u32) -> Result<Vec<Bar>> {
        let ticker = yahoo_symbol(symbol, &self.symbol_suffix);
        let now = Utc::now();
        let start = now - ChronoDuration::days(i64::from(lookback_days));
        let url = format!("{}/{}", CHART_URL, encode_path_segment(&ticker));

        debug!("Fetching Yahoo Finance data: {} ({} over {}d)", ticker, interval, lookback_days);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
                ("interval", interval.to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "Yahoo API error for {}: {}",
                ticker,
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        parse_chart(data)
    }
}
