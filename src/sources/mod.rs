//! External collaborators: bar data, fundamentals and message delivery.

pub mod screener;
pub mod telegram;
pub mod yahoo;

pub use screener::ScreenerClient;
pub use telegram::TelegramNotifier;
pub use yahoo::YahooFinanceClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Bar, Fundamentals};

/// Source of OHLCV bars.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Fetch bars for `symbol` at `interval` covering the last `lookback_days`.
    ///
    /// Returns bars in chronological order without duplicate timestamps. An
    /// empty result means there is no data, not a failure.
    async fn fetch_bars(&self, symbol: &str, interval: &str, lookback_days: u32) -> Result<Vec<Bar>>;
}

/// Source of fundamental metrics.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// `Ok(None)` when the provider has nothing for the symbol.
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Option<Fundamentals>>;
}

/// Sink for formatted text messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}
