use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Read and parse an environment variable, falling back to `default` when absent or malformed.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Batch scan parameters.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Bar interval passed to the provider (e.g. "15m").
    pub interval: String,
    /// Calendar days of history to request per symbol.
    pub lookback_days: u32,
    /// Minimum bars required before a symbol is scored.
    pub min_bars: usize,
    /// Symbols per batch.
    pub batch_size: usize,
    /// Maximum number of symbols read from the candidate list.
    pub top_n: usize,
    /// Delay between consecutive provider calls (ms).
    pub request_delay_ms: u64,
    /// Exchange suffix appended to symbols for the bar provider (e.g. ".NS").
    pub symbol_suffix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval: "15m".to_string(),
            lookback_days: 7,
            min_bars: 35,
            batch_size: 300,
            top_n: 9999,
            request_delay_ms: 300,
            symbol_suffix: ".NS".to_string(),
        }
    }
}

impl ScanConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Thresholds used by the pattern detector, confluence scorer and commentary rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalThresholds {
    /// Latest volume must reach this multiple of the trailing average to count as a surge.
    pub surge_multiplier: f64,
    /// Trailing window (bars) of the volume average, ending at the latest bar inclusive.
    pub surge_window: usize,
    /// First-bar volume at or above this marks a high-volume open.
    pub early_volume_threshold: f64,
    /// RSI must be strictly above this to count.
    pub rsi_floor: f64,
    /// Maximum absolute MACD gap still considered near a crossover.
    pub macd_gap_window: f64,
    /// MACD gap represented by one closeness unit.
    pub closeness_unit: f64,
    /// ROE below this downgrades an entry to watchlist.
    pub roe_floor: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            surge_multiplier: 1.5,
            surge_window: 20,
            early_volume_threshold: 900_000.0,
            rsi_floor: 40.0,
            macd_gap_window: 0.3,
            closeness_unit: 0.03,
            roe_floor: 13.0,
        }
    }
}

/// Held-position monitoring parameters.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub lookback_days: u32,
    /// A positive MACD gap below this that is still shrinking counts as weakening.
    pub weakness_gap: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            lookback_days: 5,
            weakness_gap: 0.1,
        }
    }
}

/// Fundamentals scraping parameters.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub base_url: String,
    /// Delay between consecutive fundamentals requests (ms).
    pub request_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.screener.in/company".to_string(),
            request_delay_ms: 1500,
        }
    }
}

impl EnrichmentConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Locations of the tabular inputs and outputs.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl StoragePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn top_losers(&self) -> PathBuf {
        self.data_dir.join("top_losers.csv")
    }

    pub fn instrument_master(&self) -> PathBuf {
        self.data_dir.join("MACD_EQ_Segment_ScripMaster.csv")
    }

    pub fn candidates(&self) -> PathBuf {
        self.data_dir.join("potential_bullish_crossover.csv")
    }

    pub fn skipped(&self) -> PathBuf {
        self.data_dir.join("skipped_stocks.csv")
    }

    pub fn enriched(&self) -> PathBuf {
        self.data_dir.join("enriched_bullish_signals.csv")
    }

    pub fn final_report(&self) -> PathBuf {
        self.data_dir.join("final_bullish_signals_with_comments.csv")
    }

    pub fn alerts_log(&self) -> PathBuf {
        self.data_dir.join("alerts_log.csv")
    }

    pub fn positions(&self) -> PathBuf {
        self.data_dir.join("my_positions.csv")
    }
}

/// Telegram bot credentials.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub scan: ScanConfig,
    pub thresholds: SignalThresholds,
    pub guard: GuardConfig,
    pub enrichment: EnrichmentConfig,
    pub storage: StoragePaths,
    /// Telegram bot token.
    pub telegram_bot_token: Option<String>,
    /// Telegram chat receiving alerts.
    pub telegram_chat_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let scan_defaults = ScanConfig::default();
        let thresholds_defaults = SignalThresholds::default();
        let guard_defaults = GuardConfig::default();
        let enrichment_defaults = EnrichmentConfig::default();

        Self {
            scan: ScanConfig {
                interval: env::var("SCAN_INTERVAL").unwrap_or(scan_defaults.interval),
                lookback_days: env_or("SCAN_LOOKBACK_DAYS", scan_defaults.lookback_days),
                min_bars: env_or("SCAN_MIN_BARS", scan_defaults.min_bars),
                batch_size: env_or("SCAN_BATCH_SIZE", scan_defaults.batch_size).max(1),
                top_n: env_or("SCAN_TOP_N", scan_defaults.top_n),
                request_delay_ms: env_or("SCAN_REQUEST_DELAY_MS", scan_defaults.request_delay_ms),
                symbol_suffix: env::var("SYMBOL_SUFFIX").unwrap_or(scan_defaults.symbol_suffix),
            },
            thresholds: SignalThresholds {
                surge_multiplier: env_or("SURGE_MULTIPLIER", thresholds_defaults.surge_multiplier),
                surge_window: env_or("SURGE_WINDOW", thresholds_defaults.surge_window),
                early_volume_threshold: env_or(
                    "EARLY_VOLUME_THRESHOLD",
                    thresholds_defaults.early_volume_threshold,
                ),
                rsi_floor: env_or("RSI_FLOOR", thresholds_defaults.rsi_floor),
                macd_gap_window: env_or("MACD_GAP_WINDOW", thresholds_defaults.macd_gap_window),
                closeness_unit: env_or("CLOSENESS_UNIT", thresholds_defaults.closeness_unit),
                roe_floor: env_or("ROE_FLOOR", thresholds_defaults.roe_floor),
            },
            guard: GuardConfig {
                lookback_days: env_or("GUARD_LOOKBACK_DAYS", guard_defaults.lookback_days),
                weakness_gap: env_or("GUARD_WEAKNESS_GAP", guard_defaults.weakness_gap),
            },
            enrichment: EnrichmentConfig {
                base_url: env::var("SCREENER_BASE_URL").unwrap_or(enrichment_defaults.base_url),
                request_delay_ms: env_or(
                    "ENRICH_REQUEST_DELAY_MS",
                    enrichment_defaults.request_delay_ms,
                ),
            },
            storage: StoragePaths::new(env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string())),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty()),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Telegram credentials, or a fatal configuration error if either is missing.
    pub fn telegram(&self) -> Result<TelegramConfig> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Ok(TelegramConfig {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            (None, _) => Err(AppError::Configuration(
                "TELEGRAM_BOT_TOKEN is not set".to_string(),
            )),
            (_, None) => Err(AppError::Configuration(
                "TELEGRAM_CHAT_ID is not set".to_string(),
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            thresholds: SignalThresholds::default(),
            guard: GuardConfig::default(),
            enrichment: EnrichmentConfig::default(),
            storage: StoragePaths::default(),
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }
}
