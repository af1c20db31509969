use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Not enough bars for the requested computation. Skips the symbol.
    #[error("Insufficient data for {symbol}: needed {needed} bars, got {available}")]
    InsufficientData {
        symbol: String,
        needed: usize,
        available: usize,
    },

    /// A fundamental value is absent or could not be parsed.
    #[error("Missing metric: {0}")]
    MissingMetric(String),

    /// An upstream data or delivery provider failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Required credentials or parameters are absent. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Shorthand for an [`AppError::InsufficientData`] without a symbol attached yet.
    pub fn insufficient(needed: usize, available: usize) -> Self {
        AppError::InsufficientData {
            symbol: String::new(),
            needed,
            available,
        }
    }

    /// Attach a symbol to an [`AppError::InsufficientData`]; other variants pass through.
    pub fn for_symbol(self, symbol: &str) -> Self {
        match self {
            AppError::InsufficientData {
                needed, available, ..
            } => AppError::InsufficientData {
                symbol: symbol.to_string(),
                needed,
                available,
            },
            other => other,
        }
    }

    /// Per-symbol failures never abort a batch; configuration failures do.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_symbol_fills_insufficient_data() {
        let err = AppError::insufficient(35, 10).for_symbol("INFY");
        match err {
            AppError::InsufficientData {
                symbol,
                needed,
                available,
            } => {
                assert_eq!(symbol, "INFY");
                assert_eq!(needed, 35);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_for_symbol_leaves_other_variants() {
        let err = AppError::Provider("timeout".into()).for_symbol("TCS");
        assert!(matches!(err, AppError::Provider(msg) if msg == "timeout"));
    }

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(AppError::Configuration("no token".into()).is_fatal());
        assert!(!AppError::insufficient(2, 1).is_fatal());
        assert!(!AppError::MissingMetric("ROE".into()).is_fatal());
        assert!(!AppError::Provider("down".into()).is_fatal());
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::insufficient(2, 0).for_symbol("SBIN");
        assert_eq!(
            err.to_string(),
            "Insufficient data for SBIN: needed 2 bars, got 0"
        );
        assert_eq!(
            AppError::MissingMetric("ROE".into()).to_string(),
            "Missing metric: ROE"
        );
    }
}
