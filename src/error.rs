use std::sync::Arc;

/// Errors produced by the normalization layer and the arbitrage engine
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")] Configuration(String),

    #[error("Normalization error for {symbol}: {reason} (at step {step})")] Normalization {
        symbol: Arc<str>,
        step: usize,
        reason: String,
    },

    #[error("Invalid price for {symbol}: {reason}")] InvalidPrice {
        symbol: Arc<str>,
        reason: String,
    },

    #[error("Missing quote {symbol} for cycle {cycle}")] MissingQuote {
        symbol: Arc<str>,
        cycle: String,
    },

    #[error("No snapshot supplied for source {0}")] MissingSnapshot(Arc<str>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Symbol the error refers to, if it is a per-symbol failure
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Error::Normalization { symbol, .. } => Some(symbol),
            Error::InvalidPrice { symbol, .. } => Some(symbol),
            Error::MissingQuote { symbol, .. } => Some(symbol),
            Error::Configuration(_) | Error::MissingSnapshot(_) => None,
        }
    }

    pub(crate) fn invalid_price(symbol: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPrice { symbol: Arc::from(symbol), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_accessor() {
        let err = Error::invalid_price("BTCUSD", "price must be positive");
        assert_eq!(err.symbol(), Some("BTCUSD"));

        let err = Error::Configuration("bad cost".to_string());
        assert_eq!(err.symbol(), None);
    }

    #[test]
    fn test_display_names_symbol_and_cycle() {
        let err = Error::MissingQuote {
            symbol: Arc::from("ETHBTC"),
            cycle: "BTCUSD → ETHBTC → 1/ETHUSD".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("ETHBTC"));
        assert!(text.contains("1/ETHUSD"));
    }
}
