//! Error types for the confluence signal strategy

use indicators::IndicatorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Market data error: {message}")]
    MarketData { message: String },

    #[error("Calculation error: {message}")]
    Calculation { message: String },
}

impl StrategyError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        StrategyError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn market_data(message: impl Into<String>) -> Self {
        StrategyError::MarketData {
            message: message.into(),
        }
    }

    pub(crate) fn calculation(message: impl Into<String>) -> Self {
        StrategyError::Calculation {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StrategyError>;
