//! Error types for indicator calculations

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("Insufficient data for {indicator}: need at least {required} values, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid series: {reason}")]
    InvalidSeries { reason: String },
}

impl IndicatorError {
    /// Fail with `InsufficientData` unless `actual >= required`
    pub fn ensure_len(indicator: &'static str, required: usize, actual: usize) -> Result<()> {
        if actual < required {
            return Err(IndicatorError::InsufficientData {
                indicator,
                required,
                actual,
            });
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
