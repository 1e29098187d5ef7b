//! Simple and exponential moving averages

use crate::error::{IndicatorError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Simple moving average over every full trailing window.
///
/// Returns `len - period + 1` values, the last one covering the most recent
/// `period` elements.
pub fn sma(series: &[Decimal], period: usize) -> Result<Vec<Decimal>> {
    if period == 0 {
        return Err(IndicatorError::InsufficientData {
            indicator: "SMA",
            required: 1,
            actual: series.len(),
        });
    }
    IndicatorError::ensure_len("SMA", period, series.len())?;

    let divisor = Decimal::from(period);
    let mut sum: Decimal = series[..period].iter().sum();

    let mut result = Vec::with_capacity(series.len() - period + 1);
    result.push(sum / divisor);

    for i in period..series.len() {
        sum += series[i] - series[i - period];
        result.push(sum / divisor);
    }

    Ok(result)
}

/// Exponential moving average with `k = 2 / (period + 1)`.
///
/// Seeded with `series[0]` and the same length as the input. Leading values
/// are not warmed up; callers that need a warm-up discard them.
pub fn ema(series: &[Decimal], period: usize) -> Vec<Decimal> {
    let Some((&first, rest)) = series.split_first() else {
        return Vec::new();
    };

    let k = dec!(2) / Decimal::from(period + 1);
    let one_minus_k = dec!(1) - k;

    let mut result = Vec::with_capacity(series.len());
    let mut prev = first;
    result.push(prev);

    for &value in rest {
        prev = value * k + prev * one_minus_k;
        result.push(prev);
    }

    result
}
