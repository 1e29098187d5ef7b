//! Bollinger Bands

use crate::error::{IndicatorError, Result};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BB_PERIOD: usize = 20;
pub const DEFAULT_BB_MULTIPLIER: Decimal = dec!(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: Decimal,
    pub middle: Decimal,
    pub lower: Decimal,
    /// Last close of the input series
    pub current: Decimal,
}

impl BollingerValue {
    pub fn width(&self) -> Decimal {
        self.upper - self.lower
    }

    /// Position of `price` inside the band in percent (0 = lower, 100 = upper).
    /// `None` for a zero-width band.
    pub fn position_pct(&self, price: Decimal) -> Option<Decimal> {
        (price - self.lower)
            .checked_div(self.width())
            .map(|ratio| ratio * dec!(100))
    }
}

/// Bollinger Bands over the trailing `period` closes.
///
/// Middle band is the SMA of the window, the deviation is the population
/// standard deviation around it. `multiplier` must be non-negative for the
/// bands to stay ordered.
pub fn bollinger_bands(
    series: &[Decimal],
    period: usize,
    multiplier: Decimal,
) -> Result<BollingerValue> {
    if period == 0 {
        return Err(IndicatorError::InsufficientData {
            indicator: "Bollinger Bands",
            required: 1,
            actual: series.len(),
        });
    }
    IndicatorError::ensure_len("Bollinger Bands", period, series.len())?;

    let window = &series[series.len() - period..];
    let period_d = Decimal::from(period);

    let middle = window.iter().sum::<Decimal>() / period_d;
    let variance = window
        .iter()
        .map(|&x| {
            let diff = x - middle;
            diff * diff
        })
        .sum::<Decimal>()
        / period_d;
    let std_dev = variance.sqrt().unwrap_or_default();

    Ok(BollingerValue {
        upper: middle + std_dev * multiplier,
        middle,
        lower: middle - std_dev * multiplier,
        current: series[series.len() - 1],
    })
}
