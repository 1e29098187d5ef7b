//! OHLCV candles and validated candle series

use crate::error::{IndicatorError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLCV candle. `time` is the candle open time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub time: u64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Bar {
    pub fn new(
        time: u64,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Chronological candle series, oldest first.
///
/// Always non-empty with strictly increasing `time`; [`CandleSeries::new`] is
/// the only constructor and enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct CandleSeries {
    bars: Vec<Bar>,
}

impl CandleSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(IndicatorError::InvalidSeries {
                reason: "series is empty".to_string(),
            });
        }

        if let Some(idx) = bars.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(IndicatorError::InvalidSeries {
                reason: format!(
                    "timestamps not strictly increasing at index {} ({} after {})",
                    idx + 1,
                    bars[idx + 1].time,
                    bars[idx].time
                ),
            });
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair convention
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar
    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Fail with `InsufficientData` when the series is shorter than `required`
    pub fn ensure_len(&self, indicator: &'static str, required: usize) -> Result<()> {
        IndicatorError::ensure_len(indicator, required, self.bars.len())
    }
}

impl TryFrom<Vec<Bar>> for CandleSeries {
    type Error = IndicatorError;

    fn try_from(bars: Vec<Bar>) -> Result<Self> {
        Self::new(bars)
    }
}

impl From<CandleSeries> for Vec<Bar> {
    fn from(series: CandleSeries) -> Self {
        series.bars
    }
}
