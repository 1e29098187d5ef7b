//! Indicator outputs and the tagged union used for diagnostics

use crate::levels::{FibonacciLevels, SrLevel};
use crate::price_action::PriceActionResult;
use crate::volatility::BollingerValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction shared by pattern detection and signal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Call,
    Put,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Call => "CALL",
            Direction::Put => "PUT",
            Direction::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

/// Most recent MACD triple
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdValue {
    pub macd: Decimal,
    pub signal: Decimal,
    pub histogram: Decimal,
}

/// Any single indicator reading, tagged by indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "indicator", rename_all = "snake_case")]
pub enum IndicatorValue {
    Rsi { value: Decimal },
    Macd(MacdValue),
    Bollinger(BollingerValue),
    Fibonacci(FibonacciLevels),
    SupportResistance(SrLevel),
    PriceAction(PriceActionResult),
}

impl IndicatorValue {
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorValue::Rsi { .. } => "RSI",
            IndicatorValue::Macd(_) => "MACD",
            IndicatorValue::Bollinger(_) => "Bollinger Bands",
            IndicatorValue::Fibonacci(_) => "Fibonacci",
            IndicatorValue::SupportResistance(_) => "Support/Resistance",
            IndicatorValue::PriceAction(_) => "Price Action",
        }
    }
}
