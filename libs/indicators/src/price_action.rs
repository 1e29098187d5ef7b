//! Three-candle price action patterns

use crate::candle::Bar;
use crate::error::{IndicatorError, Result};
use crate::value::Direction;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandlePattern {
    BullishEngulfing,
    Hammer,
    MorningStar,
    BearishEngulfing,
    ShootingStar,
    EveningStar,
    NoClearPattern,
}

impl CandlePattern {
    /// Every pattern, in detection priority order, followed by the fallback
    pub const ALL: [CandlePattern; 7] = [
        CandlePattern::BullishEngulfing,
        CandlePattern::Hammer,
        CandlePattern::MorningStar,
        CandlePattern::BearishEngulfing,
        CandlePattern::ShootingStar,
        CandlePattern::EveningStar,
        CandlePattern::NoClearPattern,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CandlePattern::BullishEngulfing => "Bullish Engulfing",
            CandlePattern::Hammer => "Hammer",
            CandlePattern::MorningStar => "Morning Star",
            CandlePattern::BearishEngulfing => "Bearish Engulfing",
            CandlePattern::ShootingStar => "Shooting Star",
            CandlePattern::EveningStar => "Evening Star",
            CandlePattern::NoClearPattern => "No clear pattern",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            CandlePattern::BullishEngulfing | CandlePattern::Hammer | CandlePattern::MorningStar => {
                Direction::Call
            }
            CandlePattern::BearishEngulfing
            | CandlePattern::ShootingStar
            | CandlePattern::EveningStar => Direction::Put,
            CandlePattern::NoClearPattern => Direction::Neutral,
        }
    }

    pub fn strength(&self) -> PatternStrength {
        match self {
            CandlePattern::Hammer | CandlePattern::ShootingStar => PatternStrength::Moderate,
            CandlePattern::NoClearPattern => PatternStrength::Absent,
            _ => PatternStrength::Strong,
        }
    }
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStrength {
    Strong,
    Moderate,
    #[serde(rename = "none")]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceActionResult {
    pub pattern: CandlePattern,
    pub direction: Direction,
    pub strength: PatternStrength,
}

impl From<CandlePattern> for PriceActionResult {
    fn from(pattern: CandlePattern) -> Self {
        Self {
            pattern,
            direction: pattern.direction(),
            strength: pattern.strength(),
        }
    }
}

/// Classify the last three bars.
///
/// Checks run in a fixed priority order and the first match wins, so exactly
/// one pattern (or `NoClearPattern`) is ever reported.
pub fn detect_price_action(bars: &[Bar]) -> Result<PriceActionResult> {
    let [.., prev2, prev, last] = bars else {
        return Err(IndicatorError::InsufficientData {
            indicator: "Price Action",
            required: 3,
            actual: bars.len(),
        });
    };

    let pattern = if is_bullish_engulfing(prev, last) {
        CandlePattern::BullishEngulfing
    } else if is_hammer(last) {
        CandlePattern::Hammer
    } else if is_morning_star(prev2, prev, last) {
        CandlePattern::MorningStar
    } else if is_bearish_engulfing(prev, last) {
        CandlePattern::BearishEngulfing
    } else if is_shooting_star(last) {
        CandlePattern::ShootingStar
    } else if is_evening_star(prev2, prev, last) {
        CandlePattern::EveningStar
    } else {
        CandlePattern::NoClearPattern
    };

    Ok(pattern.into())
}

fn is_bullish_engulfing(prev: &Bar, last: &Bar) -> bool {
    prev.is_bearish() && last.is_bullish() && last.close > prev.open && last.open < prev.close
}

fn is_bearish_engulfing(prev: &Bar, last: &Bar) -> bool {
    prev.is_bullish() && last.is_bearish() && last.close < prev.open && last.open > prev.close
}

// Small upper wick, lower wick at least twice the body
fn is_hammer(last: &Bar) -> bool {
    let body = last.close - last.open;
    last.high - last.close < body * dec!(0.3) && last.close - last.low > body * dec!(2) && last.is_bullish()
}

// Small lower wick, upper wick at least twice the body
fn is_shooting_star(last: &Bar) -> bool {
    let body = last.open - last.close;
    last.close - last.low < body * dec!(0.3) && last.high - last.close > body * dec!(2) && last.is_bearish()
}

fn is_morning_star(prev2: &Bar, prev: &Bar, last: &Bar) -> bool {
    prev2.is_bearish() && prev.is_bullish() && last.is_bullish() && last.close > prev2.open
}

fn is_evening_star(prev2: &Bar, prev: &Bar, last: &Bar) -> bool {
    prev2.is_bullish() && prev.is_bearish() && last.is_bearish() && last.close < prev2.close
}
