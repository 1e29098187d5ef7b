//! Price levels: Fibonacci retracements and clustered support/resistance

use crate::error::{IndicatorError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Retracement fractions measured down from the high
pub const FIBONACCI_RATIOS: [Decimal; 7] = [
    dec!(0),
    dec!(0.236),
    dec!(0.382),
    dec!(0.5),
    dec!(0.618),
    dec!(0.786),
    dec!(1),
];

pub const DEFAULT_CLUSTER_THRESHOLD: Decimal = dec!(0.02);

/// `|price - reference| / |reference|`, `None` when the reference is zero
pub fn relative_distance(price: Decimal, reference: Decimal) -> Option<Decimal> {
    (price - reference).abs().checked_div(reference.abs())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub ratio: Decimal,
    pub price: Decimal,
}

impl FibonacciLevel {
    /// Display label such as `23.6%` or `50%`
    pub fn label(&self) -> String {
        format!("{}%", (self.ratio * dec!(100)).normalize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub levels: Vec<FibonacciLevel>,
    pub high: Decimal,
    pub low: Decimal,
}

impl FibonacciLevels {
    pub fn price_at(&self, ratio: Decimal) -> Option<Decimal> {
        self.levels
            .iter()
            .find(|level| level.ratio == ratio)
            .map(|level| level.price)
    }
}

/// Retracement levels between the series high and low
pub fn fibonacci_levels(series: &[Decimal]) -> Result<FibonacciLevels> {
    let (Some(&high), Some(&low)) = (series.iter().max(), series.iter().min()) else {
        return Err(IndicatorError::InsufficientData {
            indicator: "Fibonacci",
            required: 1,
            actual: 0,
        });
    };
    let diff = high - low;

    let levels = FIBONACCI_RATIOS
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: high - diff * ratio,
        })
        .collect();

    Ok(FibonacciLevels { levels, high, low })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrLevel {
    pub price: Decimal,
    pub kind: LevelKind,
    /// Number of extrema merged into this level, at least 1
    pub strength: u32,
}

/// Support/resistance clusters from 5-bar local extrema.
///
/// A bar is a resistance candidate when it is strictly above the two bars on
/// each side, a support candidate when strictly below them. Candidates merge
/// into the first existing cluster of the same kind whose price is within
/// `cluster_threshold` (relative to the candidate); merging bumps the strength
/// and replaces the cluster price with the midpoint of the two prices, not a
/// size-weighted mean. Clusters come back ordered by descending strength,
/// ties in discovery order.
pub fn find_support_resistance(series: &[Decimal], cluster_threshold: Decimal) -> Vec<SrLevel> {
    let mut candidates = Vec::new();

    for i in 2..series.len().saturating_sub(2) {
        let price = series[i];
        let neighbours = [series[i - 2], series[i - 1], series[i + 1], series[i + 2]];

        if neighbours.iter().all(|&n| price > n) {
            candidates.push((price, LevelKind::Resistance));
        }
        if neighbours.iter().all(|&n| price < n) {
            candidates.push((price, LevelKind::Support));
        }
    }

    let mut clusters: Vec<SrLevel> = Vec::new();
    for (price, kind) in candidates {
        let existing = clusters.iter_mut().find(|level| {
            level.kind == kind
                && relative_distance(level.price, price)
                    .map_or(false, |distance| distance < cluster_threshold)
        });

        match existing {
            Some(level) => {
                level.strength += 1;
                level.price = (level.price + price) / dec!(2);
            }
            None => clusters.push(SrLevel {
                price,
                kind,
                strength: 1,
            }),
        }
    }

    clusters.sort_by(|a, b| b.strength.cmp(&a.strength));
    clusters
}
