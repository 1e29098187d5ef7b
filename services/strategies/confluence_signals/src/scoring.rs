//! Confluence scoring
//!
//! Each indicator category is one row of [`SCORING_RULES`]: fixed point
//! awards plus a classifier that reads the [`IndicatorSnapshot`] and returns a
//! [`Verdict`]. [`Scorecard::apply`] is the only place verdicts turn into
//! score changes, so every category is tallied the same way. Volume runs last
//! and only amplifies whichever side is already ahead.

use crate::config::ScoringThresholds;
use crate::signals::{AnalysisEntry, AnalysisStatus};
use crate::snapshot::IndicatorSnapshot;
use indicators::{relative_distance, Direction, LevelKind, PatternStrength, SrLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Bonus added to the leading side on a volume spike
pub const VOLUME_BONUS: u32 = 10;

/// Interior retracement ratios checked for proximity, in priority order
const FIB_ENTRY_RATIOS: [Decimal; 4] = [dec!(0.236), dec!(0.382), dec!(0.5), dec!(0.618)];
const FIB_PIVOT_RATIO: Decimal = dec!(0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "Bollinger Bands")]
    Bollinger,
    #[serde(rename = "Trend")]
    Trend,
    #[serde(rename = "Support/Resistance")]
    SupportResistance,
    #[serde(rename = "Fibonacci")]
    Fibonacci,
    #[serde(rename = "Price Action")]
    PriceAction,
    #[serde(rename = "Volume")]
    Volume,
}

impl Category {
    /// Categories that can count as a confluence, in evaluation order
    pub const SCORED: [Category; 7] = [
        Category::Rsi,
        Category::Macd,
        Category::Bollinger,
        Category::Trend,
        Category::SupportResistance,
        Category::Fibonacci,
        Category::PriceAction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Rsi => "RSI",
            Category::Macd => "MACD",
            Category::Bollinger => "Bollinger Bands",
            Category::Trend => "Trend",
            Category::SupportResistance => "Support/Resistance",
            Category::Fibonacci => "Fibonacci",
            Category::PriceAction => "Price Action",
            Category::Volume => "Volume",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifier outcome for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Counts as a confluence
    Strong {
        direction: Direction,
        description: String,
    },
    /// Leans one way without confirming
    Weak {
        direction: Direction,
        description: String,
        reason: String,
    },
    Inconclusive {
        description: String,
        reason: String,
    },
}

pub type Classifier = fn(&IndicatorSnapshot, &ScoringThresholds) -> Verdict;

pub struct ScoringRule {
    pub category: Category,
    pub strong_points: u32,
    pub weak_points: u32,
    pub classify: Classifier,
}

pub const SCORING_RULES: [ScoringRule; 7] = [
    ScoringRule {
        category: Category::Rsi,
        strong_points: 25,
        weak_points: 8,
        classify: classify_rsi,
    },
    ScoringRule {
        category: Category::Macd,
        strong_points: 25,
        weak_points: 10,
        classify: classify_macd,
    },
    ScoringRule {
        category: Category::Bollinger,
        strong_points: 20,
        weak_points: 0,
        classify: classify_bollinger,
    },
    ScoringRule {
        category: Category::Trend,
        strong_points: 20,
        weak_points: 10,
        classify: classify_trend,
    },
    ScoringRule {
        category: Category::SupportResistance,
        strong_points: 20,
        weak_points: 0,
        classify: classify_support_resistance,
    },
    ScoringRule {
        category: Category::Fibonacci,
        strong_points: 15,
        weak_points: 0,
        classify: classify_fibonacci,
    },
    ScoringRule {
        category: Category::PriceAction,
        strong_points: 20,
        weak_points: 10,
        classify: classify_price_action,
    },
];

fn classify_rsi(snapshot: &IndicatorSnapshot, thresholds: &ScoringThresholds) -> Verdict {
    let rsi = snapshot.rsi;

    if rsi < thresholds.rsi_oversold {
        Verdict::Strong {
            direction: Direction::Call,
            description: format!("RSI oversold ({:.1}) - strong CALL indication", rsi),
        }
    } else if rsi > thresholds.rsi_overbought {
        Verdict::Strong {
            direction: Direction::Put,
            description: format!("RSI overbought ({:.1}) - strong PUT indication", rsi),
        }
    } else if rsi >= thresholds.rsi_neutral_low && rsi <= thresholds.rsi_neutral_high {
        Verdict::Inconclusive {
            description: format!("RSI neutral ({:.1}) - balanced market", rsi),
            reason: format!("RSI neutral ({:.1}) - no clear signal", rsi),
        }
    } else if rsi > thresholds.rsi_neutral_high {
        Verdict::Weak {
            direction: Direction::Call,
            description: format!("RSI at {:.1} - mild buying pressure", rsi),
            reason: format!("RSI at {:.1} - not strong enough for a confluence", rsi),
        }
    } else {
        Verdict::Weak {
            direction: Direction::Put,
            description: format!("RSI at {:.1} - mild selling pressure", rsi),
            reason: format!("RSI at {:.1} - not strong enough for a confluence", rsi),
        }
    }
}

fn classify_macd(snapshot: &IndicatorSnapshot, _thresholds: &ScoringThresholds) -> Verdict {
    let macd = snapshot.macd;

    if macd.histogram > Decimal::ZERO && macd.macd > macd.signal {
        Verdict::Strong {
            direction: Direction::Call,
            description: "MACD positive and above signal - bullish momentum confirmed".to_string(),
        }
    } else if macd.histogram < Decimal::ZERO && macd.macd < macd.signal {
        Verdict::Strong {
            direction: Direction::Put,
            description: "MACD negative and below signal - bearish momentum confirmed".to_string(),
        }
    } else if macd.histogram > Decimal::ZERO {
        Verdict::Weak {
            direction: Direction::Call,
            description: "MACD positive but weak - moderate bullish momentum".to_string(),
            reason: "MACD positive without a confirmed crossover".to_string(),
        }
    } else {
        Verdict::Weak {
            direction: Direction::Put,
            description: "MACD negative but weak - moderate bearish momentum".to_string(),
            reason: "MACD negative without a confirmed crossover".to_string(),
        }
    }
}

fn classify_bollinger(snapshot: &IndicatorSnapshot, thresholds: &ScoringThresholds) -> Verdict {
    let Some(position) = snapshot.bollinger.position_pct(snapshot.price) else {
        return Verdict::Inconclusive {
            description: "Bollinger Bands collapsed - no volatility".to_string(),
            reason: "Bollinger Bands have zero width".to_string(),
        };
    };

    if position < thresholds.bb_lower_zone_pct {
        Verdict::Strong {
            direction: Direction::Call,
            description: format!(
                "Price at the lower band ({:.0}%) - upward reversal likely",
                position
            ),
        }
    } else if position > thresholds.bb_upper_zone_pct {
        Verdict::Strong {
            direction: Direction::Put,
            description: format!(
                "Price at the upper band ({:.0}%) - downward reversal likely",
                position
            ),
        }
    } else {
        Verdict::Inconclusive {
            description: format!(
                "Price inside the Bollinger Bands ({:.0}%) - normal volatility",
                position
            ),
            reason: format!("Price mid-band ({:.0}%) - no extreme", position),
        }
    }
}

fn classify_trend(snapshot: &IndicatorSnapshot, _thresholds: &ScoringThresholds) -> Verdict {
    let (price, fast, slow) = (snapshot.price, snapshot.ema_fast, snapshot.ema_slow);
    let reason = "Short-term trend without long-term confirmation".to_string();

    if price > fast && fast > slow {
        Verdict::Strong {
            direction: Direction::Call,
            description: "Uptrend confirmed - price > EMA20 > EMA50".to_string(),
        }
    } else if price < fast && fast < slow {
        Verdict::Strong {
            direction: Direction::Put,
            description: "Downtrend confirmed - price < EMA20 < EMA50".to_string(),
        }
    } else if price > fast {
        Verdict::Weak {
            direction: Direction::Call,
            description: "Price above EMA20 - short-term uptrend".to_string(),
            reason,
        }
    } else {
        Verdict::Weak {
            direction: Direction::Put,
            description: "Price below EMA20 - short-term downtrend".to_string(),
            reason,
        }
    }
}

fn classify_support_resistance(
    snapshot: &IndicatorSnapshot,
    thresholds: &ScoringThresholds,
) -> Verdict {
    let price = snapshot.price;
    let levels = &snapshot.support_resistance;
    let is_near = |level: &SrLevel| {
        relative_distance(level.price, price).is_some_and(|d| d < thresholds.sr_proximity)
    };

    let nearest_support = levels
        .iter()
        .filter(|l| l.kind == LevelKind::Support && l.price < price)
        .max_by_key(|l| l.price);
    let nearest_resistance = levels
        .iter()
        .filter(|l| l.kind == LevelKind::Resistance && l.price > price)
        .min_by_key(|l| l.price);

    if let Some(support) = nearest_support.filter(|l| is_near(l)) {
        Verdict::Strong {
            direction: Direction::Call,
            description: format!(
                "Price near strong support ({:.2}) - reversal likely",
                support.price
            ),
        }
    } else if let Some(resistance) = nearest_resistance.filter(|l| is_near(l)) {
        Verdict::Strong {
            direction: Direction::Put,
            description: format!(
                "Price near strong resistance ({:.2}) - reversal likely",
                resistance.price
            ),
        }
    } else {
        Verdict::Inconclusive {
            description: "Price between S/R levels - no clear signal".to_string(),
            reason: "Price far from critical S/R levels".to_string(),
        }
    }
}

fn classify_fibonacci(snapshot: &IndicatorSnapshot, thresholds: &ScoringThresholds) -> Verdict {
    let price = snapshot.price;
    let fib = &snapshot.fibonacci;

    let near_level = FIB_ENTRY_RATIOS
        .iter()
        .filter_map(|&ratio| fib.levels.iter().find(|level| level.ratio == ratio))
        .find(|level| {
            relative_distance(level.price, price).is_some_and(|d| d < thresholds.fib_proximity)
        });

    let Some(level) = near_level else {
        return Verdict::Inconclusive {
            description: "Price outside the main Fibonacci levels".to_string(),
            reason: "Price outside the main Fibonacci levels".to_string(),
        };
    };

    let below_pivot = fib.price_at(FIB_PIVOT_RATIO).is_some_and(|pivot| price < pivot);
    if below_pivot {
        Verdict::Strong {
            direction: Direction::Call,
            description: format!("Price at Fibonacci {} - support zone", level.label()),
        }
    } else {
        Verdict::Strong {
            direction: Direction::Put,
            description: format!("Price at Fibonacci {} - resistance zone", level.label()),
        }
    }
}

fn classify_price_action(snapshot: &IndicatorSnapshot, _thresholds: &ScoringThresholds) -> Verdict {
    let action = snapshot.price_action;
    let side = match action.direction {
        Direction::Call => "bullish",
        _ => "bearish",
    };

    match action.strength {
        PatternStrength::Strong => Verdict::Strong {
            direction: action.direction,
            description: format!("{} pattern detected - strong {} signal", action.pattern, side),
        },
        PatternStrength::Moderate => Verdict::Weak {
            direction: action.direction,
            description: format!("{} pattern - moderate {} signal", action.pattern, side),
            reason: format!("Moderate {} pattern - insufficient strength", action.pattern),
        },
        PatternStrength::Absent => Verdict::Inconclusive {
            description: "No strong pattern detected".to_string(),
            reason: format!("{} - no strong pattern detected", action.pattern),
        },
    }
}

/// Running tallies for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scorecard {
    pub call_score: u32,
    pub put_score: u32,
    /// Categories with a strong verdict, in evaluation order
    pub detected: Vec<Category>,
    pub missing: Vec<String>,
    pub analyses: Vec<AnalysisEntry>,
}

impl Scorecard {
    /// Fold one rule's verdict into the card
    pub fn apply(&mut self, rule: &ScoringRule, verdict: Verdict) {
        let (description, status) = match verdict {
            Verdict::Strong {
                direction,
                description,
            } => {
                self.award(direction, rule.strong_points);
                self.detected.push(rule.category);
                (description, AnalysisStatus::Confirmed)
            }
            Verdict::Weak {
                direction,
                description,
                reason,
            } => {
                self.award(direction, rule.weak_points);
                self.missing.push(reason);
                (description, AnalysisStatus::Neutral)
            }
            Verdict::Inconclusive {
                description,
                reason,
            } => {
                self.missing.push(reason);
                (description, AnalysisStatus::Neutral)
            }
        };

        self.analyses
            .push(AnalysisEntry::new(rule.category, description, status));
    }

    pub fn award(&mut self, direction: Direction, points: u32) {
        match direction {
            Direction::Call => self.call_score += points,
            Direction::Put => self.put_score += points,
            Direction::Neutral => {}
        }
    }

    /// Side with the higher score, `None` on a tie
    pub fn leader(&self) -> Option<Direction> {
        match self.call_score.cmp(&self.put_score) {
            Ordering::Greater => Some(Direction::Call),
            Ordering::Less => Some(Direction::Put),
            Ordering::Equal => None,
        }
    }

    pub fn confluence_count(&self) -> usize {
        self.detected.len()
    }
}

/// Runs the rule table and the volume step over a snapshot
pub struct ConfluenceScorer<'a> {
    thresholds: &'a ScoringThresholds,
}

impl<'a> ConfluenceScorer<'a> {
    pub fn new(thresholds: &'a ScoringThresholds) -> Self {
        Self { thresholds }
    }

    pub fn score(&self, snapshot: &IndicatorSnapshot) -> Scorecard {
        let mut card = Scorecard::default();

        for rule in &SCORING_RULES {
            let verdict = (rule.classify)(snapshot, self.thresholds);
            debug!(category = %rule.category, ?verdict, "Classified");
            card.apply(rule, verdict);
        }

        self.score_volume(snapshot.volume_ratio, &mut card);
        card
    }

    fn score_volume(&self, ratio: Option<Decimal>, card: &mut Scorecard) {
        let (description, status) = match ratio {
            Some(ratio) if ratio > self.thresholds.volume_spike_ratio => {
                if let Some(leader) = card.leader() {
                    card.award(leader, VOLUME_BONUS);
                }
                (
                    format!("Volume {:.0}% of average - move confirmed", ratio * dec!(100)),
                    AnalysisStatus::Confirmed,
                )
            }
            Some(ratio) if ratio < self.thresholds.volume_low_ratio => (
                format!("Volume {:.0}% of average - low participation", ratio * dec!(100)),
                AnalysisStatus::Warning,
            ),
            Some(_) => (
                "Volume within average - normal participation".to_string(),
                AnalysisStatus::Neutral,
            ),
            None => (
                "No volume baseline - participation unknown".to_string(),
                AnalysisStatus::Neutral,
            ),
        };

        card.analyses
            .push(AnalysisEntry::new(Category::Volume, description, status));
    }
}
