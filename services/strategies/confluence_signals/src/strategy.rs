//! Confluence signal engine
//!
//! Stateless service object: holds validated configuration and nothing else,
//! so one instance can be shared across threads behind an `Arc` and asked to
//! evaluate any number of assets concurrently.

use crate::config::{DecisionParams, SignalEngineConfig};
use crate::error::Result;
use crate::scoring::{ConfluenceScorer, Scorecard};
use crate::signals::{AssetSpec, SignalResult, SignalType};
use crate::snapshot::IndicatorSnapshot;
use chrono::Utc;
use indicators::{Bar, CandleSeries, Direction};
use tracing::{debug, info};

/// Final call taken from a scorecard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub signal_type: SignalType,
    pub confidence: u8,
    pub confidence_level: u8,
    pub has_signal: bool,
}

impl Decision {
    fn no_signal(params: &DecisionParams) -> Self {
        Self {
            signal_type: SignalType::Neutral,
            confidence: params.base_confidence,
            confidence_level: 0,
            has_signal: false,
        }
    }
}

pub struct ConfluenceSignalEngine {
    config: SignalEngineConfig,
}

impl ConfluenceSignalEngine {
    pub fn new(config: SignalEngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SignalEngineConfig {
        &self.config
    }

    /// Score one asset from its long (trend) and short (price action) series.
    ///
    /// A missing signal is a normal result with `has_signal == false`; only
    /// unusable input is an error.
    pub fn evaluate(
        &self,
        asset: &AssetSpec,
        long: &CandleSeries,
        short: &CandleSeries,
    ) -> Result<SignalResult> {
        let snapshot = IndicatorSnapshot::compute(long, short, &self.config.indicators)?;
        Ok(self.evaluate_snapshot(asset, &snapshot))
    }

    /// Same as [`evaluate`](Self::evaluate) for raw bars, validating ordering first
    pub fn evaluate_bars(
        &self,
        asset: &AssetSpec,
        long: Vec<Bar>,
        short: Vec<Bar>,
    ) -> Result<SignalResult> {
        let long = CandleSeries::new(long)?;
        let short = CandleSeries::new(short)?;
        self.evaluate(asset, &long, &short)
    }

    pub fn evaluate_snapshot(&self, asset: &AssetSpec, snapshot: &IndicatorSnapshot) -> SignalResult {
        let card = ConfluenceScorer::new(&self.config.thresholds).score(snapshot);
        let decision = self.decide(&card);

        debug!(
            asset = %asset.name,
            call_score = card.call_score,
            put_score = card.put_score,
            confluences = card.confluence_count(),
            "Scored indicators"
        );

        if decision.has_signal {
            info!(
                asset = %asset.name,
                signal = %decision.signal_type,
                confidence = decision.confidence,
                level = decision.confidence_level,
                "Signal generated"
            );
        } else {
            debug!(asset = %asset.name, "No signal");
        }

        SignalResult {
            asset: asset.name.clone(),
            symbol: asset.symbol.clone(),
            signal_type: decision.signal_type,
            confidence: decision.confidence,
            confidence_level: decision.confidence_level,
            confluence_count: card.confluence_count(),
            detected_confluences: card.detected,
            missing_confluences: card.missing,
            analyses: card.analyses,
            has_signal: decision.has_signal,
            call_score: card.call_score,
            put_score: card.put_score,
            indicator_values: snapshot.values(),
            timestamp: Utc::now(),
        }
    }

    pub fn decide(&self, card: &Scorecard) -> Decision {
        let params = &self.config.decision;
        let total = card.confluence_count();

        if total < params.min_confluences {
            return Decision::no_signal(params);
        }

        let (signal_type, winning) = match card.leader() {
            Some(Direction::Call) => (SignalType::Call, card.call_score),
            Some(Direction::Put) => (SignalType::Put, card.put_score),
            _ => return Decision::no_signal(params),
        };

        let confidence = u32::from(params.base_confidence)
            .saturating_add(winning)
            .min(u32::from(params.max_confidence));
        let confidence_level = match total {
            6.. => 5,
            5 => 4,
            _ => 3,
        };

        Decision {
            signal_type,
            confidence: u8::try_from(confidence).unwrap_or(params.max_confidence),
            confidence_level,
            has_signal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Category;
    use crate::signals::AnalysisStatus;
    use crate::snapshot::fixtures::oversold_uptrend;
    use rust_decimal_macros::dec;

    fn engine() -> ConfluenceSignalEngine {
        ConfluenceSignalEngine::new(SignalEngineConfig::default()).unwrap()
    }

    fn btc() -> AssetSpec {
        AssetSpec::new("BTC/USDT", "BTCUSDT")
    }

    fn card(call_score: u32, put_score: u32, confluences: usize) -> Scorecard {
        Scorecard {
            call_score,
            put_score,
            detected: Category::SCORED[..confluences].to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = SignalEngineConfig::default();
        config.decision.max_confidence = 20;

        assert!(ConfluenceSignalEngine::new(config).is_err());
    }

    #[test]
    fn test_oversold_uptrend_emits_call() {
        let result = engine().evaluate_snapshot(&btc(), &oversold_uptrend());

        assert!(result.has_signal);
        assert_eq!(result.signal_type, SignalType::Call);
        assert_eq!(result.confidence, 95);
        assert_eq!(result.confidence_level, 3);
        assert_eq!(result.confluence_count, 3);
        assert_eq!(
            result.detected_confluences,
            vec![Category::Rsi, Category::Macd, Category::Trend]
        );
        assert_eq!(result.analyses.len(), 8);
        assert_eq!(result.asset, "BTC/USDT");
        assert_eq!(result.symbol, "BTCUSDT");
    }

    #[test]
    fn test_single_confluence_is_no_signal() {
        let mut snap = oversold_uptrend();
        // Weak MACD and weak trend leave RSI as the only confluence
        snap.macd.macd = dec!(0.5);
        snap.ema_fast = dec!(99);

        let result = engine().evaluate_snapshot(&btc(), &snap);

        assert!(!result.has_signal);
        assert_eq!(result.signal_type, SignalType::Neutral);
        assert_eq!(result.confidence, 50);
        assert_eq!(result.confidence_level, 0);
        assert_eq!(result.confluence_count, 1);
        assert_eq!(result.detected_confluences, vec![Category::Rsi]);
        assert!(result.call_score > result.put_score);
        assert!(!result.missing_confluences.is_empty());
        assert!(result
            .analyses
            .iter()
            .filter(|a| a.indicator_name == "MACD")
            .all(|a| a.status == AnalysisStatus::Neutral));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let engine = engine();
        let first = engine.evaluate_snapshot(&btc(), &oversold_uptrend());
        let mut second = engine.evaluate_snapshot(&btc(), &oversold_uptrend());
        second.timestamp = first.timestamp;

        assert_eq!(first, second);
    }

    #[test]
    fn test_decide_tie_is_no_signal() {
        let decision = engine().decide(&card(45, 45, 4));

        assert!(!decision.has_signal);
        assert_eq!(decision.signal_type, SignalType::Neutral);
        assert_eq!(decision.confidence, 50);
    }

    #[test]
    fn test_decide_confidence_levels() {
        let engine = engine();

        let three = engine.decide(&card(10, 30, 3));
        assert_eq!(three.signal_type, SignalType::Put);
        assert_eq!(three.confidence, 80);
        assert_eq!(three.confidence_level, 3);

        assert_eq!(engine.decide(&card(60, 0, 5)).confidence_level, 4);
        assert_eq!(engine.decide(&card(60, 0, 6)).confidence_level, 5);
        assert_eq!(engine.decide(&card(60, 0, 7)).confidence_level, 5);
        assert_eq!(engine.decide(&card(160, 0, 7)).confidence, 95);
    }

    #[test]
    fn test_decide_needs_min_confluences() {
        let decision = engine().decide(&card(200, 0, 2));

        assert!(!decision.has_signal);
        assert_eq!(decision.confidence_level, 0);
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfluenceSignalEngine>();
    }
}
