//! Decision Property Tests
//!
//! Invariants of the signal result over random-walk market data.

use confluence_signals::{AssetSpec, Category, ConfluenceSignalEngine, SignalEngineConfig, SignalType};
use indicators::Bar;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Random walk around 1000 with OHLC wicks; times one `step_ms` apart
fn walk(steps: &[i64], volumes: &[u32], step_ms: u64) -> Vec<Bar> {
    let mut close = 1000i64;
    steps
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&step, &volume))| {
            let open = close;
            close += step;
            let high = open.max(close) + 1;
            let low = open.min(close) - 1;
            Bar::new(
                i as u64 * step_ms,
                Decimal::from(open),
                Decimal::from(high),
                Decimal::from(low),
                Decimal::from(close),
                Decimal::from(volume),
            )
        })
        .collect()
}

prop_compose! {
    fn long_series()
        (len in 50usize..120)
        (steps in prop::collection::vec(-5i64..=5, len),
         volumes in prop::collection::vec(0u32..1000, len)) -> Vec<Bar> {
        walk(&steps, &volumes, 3_600_000)
    }
}

prop_compose! {
    fn short_series()
        (len in 3usize..30)
        (steps in prop::collection::vec(-5i64..=5, len),
         volumes in prop::collection::vec(1u32..100, len)) -> Vec<Bar> {
        walk(&steps, &volumes, 60_000)
    }
}

proptest! {
    #[test]
    fn detected_confluences_are_distinct_scored_categories(
        long in long_series(),
        short in short_series(),
    ) {
        let engine = ConfluenceSignalEngine::new(SignalEngineConfig::default()).unwrap();
        let result = engine
            .evaluate_bars(&AssetSpec::new("BTC/USDT", "BTCUSDT"), long, short)
            .unwrap();

        let unique: HashSet<_> = result.detected_confluences.iter().collect();
        prop_assert_eq!(unique.len(), result.detected_confluences.len());
        prop_assert!(result
            .detected_confluences
            .iter()
            .all(|c| Category::SCORED.contains(c)));
        prop_assert!(!result.detected_confluences.contains(&Category::Volume));
        prop_assert_eq!(result.confluence_count, result.detected_confluences.len());
        prop_assert_eq!(result.analyses.len(), 8);
        prop_assert_eq!(
            result.missing_confluences.len() + result.confluence_count,
            Category::SCORED.len()
        );
    }

    #[test]
    fn decision_fields_are_consistent(
        long in long_series(),
        short in short_series(),
    ) {
        let engine = ConfluenceSignalEngine::new(SignalEngineConfig::default()).unwrap();
        let result = engine
            .evaluate_bars(&AssetSpec::new("ETH/USDT", "ETHUSDT"), long, short)
            .unwrap();

        if result.has_signal {
            prop_assert!(result.confluence_count >= 3);
            prop_assert!(result.call_score != result.put_score);
            prop_assert!((50..=95).contains(&result.confidence));
            prop_assert!((3..=5).contains(&result.confidence_level));
            let expected = if result.call_score > result.put_score {
                SignalType::Call
            } else {
                SignalType::Put
            };
            prop_assert_eq!(result.signal_type, expected);
        } else {
            prop_assert_eq!(result.signal_type, SignalType::Neutral);
            prop_assert_eq!(result.confidence, 50);
            prop_assert_eq!(result.confidence_level, 0);
        }
    }
}
